pub mod frame;
pub mod rendering;
pub mod services;

pub use frame::{AnimationFrameScheduler, ManualFrameScheduler, TimeoutFrameScheduler};
pub use services::{BrowserTimeProvider, ConsoleLogger, SystemTimeProvider};
