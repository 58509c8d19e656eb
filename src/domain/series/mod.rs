pub mod data_source;
pub mod sliding_window;

pub use data_source::*;
pub use sliding_window::*;
