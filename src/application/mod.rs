pub mod chart;
pub mod config;
pub mod frame;
pub mod legend;
pub mod render_state;
pub mod sync;
pub mod zoom_scheduler;

pub use chart::{ChartAdapters, TimeSeriesChart};
pub use config::ChartConfig;
pub use frame::{DrawProc, FrameHandle, FrameScheduler};
pub use legend::{HoverPoint, LegendController, NoopLegend, TextLegend};
pub use sync::ChartGroup;
pub use zoom_scheduler::{ZoomScheduler, ZoomTarget};
