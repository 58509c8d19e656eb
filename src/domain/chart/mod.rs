pub mod value_objects;
pub mod viewport_transform;
pub mod zoom;

pub use value_objects::*;
pub use viewport_transform::*;
pub use zoom::*;
