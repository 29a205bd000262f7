// Shared utilities used across domains

pub mod progress;
pub mod timestamps;

pub use progress::map_progress;
pub use timestamps::{parse_created, CreatedError};
