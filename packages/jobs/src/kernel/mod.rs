//! Kernel module - infrastructure seams and their adapters.

pub mod job_classifier;
pub mod job_sink;
pub mod job_source;
pub mod test_dependencies;
pub mod traits;

/// Default model for job classification: cheap, fast, supports strict JSON schema.
pub const GPT_4O_MINI: &str = "gpt-4o-mini";

pub use job_classifier::OpenAIJobClassifier;
pub use job_sink::PostgresJobSink;
pub use test_dependencies::{MockJobClassifier, MockJobSink, MockJobSource};
pub use traits::*;
