use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpenAIError>;

#[derive(Debug, Error)]
pub enum OpenAIError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("OpenAI returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("model refused to answer: {0}")]
    Refused(String),

    #[error("model returned no answer")]
    EmptyAnswer,

    /// The answer did not deserialize into the requested type.
    #[error("could not parse {type_name}: {message}")]
    Parse { type_name: String, message: String },
}
