use thiserror::Error;

/// Failures of the request layer. Extractors themselves never fail: a value
/// that cannot be found is simply absent.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to parse request JSON: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error("invalid CSS selector \"{selector}\" for {alias}")]
    InvalidSelector { alias: String, selector: String },

    #[error("invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    #[error("{0} is null")]
    NullPointer(&'static str),

    #[error("failed to serialize {context}: {source}")]
    Serialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
