use thiserror::Error;

/// Raised only when the built-in selector table does not compile.
#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector {
        selector: &'static str,
        reason: String,
    },
}
