//! Domain Errors
//!
//! Failure taxonomy shared by the fetch and resolution pipeline.

/// Errors raised by cluster fetches, geolocation calls and resolution.
///
/// A partially resolved GeoIndex is not an error; see
/// [`Resolution`](crate::application::Resolution) for how gaps are reported.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NodeMapError {
    /// The request could not be completed or returned a non-success status.
    #[error("transport error: {0}")]
    Transport(String),
    /// The decoded payload does not have the expected shape.
    #[error("format error: {0}")]
    Format(String),
    /// Caller-supplied input was rejected before any request was made.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl NodeMapError {
    /// Collapse any error into a transport failure.
    ///
    /// Geolocation calls report a malformed envelope the same way as a
    /// failed request.
    pub fn into_transport(self) -> Self {
        match self {
            Self::Transport(msg) => Self::Transport(msg),
            Self::Format(msg) => Self::Transport(format!("malformed response: {}", msg)),
            Self::InvalidInput(msg) => Self::Transport(msg),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}
