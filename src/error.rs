//! Error types for the flux tool.
//!
//! Errors are carried as structured values (kind, message, optional source
//! chain) all the way to the front end, which decides how much of them the
//! operator gets to see. The `Bug` kind is exempt from masking: the front end
//! always propagates it with the full chain.

use thiserror::Error;

type Source = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for tool entry points and the device layer.
#[derive(Error, Debug)]
pub enum ToolError {
    /// A defect in this program or the device firmware: protocol violations,
    /// malformed fixed-width responses. Never downgraded to a banner.
    #[error("internal error: {message}")]
    Bug {
        message: String,
        #[source]
        source: Option<Source>,
    },

    /// Operator-issued interrupt observed by a tool mid-operation.
    #[error("interrupted")]
    Interrupted,

    /// Expected runtime failures: absent device, unreadable media, bad input.
    #[error("{message}")]
    Operational {
        message: String,
        #[source]
        source: Option<Source>,
    },
}

impl ToolError {
    /// Create a new bug-class error.
    pub fn bug(message: impl Into<String>) -> Self {
        Self::Bug {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new operational error.
    pub fn operational(message: impl Into<String>) -> Self {
        Self::Operational {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new operational error with an underlying cause.
    pub fn operational_with(message: impl Into<String>, source: impl Into<Source>) -> Self {
        Self::Operational {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        // An interrupted syscall is how a tool observes Ctrl-C during a
        // blocking transfer; everything else is an ordinary runtime failure.
        if err.kind() == std::io::ErrorKind::Interrupted {
            Self::Interrupted
        } else {
            Self::Operational {
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        }
    }
}

impl From<serialport::Error> for ToolError {
    fn from(err: serialport::Error) -> Self {
        Self::Operational {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ToolError>;
