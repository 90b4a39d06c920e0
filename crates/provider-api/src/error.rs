use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::capabilities::CapabilityKind;

/// Errors raised while a loaded provider services a request.
///
/// These are reported to the caller as non-fatal notices; the provider stays
/// loaded and may be invoked again.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider reported a failure of its own.
    #[error("{0}")]
    Failed(String),

    /// An I/O operation performed by the provider failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// An external command finished unsuccessfully.
    #[error("command `{program}` exited with {status}")]
    CommandStatus { program: String, status: ExitStatus },

    /// A remote view points at content that does not exist.
    #[error("entry '{}' does not exist", path.display())]
    EntryNotFound { path: PathBuf },

    /// The requested operation is not part of the provider's capability.
    #[error("provider '{provider}' ({kind}) does not support {operation}")]
    Unsupported {
        provider: String,
        kind: CapabilityKind,
        operation: &'static str,
    },

    /// No provider is registered under the requested identifier.
    #[error("no provider is registered as #{0}")]
    UnknownProvider(usize),

    /// The provider panicked while running on a worker thread.
    #[error("provider '{provider}' panicked: {message}")]
    Panicked { provider: String, message: String },
}

impl ProviderError {
    /// Build a [`ProviderError::Failed`] from any displayable message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    pub fn unsupported(
        provider: impl Into<String>,
        kind: CapabilityKind,
        operation: &'static str,
    ) -> Self {
        Self::Unsupported {
            provider: provider.into(),
            kind,
            operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_names_provider_and_operation() {
        let err = ProviderError::unsupported("Clock", CapabilityKind::Actionable, "search");
        assert_eq!(
            err.to_string(),
            "provider 'Clock' (actionable) does not support search"
        );
    }

    #[test]
    fn io_errors_convert() {
        let err: ProviderError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ProviderError::Io(_)));
    }
}
