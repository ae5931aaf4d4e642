use core::convert::Infallible;

use crate::logic::PortId;

/// Errors produced while building or running a merge-latest stage.
///
/// `E` is the error type reported by the upstream ports. Stages whose
/// upstreams cannot fail use the default, [`Infallible`].
#[derive(Debug, thiserror::Error)]
pub enum MergeLatestError<E = Infallible> {
    /// The stage was configured with invalid parameters.
    ///
    /// Raised synchronously during construction, before any element flows.
    #[error("invalid merge-latest configuration: {reason}")]
    InvalidConfiguration {
        /// What was wrong with the configuration.
        reason: &'static str,
    },

    /// One of the input ports failed.
    ///
    /// The stage does not recover from this; all other ports are cancelled.
    #[error("upstream port {port} failed")]
    UpstreamFailure {
        /// The port that reported the failure.
        port: PortId,
        /// The error reported by the upstream.
        #[source]
        source: E,
    },
}

impl<E> MergeLatestError<E> {
    pub(crate) fn no_ports() -> Self {
        Self::InvalidConfiguration {
            reason: "at least one input port is required",
        }
    }

    /// Returns the port that failed, if this is an upstream failure.
    pub fn port(&self) -> Option<PortId> {
        match self {
            Self::InvalidConfiguration { .. } => None,
            Self::UpstreamFailure { port, .. } => Some(*port),
        }
    }

    /// Returns `true` if this error was raised while building the stage.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. })
    }

    /// Consumes the error, returning the upstream error if there is one.
    pub fn into_upstream(self) -> Option<E> {
        match self {
            Self::InvalidConfiguration { .. } => None,
            Self::UpstreamFailure { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MergeLatestError;
    use std::error::Error;
    use std::io;

    #[test]
    fn upstream_failure_exposes_source() {
        let err = MergeLatestError::UpstreamFailure {
            port: 2,
            source: io::Error::new(io::ErrorKind::BrokenPipe, "gone"),
        };
        assert_eq!(err.to_string(), "upstream port 2 failed");
        assert_eq!(err.port(), Some(2));
        assert_eq!(err.source().unwrap().to_string(), "gone");
        assert_eq!(err.into_upstream().unwrap().kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn invalid_configuration_has_no_port() {
        let err = MergeLatestError::<io::Error>::no_ports();
        assert!(err.is_invalid_configuration());
        assert_eq!(err.port(), None);
        assert!(err.source().is_none());
        assert_eq!(
            err.to_string(),
            "invalid merge-latest configuration: at least one input port is required"
        );
    }
}
