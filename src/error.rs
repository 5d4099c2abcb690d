//! Error types used by the bus and by listeners.
//!
//! This module defines two error enums:
//!
//! - [`ListenerError`]: failures reported by a listener while handling an event.
//! - [`DispatchError`]: failures surfaced to the caller of `dispatch`.
//!
//! Both provide helper methods (`as_label`, `as_message`) for logging/metrics.

use thiserror::Error;

/// Boxed error type accepted as a listener failure cause.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors reported by listeners.
///
/// A listener returns one of these from [`Listener::handle`](crate::Listener::handle)
/// to abort the current dispatch.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ListenerError {
    /// The listener refused the event; no underlying cause.
    #[error("{message}")]
    Rejected {
        /// Explanation given by the listener.
        message: String,
    },

    /// An underlying operation failed.
    #[error("{source}")]
    Failed {
        /// The underlying failure.
        source: BoxError,
    },

    /// An underlying operation failed; the listener added an explanation.
    #[error("{message}: {source}")]
    Context {
        /// Explanation given by the listener.
        message: String,
        /// The underlying failure.
        source: BoxError,
    },
}

impl ListenerError {
    /// Rejects the event with a message and no cause.
    pub fn rejected(message: impl Into<String>) -> Self {
        ListenerError::Rejected {
            message: message.into(),
        }
    }

    /// Wraps an underlying failure.
    ///
    /// # Example
    /// ```
    /// use typebus::ListenerError;
    ///
    /// let io = std::io::Error::other("disk full");
    /// let err = ListenerError::fail(io);
    /// assert_eq!(err.to_string(), "disk full");
    /// assert_eq!(err.as_label(), "listener_failed");
    /// ```
    pub fn fail(source: impl Into<BoxError>) -> Self {
        ListenerError::Failed {
            source: source.into(),
        }
    }

    /// Wraps an underlying failure with an explanatory message.
    pub fn context(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ListenerError::Context {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Rejected { .. } => "listener_rejected",
            ListenerError::Failed { .. } => "listener_failed",
            ListenerError::Context { .. } => "listener_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ListenerError::Rejected { message } => format!("rejected: {message}"),
            ListenerError::Failed { source } => format!("error: {source}"),
            ListenerError::Context { message, source } => format!("error: {message}: {source}"),
        }
    }

    /// The explanatory message, if the listener gave one.
    pub fn message(&self) -> Option<&str> {
        match self {
            ListenerError::Rejected { message } | ListenerError::Context { message, .. } => {
                Some(message.as_str())
            }
            ListenerError::Failed { .. } => None,
        }
    }
}

/// # Errors produced by [`EventBus::dispatch`](crate::EventBus::dispatch).
///
/// Dispatch is fail-fast: the first failing listener aborts the remaining
/// invocations and its error is returned here. The bus itself is unaffected.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A listener reported a failure.
    #[error("listener '{listener}' failed handling {event}: {source}")]
    Listener {
        /// Name of the failing listener.
        listener: &'static str,
        /// Type name of the dispatched event.
        event: &'static str,
        /// What the listener reported.
        source: ListenerError,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use typebus::{DispatchError, ListenerError};
    ///
    /// let err = DispatchError::Listener {
    ///     listener: "audit",
    ///     event: "OrderPlaced",
    ///     source: ListenerError::rejected("closed"),
    /// };
    /// assert_eq!(err.as_label(), "dispatch_listener_failed");
    /// assert_eq!(err.message(), Some("closed"));
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Listener { .. } => "dispatch_listener_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::Listener {
                listener,
                event,
                source,
            } => format!("listener={listener} event={event} {}", source.as_message()),
        }
    }

    /// Name of the listener that failed.
    pub fn listener(&self) -> &'static str {
        match self {
            DispatchError::Listener { listener, .. } => *listener,
        }
    }

    /// The failure reported by the listener.
    pub fn listener_error(&self) -> &ListenerError {
        match self {
            DispatchError::Listener { source, .. } => source,
        }
    }

    /// The listener's explanatory message, if any.
    pub fn message(&self) -> Option<&str> {
        self.listener_error().message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_context_keeps_source() {
        let err = ListenerError::context("write failed", std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "write failed: disk full");
        assert_eq!(err.message(), Some("write failed"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_rejected_has_no_source() {
        let err = ListenerError::rejected("not now");
        assert!(err.source().is_none());
        assert_eq!(err.as_label(), "listener_rejected");
    }

    #[test]
    fn test_dispatch_error_chains_to_listener_error() {
        let err = DispatchError::Listener {
            listener: "audit",
            event: "Order",
            source: ListenerError::fail(std::io::Error::other("boom")),
        };
        assert_eq!(err.listener(), "audit");
        assert_eq!(err.message(), None);
        assert_eq!(err.to_string(), "listener 'audit' failed handling Order: boom");
        let inner = err.source().map(|s| s.to_string());
        assert_eq!(inner.as_deref(), Some("boom"));
    }
}
