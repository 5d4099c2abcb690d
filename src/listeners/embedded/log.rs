//! # LogListener: event tracer
//!
//! A minimal listener that records every event of type `T` through `tracing`
//! at `INFO` level. Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! INFO typebus::listeners::embedded::log: event listener="orders" event=OrderPlaced { id: 7 }
//! ```

use std::fmt::Debug;
use std::marker::PhantomData;

use crate::error::ListenerError;
use crate::listeners::Listener;

/// Event logging listener.
pub struct LogListener<T> {
    label: &'static str,
    _event: PhantomData<fn(&T)>,
}

impl<T> LogListener<T> {
    /// Construct a new [`LogListener`] tagged with `label` in every record.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            _event: PhantomData,
        }
    }
}

impl<T> Default for LogListener<T> {
    fn default() -> Self {
        Self::new(std::any::type_name::<T>())
    }
}

impl<T: Debug + 'static> Listener for LogListener<T> {
    type Event = T;

    fn handle(&self, event: &T) -> Result<(), ListenerError> {
        tracing::info!(listener = self.label, ?event, "event");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LogListener"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventBus;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Heartbeat {
        seq: u64,
    }

    #[test]
    fn test_log_listener_never_fails() {
        let bus = EventBus::new();
        let log = Arc::new(LogListener::<Heartbeat>::new("heartbeat"));
        bus.register(&log);
        for seq in 0..3 {
            let beat = Heartbeat { seq };
            assert!(beat.seq < 3);
            bus.dispatch(&beat).unwrap();
        }
        assert_eq!(log.name(), "LogListener");
    }
}
