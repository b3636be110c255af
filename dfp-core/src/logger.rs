//! Debug-gated diagnostic logger
//!
//! Thin wrapper over `tracing`. Informational messages are only emitted when
//! the debug flag is set; warnings and errors are always emitted. Nothing here
//! can fail or alter the caller's control flow.

use serde_json::Value;
use tracing::{error, info, warn};

use crate::constants::logging::{PREFIX, TARGET};

#[derive(Debug, Clone, Copy, Default)]
pub struct Logger {
    debug: bool,
}

impl Logger {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Informational message, dropped unless debug is enabled
    pub fn log(&self, message: &str, data: Option<&Value>) {
        if !self.debug {
            return;
        }
        match data {
            Some(data) => info!(target: TARGET, data = %data, "{} {}", PREFIX, message),
            None => info!(target: TARGET, "{} {}", PREFIX, message),
        }
    }

    pub fn warn(&self, message: &str, data: Option<&Value>) {
        match data {
            Some(data) => warn!(target: TARGET, data = %data, "{} {}", PREFIX, message),
            None => warn!(target: TARGET, "{} {}", PREFIX, message),
        }
    }

    pub fn error(&self, message: &str, data: Option<&Value>) {
        match data {
            Some(data) => error!(target: TARGET, data = %data, "{} {}", PREFIX, message),
            None => error!(target: TARGET, "{} {}", PREFIX, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    type Record = (Level, String, String);

    /// Layer that keeps level, target and message of every event
    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Record>>>);

    struct MessageVisitor(String);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{:?}", value);
            }
        }
    }

    impl<S: Subscriber> Layer<S> for Recorder {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            let meta = event.metadata();
            self.0
                .lock()
                .unwrap()
                .push((*meta.level(), meta.target().to_string(), visitor.0));
        }
    }

    fn record(f: impl FnOnce()) -> Vec<Record> {
        let recorder = Recorder::default();
        let subscriber = tracing_subscriber::registry().with(recorder.clone());
        tracing::subscriber::with_default(subscriber, f);
        let events = recorder.0.lock().unwrap().clone();
        events
    }

    #[test]
    fn test_logging_never_panics() {
        for debug in [false, true] {
            let logger = Logger::new(debug);
            assert_eq!(logger.is_debug(), debug);
            logger.log("info", None);
            logger.log("info", Some(&json!({"k": 1})));
            logger.warn("warn", Some(&json!("payload")));
            logger.error("error", None);
        }
    }

    #[test]
    fn test_info_only_with_debug() {
        let quiet = record(|| Logger::new(false).log("Using cached fingerprint", None));
        assert!(quiet.is_empty());

        let verbose = record(|| {
            Logger::new(true).log("Generated new fingerprint", Some(&json!("abc")))
        });
        assert_eq!(verbose.len(), 1);
        let (level, target, message) = &verbose[0];
        assert_eq!(*level, Level::INFO);
        assert_eq!(target, TARGET);
        assert_eq!(message, &format!("{} Generated new fingerprint", PREFIX));
    }

    #[test]
    fn test_warnings_and_errors_always_emitted() {
        for debug in [false, true] {
            let events = record(|| {
                let logger = Logger::new(debug);
                logger.warn("Battery info not available", Some(&json!("denied")));
                logger.error("Failed to collect basic information", None);
            });
            assert_eq!(events.len(), 2, "debug = {}", debug);
            assert_eq!(events[0].0, Level::WARN);
            assert_eq!(events[1].0, Level::ERROR);
            for (_, target, message) in &events {
                assert_eq!(target, "devicefp");
                assert!(message.starts_with("[DeviceFingerprint] "), "{}", message);
            }
        }
    }
}
