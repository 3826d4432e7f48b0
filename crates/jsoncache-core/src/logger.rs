//! Logging capability injected into a store.
//!
//! Hosts that route messages somewhere specific implement [`Logger`]; the
//! default forwards to `tracing`.

use tracing::{error, info, warn};

pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default logger, forwards to the `tracing` subscriber installed by the host
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        info!(target: "jsoncache", "{}", message);
    }

    fn warn(&self, message: &str) {
        warn!(target: "jsoncache", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "jsoncache", "{}", message);
    }
}
