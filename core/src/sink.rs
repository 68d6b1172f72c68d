//! Where the dispatcher reports failed requests.

use log::info;

/// Receives one human-readable message per failed request.
pub trait DiagnosticSink {
    fn emit(&self, message: &str);
}

/// Forwards diagnostics to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, message: &str) {
        info!("{message}");
    }
}

impl<F> DiagnosticSink for F
where
    F: Fn(&str),
{
    fn emit(&self, message: &str) {
        self(message)
    }
}
