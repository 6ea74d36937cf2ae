use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{Event, Level, Subscriber, field::Visit};
use tracing_subscriber::layer::{Context, Layer};

/// Maximum number of entries kept for the log panel.
pub const LOG_CAPACITY: usize = 1000;

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub level: Level,
    pub timestamp: String,
    pub message: String,
    pub target: String,
}

impl LogEntry {
    pub fn new(level: Level, message: String, target: String) -> Self {
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        Self {
            level,
            timestamp,
            message,
            target,
        }
    }

    pub fn level_name(&self) -> &'static str {
        match self.level {
            Level::ERROR => "ERROR",
            Level::WARN => "WARN",
            Level::INFO => "INFO",
            Level::DEBUG => "DEBUG",
            Level::TRACE => "TRACE",
        }
    }

    pub fn to_line(&self) -> String {
        format!(
            "[{}] {} {}: {}",
            self.timestamp,
            self.level_name(),
            self.target,
            self.message
        )
    }
}

/// Append an entry, dropping the oldest ones past [`LOG_CAPACITY`].
pub fn push_bounded(buf: &mut Vec<LogEntry>, entry: LogEntry) {
    buf.push(entry);
    if buf.len() > LOG_CAPACITY {
        let excess = buf.len() - LOG_CAPACITY;
        buf.drain(0..excess);
    }
}

static LOG_BUFFER: once_cell::sync::Lazy<Arc<Mutex<Vec<LogEntry>>>> =
    once_cell::sync::Lazy::new(|| Arc::new(Mutex::new(Vec::new())));

pub fn get_log_buffer() -> Arc<Mutex<Vec<LogEntry>>> {
    LOG_BUFFER.clone()
}

/// Tracing layer that forwards events to the log panel.
#[derive(Clone)]
pub struct GuiLogLayer {
    buffer: Arc<Mutex<Vec<LogEntry>>>,
}

impl GuiLogLayer {
    pub fn new() -> Self {
        Self::with_buffer(get_log_buffer())
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<LogEntry>>>) -> Self {
        Self { buffer }
    }
}

impl Default for GuiLogLayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects the message plus any structured fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.join(" ")
        } else {
            format!("{} {}", self.message, self.fields.join(" "))
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

impl<S> Layer<S> for GuiLogLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let mut message = visitor.finish();
        if message.is_empty() {
            message = metadata.target().to_string();
        }

        let entry = LogEntry::new(*metadata.level(), message, metadata.target().to_string());
        if let Ok(mut buf) = self.buffer.lock() {
            push_bounded(&mut buf, entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn layer_captures_message_and_fields() {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let subscriber = Registry::default().with(GuiLogLayer::with_buffer(buffer.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(field = "fixed_modifications", "Invalid line");
            tracing::info!("Rescoring finished");
        });

        let logs = buffer.lock().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].level, Level::WARN);
        assert_eq!(logs[0].message, "Invalid line field=fixed_modifications");
        assert_eq!(logs[1].message, "Rescoring finished");
        assert!(logs[1].to_line().contains("INFO"));
    }

    #[test]
    fn buffer_is_bounded() {
        let mut buf = Vec::new();
        for i in 0..LOG_CAPACITY + 5 {
            push_bounded(&mut buf, LogEntry::new(Level::INFO, i.to_string(), "t".into()));
        }
        assert_eq!(buf.len(), LOG_CAPACITY);
        assert_eq!(buf[0].message, "5");
    }
}
