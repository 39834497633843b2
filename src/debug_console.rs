//! In-app debug console: a `tracing` layer that keeps the most recent log
//! events in memory so they can be shown on a page instead of a terminal.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsoleEntry {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl fmt::Display for ConsoleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.timestamp.format("%H:%M:%S"),
            self.level,
            self.target,
            self.message
        )
    }
}

/// Bounded capture of log events. Clones share the same buffer, so one copy
/// can be registered with the subscriber and another kept for reading.
#[derive(Debug, Clone)]
pub struct DebugConsole {
    capacity: usize,
    entries: Arc<Mutex<VecDeque<ConsoleEntry>>>,
}

impl DebugConsole {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn push(&self, entry: ConsoleEntry) {
        // A poisoned buffer just stops capturing
        if let Ok(mut entries) = self.entries.lock() {
            if entries.len() == self.capacity {
                entries.pop_front();
            }
            entries.push_back(entry);
        }
    }

    /// Captured entries, oldest first.
    pub fn entries(&self) -> Vec<ConsoleEntry> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// One line per entry.
    pub fn render(&self) -> String {
        self.entries()
            .iter()
            .map(|entry| entry.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<S: Subscriber> Layer<S> for DebugConsole {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.push(ConsoleEntry {
            timestamp: Utc::now(),
            level: metadata.level().to_string(),
            target: metadata.target().to_string(),
            message: visitor.finish(),
        });
    }
}

/// Collects the `message` field plus any other fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.record_debug(field, &value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
            return;
        }
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={:?}", field.name(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    fn capture(console: &DebugConsole, f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(console.clone());
        tracing::subscriber::with_default(subscriber, f);
    }

    #[test]
    fn test_captures_message_and_level() {
        let console = DebugConsole::new(10);
        capture(&console, || {
            tracing::info!("Fetched {} coaches", 3);
            tracing::warn!("Store returned 503");
        });

        let entries = console.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, "INFO");
        assert_eq!(entries[0].message, "Fetched 3 coaches");
        assert_eq!(entries[1].level, "WARN");
    }

    #[test]
    fn test_extra_fields_appended() {
        let console = DebugConsole::new(10);
        capture(&console, || {
            tracing::info!(coach_id = 7, "Opened reviews");
        });

        assert_eq!(console.entries()[0].message, "Opened reviews coach_id=7");
    }

    #[test]
    fn test_oldest_dropped_at_capacity() {
        let console = DebugConsole::new(2);
        capture(&console, || {
            tracing::info!("one");
            tracing::info!("two");
            tracing::info!("three");
        });

        let messages: Vec<_> = console.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["two", "three"]);
    }

    #[test]
    fn test_clear_and_render() {
        let console = DebugConsole::new(5);
        capture(&console, || tracing::error!("boom"));

        let rendered = console.render();
        assert!(rendered.starts_with('['));
        assert!(rendered.ends_with("ERROR coach_directory::debug_console::tests: boom"));

        console.clear();
        assert!(console.entries().is_empty());
        assert_eq!(console.render(), "");
    }

    #[test]
    fn test_zero_capacity_clamped() {
        assert_eq!(DebugConsole::new(0).capacity(), 1);
    }
}
