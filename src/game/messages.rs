//! Message log
//!
//! Bounded, append-only list of colored lines shown under the map.

use std::collections::VecDeque;

/// Symbolic colors used by core messages; the theme maps them to RGB.
pub mod tags {
    pub const DEFAULT: &str = "ui_default";
    pub const TEXT: &str = "ui_text";
    pub const EMPHASIS: &str = "ui_emphasis";
    pub const GOLD: &str = "ui_gold";
    pub const FIRE: &str = "fx_fire";
}

/// Default number of entries kept
pub const DEFAULT_CAPACITY: usize = 50;

/// A single log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub text: String,
    pub color: String,
}

/// Append-only log that evicts its oldest entry once full
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a line in the default color
    pub fn add(&mut self, text: impl Into<String>) {
        self.add_colored(text, tags::DEFAULT);
    }

    pub fn add_colored(&mut self, text: impl Into<String>, color: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            text: text.into(),
            color: color.into(),
        });
    }

    pub fn entries(&self) -> std::collections::vec_deque::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry contains `needle`
    #[cfg(test)]
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.text.contains(needle))
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let mut log = MessageLog::new(3);
        for i in 0..5 {
            log.add(format!("line {i}"));
        }
        assert_eq!(log.len(), 3);
        let texts: Vec<_> = log.entries().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_colors_kept() {
        let mut log = MessageLog::default();
        log.add_colored("Level Up!", tags::GOLD);
        assert_eq!(log.last().unwrap().color, "ui_gold");
        log.add("plain");
        assert_eq!(log.last().unwrap().color, tags::DEFAULT);
    }
}
