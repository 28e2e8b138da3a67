//! Transmission history for debugging and diagnostics.

use std::collections::VecDeque;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::frame::{Frame, FrameKind};

/// A frame written to the link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: FrameKind,
    pub command: u8,
    /// Hex dump of the whole frame
    pub frame: String,
    /// Seconds since history creation
    pub timestamp: f64,
}

/// Tracks what the worker has written, bounded to the most recent frames.
#[derive(Debug, Clone)]
pub struct FrameHistory {
    command_count: usize,
    keep_alive_count: usize,
    last_error: Option<String>,
    start_time: Instant,
    last_transmit: Option<Instant>,
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl Default for FrameHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameHistory {
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    pub fn new() -> Self {
        Self::with_max_entries(Self::DEFAULT_MAX_ENTRIES)
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            command_count: 0,
            keep_alive_count: 0,
            last_error: None,
            start_time: Instant::now(),
            last_transmit: None,
            entries: VecDeque::new(),
            max_entries,
        }
    }

    pub fn record(&mut self, frame: &Frame) {
        match frame.kind() {
            FrameKind::Command => self.command_count += 1,
            FrameKind::KeepAlive => self.keep_alive_count += 1,
        }

        let now = Instant::now();
        self.last_transmit = Some(now);
        self.entries.push_back(HistoryEntry {
            kind: frame.kind(),
            command: frame.command(),
            frame: frame.to_string(),
            timestamp: now.duration_since(self.start_time).as_secs_f64(),
        });

        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn record_error(&mut self, error: &str) {
        self.last_error = Some(error.to_string());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget recorded frames and counters. The last error is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.command_count = 0;
        self.keep_alive_count = 0;
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            command_count: self.command_count,
            keep_alive_count: self.keep_alive_count,
            total_entries: self.entries.len(),
            seconds_since_last_transmit: self.last_transmit.map(|t| t.elapsed().as_secs_f64()),
            last_error: self.last_error.clone(),
        }
    }
}

/// Summary of transmission history for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySummary {
    pub command_count: usize,
    pub keep_alive_count: usize,
    pub total_entries: usize,
    pub seconds_since_last_transmit: Option<f64>,
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{encode, encode_keep_alive};

    #[test]
    fn test_record_counts_by_kind() {
        let mut history = FrameHistory::new();
        history.record(&encode(FrameKind::Command, 0x01, &[1]).unwrap());
        history.record(&encode_keep_alive());

        let summary = history.summary();
        assert_eq!(summary.command_count, 1);
        assert_eq!(summary.keep_alive_count, 1);
        assert!(summary.seconds_since_last_transmit.is_some());
        assert_eq!(
            history.entries().next().unwrap().frame,
            "3301010000000000000000000000000000000033"
        );
    }

    #[test]
    fn test_record_error() {
        let mut history = FrameHistory::new();
        history.record_error("link lost");
        assert_eq!(history.last_error(), Some("link lost"));
    }

    #[test]
    fn test_clear_keeps_last_error() {
        let mut history = FrameHistory::new();
        history.record(&encode_keep_alive());
        history.record_error("link lost");
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.summary().keep_alive_count, 0);
        assert_eq!(history.last_error(), Some("link lost"));
    }

    #[test]
    fn test_max_entries() {
        let mut history = FrameHistory::with_max_entries(2);
        for i in 0..5 {
            history.record(&encode(FrameKind::Command, 0x04, &[i]).unwrap());
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.summary().command_count, 5);
        let commands: Vec<u8> = history.entries().map(|e| e.command).collect();
        assert_eq!(commands, vec![0x04, 0x04]);
    }
}
