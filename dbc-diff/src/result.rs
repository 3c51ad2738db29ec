//! Diff result types
//!
//! Plain data produced once per comparison and handed to report renderers.
//! Every list is ordered by ascending frame ID, then signal name.

use crate::fields::FieldDiffs;
use crate::model::Message;
use serde::Serialize;

/// Summary of an added or removed message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageSummary {
    pub frame_id: u32,
    pub name: String,
    pub length: u64,
    pub cycle_time: Option<u64>,
    /// Signal names in declaration order
    pub signals: Vec<String>,
}

impl From<&Message> for MessageSummary {
    fn from(message: &Message) -> Self {
        Self {
            frame_id: message.frame_id,
            name: message.name.clone(),
            length: message.length,
            cycle_time: message.cycle_time,
            signals: message.signal_names(),
        }
    }
}

/// A message present in both snapshots with at least one changed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageChange {
    pub frame_id: u32,
    /// Name in the new snapshot
    pub name: String,
    pub diffs: FieldDiffs,
}

/// An added or removed signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalRef {
    pub frame_id: u32,
    pub signal_name: String,
}

impl SignalRef {
    pub fn new(frame_id: u32, signal_name: impl Into<String>) -> Self {
        Self {
            frame_id,
            signal_name: signal_name.into(),
        }
    }
}

/// A signal present in both snapshots with at least one changed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalChange {
    pub frame_id: u32,
    pub signal_name: String,
    pub diffs: FieldDiffs,
}

/// Message-level diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageDiff {
    pub added: Vec<MessageSummary>,
    pub removed: Vec<MessageSummary>,
    pub changed: Vec<MessageChange>,
}

/// Signal-level diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignalDiff {
    pub added: Vec<SignalRef>,
    pub removed: Vec<SignalRef>,
    pub changed: Vec<SignalChange>,
}

/// Result of comparing two snapshots of one network definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    pub messages: MessageDiff,
    pub signals: SignalDiff,
    /// Node names of the new snapshot
    pub nodes: Vec<String>,
}

impl DiffResult {
    /// True if nothing was added, removed or changed
    pub fn is_empty(&self) -> bool {
        self.messages.added.is_empty()
            && self.messages.removed.is_empty()
            && self.messages.changed.is_empty()
            && self.signals.added.is_empty()
            && self.signals.removed.is_empty()
            && self.signals.changed.is_empty()
    }

    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            messages_added: self.messages.added.len(),
            messages_removed: self.messages.removed.len(),
            messages_changed: self.messages.changed.len(),
            signals_added: self.signals.added.len(),
            signals_removed: self.signals.removed.len(),
            signals_changed: self.signals.changed.len(),
        }
    }
}

/// Counts of each diff category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub messages_added: usize,
    pub messages_removed: usize,
    pub messages_changed: usize,
    pub signals_added: usize,
    pub signals_removed: usize,
    pub signals_changed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Signal;

    #[test]
    fn test_summary_from_message() {
        let message = Message::new(200, "Brake", 4)
            .with_cycle_time(10)
            .with_signal(Signal::new("Pressure", 0, 16))
            .with_signal(Signal::new("Active", 16, 1));

        let summary = MessageSummary::from(&message);
        assert_eq!(summary.frame_id, 200);
        assert_eq!(summary.name, "Brake");
        assert_eq!(summary.length, 4);
        assert_eq!(summary.cycle_time, Some(10));
        assert_eq!(summary.signals, vec!["Pressure", "Active"]);
    }

    #[test]
    fn test_empty_result() {
        let result = DiffResult::default();
        assert!(result.is_empty());
        assert_eq!(result.summary(), DiffSummary::default());
    }

    #[test]
    fn test_summary_counts() {
        let mut result = DiffResult::default();
        result.signals.added.push(SignalRef::new(100, "v"));
        result.signals.removed.push(SignalRef::new(100, "a"));
        result.signals.removed.push(SignalRef::new(101, "b"));

        assert!(!result.is_empty());
        let summary = result.summary();
        assert_eq!(summary.signals_added, 1);
        assert_eq!(summary.signals_removed, 2);
        assert_eq!(summary.messages_changed, 0);
    }
}
