//! Snapshot diff engine
//!
//! Compares an optional baseline model against a new model and produces a
//! [`DiffResult`]. Message-level and signal-level diffs are computed
//! independently of each other: a message whose cycle time changed shows up
//! as a changed message without any signal change, and a signal whose scale
//! changed shows up as a changed signal even if its message is unchanged.

use crate::config::DiffConfig;
use crate::fields::{diff_fields, Field, MESSAGE_FIELDS, SIGNAL_FIELDS, UNORDERED_SIGNALS_FIELD};
use crate::index::ModelIndex;
use crate::model::{Message, Model, Signal};
use crate::result::{
    DiffResult, MessageChange, MessageDiff, MessageSummary, SignalChange, SignalDiff, SignalRef,
};
use crate::types::Result;

/// Compare two snapshots with the default configuration
///
/// `old` is `None` when there is no baseline; everything in `new` is then
/// reported as added.
///
/// # Example
/// ```
/// use dbc_diff::{compare, Message, Model, Signal};
///
/// let old = Model::new().with_message(
///     Message::new(100, "Speed", 8)
///         .with_cycle_time(20)
///         .with_signal(Signal::new("v", 0, 16)),
/// );
/// let new = Model::new().with_message(
///     Message::new(100, "Speed", 8)
///         .with_cycle_time(50)
///         .with_signal(Signal::new("v", 0, 16)),
/// );
///
/// let result = compare(Some(&old), &new).unwrap();
/// assert_eq!(result.messages.changed.len(), 1);
/// assert!(result.signals.changed.is_empty());
/// ```
pub fn compare(old: Option<&Model>, new: &Model) -> Result<DiffResult> {
    DiffEngine::default().compare(old, new)
}

/// Diff engine holding the comparison configuration
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    config: DiffConfig,
}

impl DiffEngine {
    /// Create a new engine with the given configuration
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Compare an optional baseline against a new snapshot
    ///
    /// Fails only if either model violates its uniqueness invariants
    /// (duplicate frame ID, or duplicate signal name within a message).
    pub fn compare(&self, old: Option<&Model>, new: &Model) -> Result<DiffResult> {
        let new_index = ModelIndex::build(new)?;

        let (messages, signals) = match old {
            None => {
                log::debug!("No baseline, classifying everything as added");
                (all_messages_added(&new_index), all_signals_added(&new_index))
            }
            Some(old) => {
                let old_index = ModelIndex::build(old)?;
                (
                    self.diff_messages(&old_index, &new_index),
                    self.diff_signals(&old_index, &new_index),
                )
            }
        };

        log::debug!(
            "Messages: +{} -{} ~{}, signals: +{} -{} ~{}",
            messages.added.len(),
            messages.removed.len(),
            messages.changed.len(),
            signals.added.len(),
            signals.removed.len(),
            signals.changed.len()
        );

        Ok(DiffResult {
            messages,
            signals,
            nodes: new.nodes.iter().map(|n| n.name().to_string()).collect(),
        })
    }

    /// Message fields to compare, honoring the configuration
    fn message_fields(&self) -> Vec<&'static Field<Message>> {
        MESSAGE_FIELDS
            .iter()
            .filter(|f| self.config.should_compare_message_field(f.name))
            .map(|f| {
                if f.name == UNORDERED_SIGNALS_FIELD.name && self.config.ignore_signal_order {
                    &UNORDERED_SIGNALS_FIELD
                } else {
                    f
                }
            })
            .collect()
    }

    /// Signal fields to compare, honoring the configuration
    fn signal_fields(&self) -> Vec<&'static Field<Signal>> {
        SIGNAL_FIELDS
            .iter()
            .filter(|f| self.config.should_compare_signal_field(f.name))
            .collect()
    }

    fn diff_messages(&self, old: &ModelIndex<'_>, new: &ModelIndex<'_>) -> MessageDiff {
        let fields = self.message_fields();
        let mut diff = MessageDiff::default();

        for frame_id in new.frame_ids() {
            let Some(new_msg) = new.message(frame_id) else { continue };
            match old.message(frame_id) {
                None => diff.added.push(MessageSummary::from(new_msg)),
                Some(old_msg) => {
                    let diffs = diff_fields(old_msg, new_msg, fields.iter().copied());
                    if !diffs.is_empty() {
                        diff.changed.push(MessageChange {
                            frame_id,
                            name: new_msg.name.clone(),
                            diffs,
                        });
                    }
                }
            }
        }

        diff.removed = old
            .frame_ids()
            .into_iter()
            .filter(|frame_id| !new.contains_message(*frame_id))
            .filter_map(|frame_id| old.message(frame_id))
            .map(MessageSummary::from)
            .collect();

        diff
    }

    fn diff_signals(&self, old: &ModelIndex<'_>, new: &ModelIndex<'_>) -> SignalDiff {
        let fields = self.signal_fields();
        let mut diff = SignalDiff::default();

        for key @ (frame_id, name) in new.signal_keys() {
            let Some(new_sig) = new.signal(key) else { continue };
            match old.signal(key) {
                None => diff.added.push(SignalRef::new(frame_id, name)),
                Some(old_sig) => {
                    let diffs = diff_fields(old_sig, new_sig, fields.iter().copied());
                    if !diffs.is_empty() {
                        diff.changed.push(SignalChange {
                            frame_id,
                            signal_name: name.to_string(),
                            diffs,
                        });
                    }
                }
            }
        }

        diff.removed = old
            .signal_keys()
            .into_iter()
            .filter(|key| !new.contains_signal(*key))
            .map(|(frame_id, name)| SignalRef::new(frame_id, name))
            .collect();

        diff
    }
}

fn all_messages_added(new: &ModelIndex<'_>) -> MessageDiff {
    MessageDiff {
        added: new
            .frame_ids()
            .into_iter()
            .filter_map(|frame_id| new.message(frame_id))
            .map(MessageSummary::from)
            .collect(),
        ..MessageDiff::default()
    }
}

fn all_signals_added(new: &ModelIndex<'_>) -> SignalDiff {
    SignalDiff {
        added: new
            .signal_keys()
            .into_iter()
            .map(|(frame_id, name)| SignalRef::new(frame_id, name))
            .collect(),
        ..SignalDiff::default()
    }
}
