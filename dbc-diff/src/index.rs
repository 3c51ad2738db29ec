//! Lookup indexes over a model
//!
//! Built fresh for every comparison in one pass over the model. Key
//! collisions are errors, never silent overwrites.

use crate::model::{Message, Model, Signal};
use crate::types::{DiffError, DuplicateKey, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Signal index key: (frame ID, signal name)
pub type SignalKey<'a> = (u32, &'a str);

/// Borrowed indexes over one model
///
/// Signals are keyed per frame ID, then by name, which lets lookups take a
/// name borrowed from any other model.
#[derive(Debug)]
pub struct ModelIndex<'a> {
    messages_by_id: HashMap<u32, &'a Message>,
    signals_by_key: HashMap<u32, HashMap<&'a str, &'a Signal>>,
    num_signals: usize,
}

impl<'a> ModelIndex<'a> {
    /// Index a model by frame ID and by (frame ID, signal name)
    pub fn build(model: &'a Model) -> Result<Self> {
        let mut messages_by_id = HashMap::with_capacity(model.messages.len());
        let mut signals_by_key: HashMap<u32, HashMap<&'a str, &'a Signal>> = HashMap::new();
        let mut num_signals = 0;

        for message in &model.messages {
            match messages_by_id.entry(message.frame_id) {
                Entry::Occupied(_) => {
                    return Err(DiffError::DuplicateKey(DuplicateKey::FrameId(message.frame_id)));
                }
                Entry::Vacant(slot) => {
                    slot.insert(message);
                }
            }

            let signals = signals_by_key.entry(message.frame_id).or_default();
            for signal in &message.signals {
                match signals.entry(signal.name.as_str()) {
                    Entry::Occupied(_) => {
                        return Err(DiffError::DuplicateKey(DuplicateKey::Signal {
                            frame_id: message.frame_id,
                            signal: signal.name.clone(),
                        }));
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(signal);
                        num_signals += 1;
                    }
                }
            }
        }

        Ok(Self {
            messages_by_id,
            signals_by_key,
            num_signals,
        })
    }

    pub fn message(&self, frame_id: u32) -> Option<&'a Message> {
        self.messages_by_id.get(&frame_id).copied()
    }

    pub fn signal(&self, (frame_id, name): SignalKey<'_>) -> Option<&'a Signal> {
        self.signals_by_key
            .get(&frame_id)
            .and_then(|signals| signals.get(name))
            .copied()
    }

    pub fn contains_message(&self, frame_id: u32) -> bool {
        self.messages_by_id.contains_key(&frame_id)
    }

    pub fn contains_signal(&self, key: SignalKey<'_>) -> bool {
        self.signal(key).is_some()
    }

    /// All frame IDs, ascending
    pub fn frame_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.messages_by_id.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// All signal keys, ascending by frame ID then signal name
    pub fn signal_keys(&self) -> Vec<SignalKey<'a>> {
        let mut keys: Vec<SignalKey<'a>> = self
            .signals_by_key
            .iter()
            .flat_map(|(&frame_id, signals)| signals.keys().map(move |&name| (frame_id, name)))
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn num_messages(&self) -> usize {
        self.messages_by_id.len()
    }

    pub fn num_signals(&self) -> usize {
        self.num_signals
    }
}
