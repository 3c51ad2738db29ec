//! In-memory network definition model
//!
//! One [`Model`] per snapshot. Messages exclusively own their signals; senders
//! are node names only. Models are built once by a loader and never mutated
//! by the diff engine.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A participant (ECU) in the network definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node(pub String);

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Byte order of a signal within the frame payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// Little-endian (Intel format)
    LittleEndian,
    /// Big-endian (Motorola format)
    BigEndian,
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::LittleEndian => write!(f, "little_endian"),
            ByteOrder::BigEndian => write!(f, "big_endian"),
        }
    }
}

/// A signal definition inside a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Signal name, unique within its message
    pub name: String,
    /// Start bit in the frame
    pub start: u64,
    /// Length in bits
    pub length: u64,
    pub byte_order: ByteOrder,
    pub is_signed: bool,
    /// Scale factor to convert raw value to physical value
    pub scale: f64,
    /// Offset to add after scaling
    pub offset: f64,
    /// Minimum physical value, if specified
    pub minimum: Option<f64>,
    /// Maximum physical value, if specified
    pub maximum: Option<f64>,
    /// Engineering unit (e.g., "km/h", "V")
    pub unit: Option<String>,
    /// Value table (raw value -> label)
    pub choices: BTreeMap<i64, String>,
    /// True if this signal selects the active multiplexed group
    pub is_multiplexer: bool,
    /// Name of the multiplexer signal controlling this one
    pub multiplexer_signal: Option<String>,
    /// Multiplexer values for which this signal is present
    pub multiplexer_ids: Option<BTreeSet<u64>>,
}

impl Signal {
    /// Create an unsigned little-endian signal with unit scaling and no metadata
    pub fn new(name: impl Into<String>, start: u64, length: u64) -> Self {
        Self {
            name: name.into(),
            start,
            length,
            byte_order: ByteOrder::LittleEndian,
            is_signed: false,
            scale: 1.0,
            offset: 0.0,
            minimum: None,
            maximum: None,
            unit: None,
            choices: BTreeMap::new(),
            is_multiplexer: false,
            multiplexer_signal: None,
            multiplexer_ids: None,
        }
    }

    pub fn with_scaling(mut self, scale: f64, offset: f64) -> Self {
        self.scale = scale;
        self.offset = offset;
        self
    }

    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_choice(mut self, raw: i64, label: impl Into<String>) -> Self {
        self.choices.insert(raw, label.into());
        self
    }

    pub fn signed(mut self) -> Self {
        self.is_signed = true;
        self
    }

    /// Mark this signal as the multiplexer of its message
    pub fn multiplexer(mut self) -> Self {
        self.is_multiplexer = true;
        self
    }

    /// Mark this signal as multiplexed by `multiplexer` for the given values
    pub fn multiplexed_by(
        mut self,
        multiplexer: impl Into<String>,
        ids: impl IntoIterator<Item = u64>,
    ) -> Self {
        self.multiplexer_signal = Some(multiplexer.into());
        self.multiplexer_ids = Some(ids.into_iter().collect());
        self
    }
}

/// A message (frame) definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Frame identifier, unique within a model
    pub frame_id: u32,
    pub name: String,
    /// Payload size in bytes
    pub length: u64,
    /// Transmission cycle in milliseconds
    pub cycle_time: Option<u64>,
    /// Names of the transmitting nodes
    pub senders: Vec<String>,
    /// Signals in declaration order
    pub signals: Vec<Signal>,
}

impl Message {
    pub fn new(frame_id: u32, name: impl Into<String>, length: u64) -> Self {
        Self {
            frame_id,
            name: name.into(),
            length,
            cycle_time: None,
            senders: Vec::new(),
            signals: Vec::new(),
        }
    }

    pub fn with_cycle_time(mut self, cycle_time: u64) -> Self {
        self.cycle_time = Some(cycle_time);
        self
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.senders.push(sender.into());
        self
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signals.push(signal);
        self
    }

    /// Signal names in declaration order
    pub fn signal_names(&self) -> Vec<String> {
        self.signals.iter().map(|s| s.name.clone()).collect()
    }
}

/// One snapshot of a network definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub nodes: Vec<Node>,
    pub messages: Vec<Message>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.nodes.push(Node::new(node));
        self
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Iterate every signal together with the frame ID of its message
    pub fn signals(&self) -> impl Iterator<Item = (u32, &Signal)> {
        self.messages
            .iter()
            .flat_map(|msg| msg.signals.iter().map(move |sig| (msg.frame_id, sig)))
    }

    /// Get model statistics
    pub fn stats(&self) -> ModelStats {
        ModelStats {
            num_nodes: self.nodes.len(),
            num_messages: self.messages.len(),
            num_signals: self.messages.iter().map(|m| m.signals.len()).sum(),
        }
    }
}

/// Model statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStats {
    pub num_nodes: usize,
    pub num_messages: usize,
    pub num_signals: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_message() -> Message {
        Message::new(0x123, "EngineData", 8)
            .with_sender("ECU1")
            .with_cycle_time(100)
            .with_signal(Signal::new("EngineSpeed", 0, 16).with_range(0.0, 8000.0).with_unit("rpm"))
            .with_signal(Signal::new("EngineTemp", 16, 8).with_scaling(1.0, -40.0))
    }

    #[test]
    fn test_empty_model() {
        let model = Model::new();
        let stats = model.stats();
        assert_eq!(stats.num_nodes, 0);
        assert_eq!(stats.num_messages, 0);
        assert_eq!(stats.num_signals, 0);
    }

    #[test]
    fn test_stats_and_signal_iteration() {
        let model = Model::new()
            .with_node("ECU1")
            .with_node("ECU2")
            .with_message(engine_message())
            .with_message(Message::new(0x200, "Battery", 8).with_signal(Signal::new("Voltage", 0, 16)));

        let stats = model.stats();
        assert_eq!(stats.num_nodes, 2);
        assert_eq!(stats.num_messages, 2);
        assert_eq!(stats.num_signals, 3);

        let keys: Vec<(u32, &str)> = model.signals().map(|(id, s)| (id, s.name.as_str())).collect();
        assert_eq!(
            keys,
            vec![(0x123, "EngineSpeed"), (0x123, "EngineTemp"), (0x200, "Voltage")]
        );
    }

    #[test]
    fn test_signal_builders() {
        let sig = Signal::new("SignalA", 8, 16)
            .with_byte_order(ByteOrder::BigEndian)
            .signed()
            .multiplexed_by("Mode", [0, 2])
            .with_choice(0, "Off")
            .with_choice(1, "On");

        assert_eq!(sig.byte_order, ByteOrder::BigEndian);
        assert!(sig.is_signed);
        assert!(!sig.is_multiplexer);
        assert_eq!(sig.multiplexer_signal.as_deref(), Some("Mode"));
        assert_eq!(sig.multiplexer_ids, Some(BTreeSet::from([0, 2])));
        assert_eq!(sig.choices.get(&1).map(String::as_str), Some("On"));
    }

    #[test]
    fn test_signal_names_keep_order() {
        assert_eq!(engine_message().signal_names(), vec!["EngineSpeed", "EngineTemp"]);
    }

    #[test]
    fn test_byte_order_display() {
        assert_eq!(ByteOrder::LittleEndian.to_string(), "little_endian");
        assert_eq!(ByteOrder::BigEndian.to_string(), "big_endian");
    }
}
