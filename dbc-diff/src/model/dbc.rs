//! DBC file loader
//!
//! Parses Vector DBC files with `can-dbc` and converts them into the
//! in-memory [`Model`].

use crate::model::database::{ByteOrder, Message, Model, Node, Signal};
use crate::model::ModelLoader;
use crate::types::{DiffError, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Message attribute carrying the transmission cycle in milliseconds
const CYCLE_TIME_ATTRIBUTE: &str = "GenMsgCycleTime";

/// Flag bit marking extended (29-bit) frame IDs in DBC files
const EXTENDED_FRAME_FLAG: u32 = 0x8000_0000;

/// Loads DBC files into a [`Model`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DbcLoader;

impl ModelLoader for DbcLoader {
    fn load(&self, path: &Path) -> Result<Model> {
        parse_dbc_file(path)
    }
}

/// Parse a DBC file from disk
pub fn parse_dbc_file(path: &Path) -> Result<Model> {
    log::info!("Parsing DBC file: {:?}", path);

    let bytes = std::fs::read(path).map_err(|e| {
        DiffError::LoadError(format!("Failed to read file {:?}: {}", path, e))
    })?;

    let model = parse_dbc_bytes(bytes).map_err(|e| match e {
        DiffError::LoadError(reason) => DiffError::LoadError(format!("{:?}: {}", path, reason)),
        other => other,
    })?;

    log::info!(
        "Parsed {} messages from {:?}",
        model.messages.len(),
        path
    );

    Ok(model)
}

/// Parse DBC content held in memory
pub fn parse_dbc_bytes(bytes: Vec<u8>) -> Result<Model> {
    // Try UTF-8 first, then fall back to Latin-1 (compatible with Windows-1252)
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => {
            log::warn!("DBC file is not UTF-8, trying Latin-1 encoding");
            e.into_bytes().iter().map(|&b| b as char).collect()
        }
    };

    let dbc = can_dbc::DBC::from_slice(content.as_bytes())
        .map_err(|e| DiffError::LoadError(format!("Failed to parse DBC: {:?}", e)))?;

    let nodes = dbc
        .nodes()
        .iter()
        .flat_map(|node| node.0.iter())
        .map(|name| Node::new(name.as_str()))
        .collect();

    let messages = dbc
        .messages()
        .iter()
        .map(|dbc_msg| convert_message(&dbc, dbc_msg))
        .collect();

    Ok(Model { nodes, messages })
}

/// Convert a can-dbc message to our Message
fn convert_message(dbc: &can_dbc::DBC, dbc_msg: &can_dbc::Message) -> Message {
    let raw_id = dbc_msg.message_id().0;

    // The multiplexer must be known before converting the multiplexed signals
    let multiplexer = dbc_msg
        .signals()
        .iter()
        .find(|sig| {
            matches!(
                sig.multiplexer_indicator(),
                can_dbc::MultiplexIndicator::Multiplexor
                    | can_dbc::MultiplexIndicator::MultiplexorAndMultiplexedSignal(_)
            )
        })
        .map(|sig| sig.name().to_string());

    let signals = dbc_msg
        .signals()
        .iter()
        .map(|dbc_sig| convert_signal(dbc, raw_id, dbc_sig, multiplexer.as_deref()))
        .collect();

    let senders = match dbc_msg.transmitter() {
        can_dbc::Transmitter::NodeName(name) => vec![name.to_string()],
        _ => Vec::new(),
    };

    Message {
        frame_id: raw_id & !EXTENDED_FRAME_FLAG,
        name: dbc_msg.message_name().to_string(),
        length: *dbc_msg.message_size(),
        cycle_time: cycle_time(dbc, raw_id),
        senders,
        signals,
    }
}

/// Convert a can-dbc signal to our Signal
fn convert_signal(
    dbc: &can_dbc::DBC,
    raw_id: u32,
    dbc_sig: &can_dbc::Signal,
    multiplexer: Option<&str>,
) -> Signal {
    let byte_order = match *dbc_sig.byte_order() {
        can_dbc::ByteOrder::LittleEndian => ByteOrder::LittleEndian,
        can_dbc::ByteOrder::BigEndian => ByteOrder::BigEndian,
    };

    let is_signed = matches!(*dbc_sig.value_type(), can_dbc::ValueType::Signed);

    let (is_multiplexer, switch_value) = match *dbc_sig.multiplexer_indicator() {
        can_dbc::MultiplexIndicator::Multiplexor => (true, None),
        can_dbc::MultiplexIndicator::MultiplexedSignal(value) => (false, Some(value)),
        can_dbc::MultiplexIndicator::MultiplexorAndMultiplexedSignal(value) => (true, Some(value)),
        can_dbc::MultiplexIndicator::Plain => (false, None),
    };

    let (multiplexer_signal, multiplexer_ids) = match switch_value {
        Some(value) => {
            if multiplexer.is_none() {
                log::warn!(
                    "Multiplexed signal '{}' in 0x{:X} but no multiplexer found",
                    dbc_sig.name(),
                    raw_id
                );
            }
            (multiplexer.map(str::to_string), Some(std::iter::once(value).collect()))
        }
        None => (None, None),
    };

    // A [0|0] range means the range is unspecified
    let (min, max) = (*dbc_sig.min(), *dbc_sig.max());
    let (minimum, maximum) = if min == 0.0 && max == 0.0 {
        (None, None)
    } else {
        (Some(min), Some(max))
    };

    let choices: BTreeMap<i64, String> = dbc
        .value_descriptions_for_signal(can_dbc::MessageId(raw_id), dbc_sig.name())
        .map(|descriptions| {
            descriptions
                .iter()
                .map(|desc| (*desc.a() as i64, desc.b().to_string()))
                .collect()
        })
        .unwrap_or_default();

    Signal {
        name: dbc_sig.name().to_string(),
        start: *dbc_sig.start_bit(),
        length: *dbc_sig.signal_size(),
        byte_order,
        is_signed,
        scale: *dbc_sig.factor(),
        offset: *dbc_sig.offset(),
        minimum,
        maximum,
        unit: if dbc_sig.unit().is_empty() {
            None
        } else {
            Some(dbc_sig.unit().to_string())
        },
        choices,
        is_multiplexer,
        multiplexer_signal,
        multiplexer_ids,
    }
}

/// Look up the explicit `GenMsgCycleTime` attribute of a message
fn cycle_time(dbc: &can_dbc::DBC, raw_id: u32) -> Option<u64> {
    dbc.attribute_values()
        .iter()
        .filter(|attr| attr.attribute_name() == CYCLE_TIME_ATTRIBUTE)
        .find_map(|attr| match attr.attribute_value() {
            can_dbc::AttributeValuedForObjectType::MessageDefinitionAttributeValue(
                id,
                Some(value),
            ) if id.0 == raw_id => attribute_as_u64(value),
            _ => None,
        })
}

fn attribute_as_u64(value: &can_dbc::AttributeValue) -> Option<u64> {
    match value {
        can_dbc::AttributeValue::AttributeValueU64(v) => Some(*v),
        can_dbc::AttributeValue::AttributeValueI64(v) => u64::try_from(*v).ok(),
        can_dbc::AttributeValue::AttributeValueF64(v) if *v >= 0.0 => Some(*v as u64),
        _ => None,
    }
}
