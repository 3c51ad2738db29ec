//! Field-by-field comparison of messages and signals
//!
//! Each entity kind has a static table of `(field name, accessor)` pairs.
//! [`diff_fields`] walks a table in declaration order and keeps only the
//! fields whose values differ, so reports list changes in a fixed order.

use crate::model::{ByteOrder, Message, Signal};
use serde::ser::{SerializeMap, SerializeTuple};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A comparable field value extracted from a message or signal
///
/// Optional fields map to [`FieldValue::Absent`] instead of a zero value, so
/// absent → present is reported as a change. Floats compare by bit pattern.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Absent,
    Bool(bool),
    Integer(u64),
    Float(f64),
    Text(String),
    ByteOrder(ByteOrder),
    Names(Vec<String>),
    Ids(BTreeSet<u64>),
    Choices(BTreeMap<i64, String>),
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Absent, FieldValue::Absent) => true,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a == b,
            (FieldValue::Float(a), FieldValue::Float(b)) => a.to_bits() == b.to_bits(),
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::ByteOrder(a), FieldValue::ByteOrder(b)) => a == b,
            (FieldValue::Names(a), FieldValue::Names(b)) => a == b,
            (FieldValue::Ids(a), FieldValue::Ids(b)) => a == b,
            (FieldValue::Choices(a), FieldValue::Choices(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for FieldValue {}

impl FieldValue {
    fn optional_float(value: Option<f64>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::Float)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent => write!(f, "None"),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(v) => write!(f, "{}", v),
            FieldValue::ByteOrder(v) => write!(f, "{}", v),
            FieldValue::Names(names) => write!(f, "[{}]", names.join(", ")),
            FieldValue::Ids(ids) => {
                let ids: Vec<String> = ids.iter().map(u64::to_string).collect();
                write!(f, "{{{}}}", ids.join(", "))
            }
            FieldValue::Choices(choices) => {
                let pairs: Vec<String> = choices.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                write!(f, "{}", pairs.join(", "))
            }
        }
    }
}

/// A named accessor over one field of an entity
pub struct Field<T> {
    pub name: &'static str,
    pub get: fn(&T) -> FieldValue,
}

/// Message fields compared by the engine, in report order
pub static MESSAGE_FIELDS: &[Field<Message>] = &[
    Field { name: "name", get: |m| FieldValue::Text(m.name.clone()) },
    Field { name: "length", get: |m| FieldValue::Integer(m.length) },
    Field {
        name: "cycle_time",
        get: |m| m.cycle_time.map_or(FieldValue::Absent, FieldValue::Integer),
    },
    Field { name: "signals", get: |m| FieldValue::Names(m.signal_names()) },
];

/// Replacement for the `signals` message field that ignores declaration order
pub static UNORDERED_SIGNALS_FIELD: Field<Message> = Field {
    name: "signals",
    get: |m| {
        let mut names = m.signal_names();
        names.sort();
        FieldValue::Names(names)
    },
};

/// Signal fields compared by the engine, in report order
pub static SIGNAL_FIELDS: &[Field<Signal>] = &[
    Field { name: "minimum", get: |s| FieldValue::optional_float(s.minimum) },
    Field { name: "maximum", get: |s| FieldValue::optional_float(s.maximum) },
    Field { name: "scale", get: |s| FieldValue::Float(s.scale) },
    Field { name: "offset", get: |s| FieldValue::Float(s.offset) },
    Field { name: "length", get: |s| FieldValue::Integer(s.length) },
    Field { name: "start", get: |s| FieldValue::Integer(s.start) },
    Field { name: "byte_order", get: |s| FieldValue::ByteOrder(s.byte_order) },
    Field { name: "is_multiplexer", get: |s| FieldValue::Bool(s.is_multiplexer) },
    Field {
        name: "multiplexer_signal",
        get: |s| s.multiplexer_signal.clone().map_or(FieldValue::Absent, FieldValue::Text),
    },
    Field {
        name: "multiplexer_ids",
        get: |s| s.multiplexer_ids.clone().map_or(FieldValue::Absent, FieldValue::Ids),
    },
    Field { name: "choices", get: |s| FieldValue::Choices(s.choices.clone()) },
];

/// Old and new value of one changed field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub old: FieldValue,
    pub new: FieldValue,
}

impl Serialize for FieldChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Serialized as the (old, new) pair; the field name is the map key
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(&self.old)?;
        pair.serialize_element(&self.new)?;
        pair.end()
    }
}

/// Changed fields of one entity pair, in field declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDiffs(Vec<FieldChange>);

impl FieldDiffs {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldChange> {
        self.0.iter()
    }

    /// Get the change recorded for a field, if any
    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.0.iter().find(|c| c.field == field)
    }

    /// Names of the changed fields
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|c| c.field).collect()
    }
}

impl Serialize for FieldDiffs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for change in &self.0 {
            map.serialize_entry(change.field, change)?;
        }
        map.end()
    }
}

/// Compare two entities over the given fields
///
/// Only fields with differing values are kept; the input order of `fields`
/// is preserved in the result.
pub fn diff_fields<'a, T: 'a>(
    old: &T,
    new: &T,
    fields: impl IntoIterator<Item = &'a Field<T>>,
) -> FieldDiffs {
    let changes = fields
        .into_iter()
        .filter_map(|field| {
            let old_value = (field.get)(old);
            let new_value = (field.get)(new);
            (old_value != new_value).then_some(FieldChange {
                field: field.name,
                old: old_value,
                new: new_value,
            })
        })
        .collect();
    FieldDiffs(changes)
}
