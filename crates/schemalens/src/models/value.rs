use std::collections::BTreeMap;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use time::{Date, PrimitiveDateTime};

use crate::utils::time::{format_iso_date, format_iso_datetime};

/// One result row; cells keep the select-list order of the query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataRow {
    cells: Vec<(String, DataValue)>,
}

impl DataRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    /// Appends a cell. A column already present keeps its position and takes
    /// the new value.
    pub fn insert(&mut self, column: impl Into<String>, value: DataValue) {
        let column = column.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&DataValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn values(&self) -> impl Iterator<Item = &DataValue> {
        self.cells.iter().map(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn map_values(&self, transform: impl Fn(&DataValue) -> DataValue) -> Self {
        Self {
            cells: self
                .cells
                .iter()
                .map(|(name, value)| (name.clone(), transform(value)))
                .collect(),
        }
    }
}

impl Serialize for DataRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Typed scalar (or nested) value as produced by a data source.
///
/// `Decimal`, `Date`, `DateTime` and `Bytes` are not JSON primitives; they are
/// rewritten by [`DataValue::normalized`].
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Decimal(String),
    Text(String),
    Date(Date),
    DateTime(PrimitiveDateTime),
    Bytes(Vec<u8>),
    List(Vec<DataValue>),
    Map(BTreeMap<String, DataValue>),
}

impl DataValue {
    /// JSON-safety pass: decimal -> float, date/date-time -> ISO-8601 text,
    /// bytes -> lowercase hex, applied recursively. Idempotent.
    #[must_use]
    pub fn normalized(&self) -> Self {
        match self {
            Self::Decimal(text) => text
                .trim()
                .parse::<f64>()
                .map_or_else(|_| Self::Text(text.clone()), Self::Float),
            Self::Date(date) => Self::Text(format_iso_date(*date)),
            Self::DateTime(value) => Self::Text(format_iso_datetime(*value)),
            Self::Bytes(bytes) => Self::Text(encode_hex(bytes)),
            Self::List(items) => Self::List(items.iter().map(Self::normalized).collect()),
            Self::Map(entries) => Self::Map(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.normalized()))
                    .collect(),
            ),
            Self::Null | Self::Bool(_) | Self::Integer(_) | Self::Float(_) | Self::Text(_) => {
                self.clone()
            }
        }
    }

    #[must_use]
    pub fn is_json_primitive(&self) -> bool {
        match self {
            Self::Null | Self::Bool(_) | Self::Integer(_) | Self::Float(_) | Self::Text(_) => true,
            Self::List(items) => items.iter().all(Self::is_json_primitive),
            Self::Map(entries) => entries.values().all(Self::is_json_primitive),
            Self::Decimal(_) | Self::Date(_) | Self::DateTime(_) | Self::Bytes(_) => false,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Float(value) if value.fract() == 0.0 => Some(*value as i64),
            Self::Decimal(text) | Self::Text(text) => text.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

impl Serialize for DataValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Float(value) if value.is_finite() => serializer.serialize_f64(*value),
            Self::Float(_) => serializer.serialize_unit(),
            Self::Text(text) => serializer.serialize_str(text),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Decimal(_) | Self::Date(_) | Self::DateTime(_) | Self::Bytes(_) => {
                self.normalized().serialize(serializer)
            }
        }
    }
}

#[must_use]
pub fn normalize_row(row: &DataRow) -> DataRow {
    row.map_values(DataValue::normalized)
}

fn encode_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        output.push(HEX[(byte >> 4) as usize] as char);
        output.push(HEX[(byte & 0x0f) as usize] as char);
    }
    output
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;
    use time::{Date, Month, PrimitiveDateTime, Time};

    use super::{DataRow, DataValue, normalize_row};

    fn nested_sample() -> DataValue {
        let date = Date::from_calendar_date(2024, Month::January, 5).expect("valid date");
        let stamp = PrimitiveDateTime::new(date, Time::from_hms(9, 30, 0).expect("valid time"));
        let mut row = BTreeMap::new();
        row.insert("amount".to_string(), DataValue::Decimal("12.50".to_string()));
        row.insert("day".to_string(), DataValue::Date(date));
        row.insert("seen_at".to_string(), DataValue::DateTime(stamp));
        row.insert("raw".to_string(), DataValue::Bytes(vec![0xde, 0xad]));
        row.insert("label".to_string(), DataValue::Text("web".to_string()));
        DataValue::List(vec![DataValue::Map(row), DataValue::Integer(3)])
    }

    #[test]
    fn normalization_converts_non_primitives() {
        let normalized = nested_sample().normalized();
        assert!(normalized.is_json_primitive());
        assert_eq!(
            serde_json::to_value(&normalized).expect("serializes"),
            json!([
                {
                    "amount": 12.5,
                    "day": "2024-01-05",
                    "label": "web",
                    "raw": "dead",
                    "seen_at": "2024-01-05T09:30:00"
                },
                3
            ])
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = nested_sample().normalized();
        let twice = once.normalized();
        assert_eq!(once, twice);
    }

    #[test]
    fn non_finite_floats_serialize_as_null() {
        let encoded = serde_json::to_value(DataValue::Float(f64::NAN)).expect("serializes");
        assert_eq!(encoded, json!(null));
    }

    #[test]
    fn serializing_raw_values_matches_normalized_json() {
        let sample = nested_sample();
        let encoded = serde_json::to_value(&sample).expect("serializes");
        let normalized = serde_json::to_value(sample.normalized()).expect("serializes");
        assert_eq!(encoded, normalized);
    }

    #[test]
    fn rows_keep_select_list_order() {
        let mut row = DataRow::new();
        row.insert("ORDER_DATE", DataValue::Text("2024-01-01".to_string()));
        row.insert("CHANNEL", DataValue::Text("web".to_string()));
        row.insert("AMOUNT", DataValue::Decimal("10.50".to_string()));
        row.insert("CHANNEL", DataValue::Text("store".to_string()));

        let normalized = normalize_row(&row);
        assert_eq!(normalized.len(), 3);
        assert_eq!(
            serde_json::to_string(&normalized).expect("row serializes"),
            r#"{"ORDER_DATE":"2024-01-01","CHANNEL":"store","AMOUNT":10.5}"#
        );
        assert_eq!(normalized.get("AMOUNT"), Some(&DataValue::Float(10.5)));
    }
}
