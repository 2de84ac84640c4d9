use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Primary key of a record, assigned by the store on insert.
pub type RecordId = i64;

/// The named fields of a record.
pub type Fields = Map<String, Value>;

/// Independently stored row of a table.
///
/// Serializes as one flat JSON object with `id` next to the fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    pub fn new(id: RecordId, fields: Fields) -> Self {
        Self { id, fields }
    }

    /// Field lookup; `id` resolves to the primary key.
    pub fn field(&self, name: &str) -> Option<Value> {
        if name == "id" {
            return Some(Value::from(self.id));
        }
        self.fields.get(name).cloned()
    }
}

/// One ordering key of a [`RecordQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub ascending: bool,
}

/// Equality filters plus ordering keys for [`super::RecordStore::read_all`].
///
/// Every backend evaluates queries through [`RecordQuery::apply`], so all of
/// them agree on ordering. Missing or null values sort after all present
/// values regardless of direction, and remaining ties fall back to ascending
/// id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordQuery {
    filters: Vec<(String, Value)>,
    order: Vec<SortKey>,
}

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only records whose `field` equals `value`.
    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Add an ordering key. Earlier keys take precedence.
    pub fn order_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.order.push(SortKey {
            field: field.into(),
            ascending,
        });
        self
    }

    pub fn filters(&self) -> &[(String, Value)] {
        &self.filters
    }

    pub fn order(&self) -> &[SortKey] {
        &self.order
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| record.field(field).as_ref() == Some(expected))
    }

    /// Filters and sorts `records`.
    pub fn apply(&self, records: impl IntoIterator<Item = Record>) -> Vec<Record> {
        let mut out: Vec<Record> = records.into_iter().filter(|r| self.matches(r)).collect();
        out.sort_by(|a, b| self.compare(a, b));
        out
    }

    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        for key in &self.order {
            let ordering = match (non_null(a.field(&key.field)), non_null(b.field(&key.field))) {
                (Some(x), Some(y)) => {
                    let ord = compare_values(&x, &y);
                    if key.ascending { ord } else { ord.reverse() }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.id.cmp(&b.id)
    }
}

fn non_null(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

/// Total order over JSON scalars: numbers, then strings, then booleans;
/// compound values compare by their serialized text.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Number(_) => 0,
            Value::String(_) => 1,
            Value::Bool(_) => 2,
            _ => 3,
        }
    }

    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ if rank(a) != rank(b) => rank(a).cmp(&rank(b)),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
