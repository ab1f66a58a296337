//! Entity records as ordered JSON objects

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key every entity uses for its identifier
pub const ID_FIELD: &str = "id";

pub type RecordId = i64;

/// One remote entity (or a sparse set of fields for one).
///
/// Field order is preserved, so a record built from a tool call keeps the
/// order the caller wrote the keys in. A key mapped to `Value::Null` is
/// present; only a missing key means "not provided".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value, or `None` if it is not an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Identifier, accepting numeric strings as well as numbers
    pub fn id(&self) -> Option<RecordId> {
        match self.0.get(ID_FIELD)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_requires_object() {
        assert!(Record::from_value(json!({"id": 1})).is_some());
        assert!(Record::from_value(json!([1, 2])).is_none());
        assert!(Record::from_value(Value::Null).is_none());
    }

    #[test]
    fn test_id_parsing() {
        let numeric = Record::from_value(json!({"id": 7})).unwrap();
        assert_eq!(numeric.id(), Some(7));

        let textual = Record::from_value(json!({"id": " 12 "})).unwrap();
        assert_eq!(textual.id(), Some(12));

        let missing = Record::from_value(json!({"name": "Ann"})).unwrap();
        assert_eq!(missing.id(), None);
    }

    #[test]
    fn test_null_is_present() {
        let record = Record::from_value(json!({"country": null})).unwrap();
        assert!(record.contains_key("country"));
        assert_eq!(record.get("country"), Some(&Value::Null));
        assert!(!record.contains_key("phone"));
    }

    #[test]
    fn test_key_order_preserved() {
        let record = Record::from_value(json!({"zeta": 1, "alpha": 2, "mid": 3})).unwrap();
        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_serializes_transparently() {
        let mut record = Record::new();
        record.insert("id", json!(3));
        record.insert("name", json!("Ann"));
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({"id": 3, "name": "Ann"}));
    }
}
