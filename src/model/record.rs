use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A game-data object whose field order is significant.
///
/// Fields are kept as an ordered list of pairs so that augmented fields can be
/// placed next to their English counterparts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|i| &self.fields[i].1)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// The `name` field, which identifies a record within its category.
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.position(key).map(|i| self.fields.remove(i).1)
    }

    /// Replaces the value in place, or appends the field when absent.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.position(&key) {
            Some(i) => self.fields[i].1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Places `key` immediately after `anchor`.
    ///
    /// An existing `key` is moved rather than duplicated. Returns `false` and
    /// leaves the record unchanged when `anchor` is missing.
    pub fn insert_after(&mut self, anchor: &str, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if key == anchor || !self.contains_key(anchor) {
            return false;
        }

        self.remove(&key);
        // anchor is present; position can only have shifted left
        let Some(at) = self.position(anchor) else {
            return false;
        };
        self.fields.insert(at + 1, (key, value));
        true
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|(k, _)| k == key)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                while let Some((k, v)) = access.next_entry::<String, Value>()? {
                    record.set(k, v);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(json: &str) -> Record {
        serde_json::from_str(json).expect("valid record")
    }

    #[test]
    fn deserialize_keeps_source_order() {
        let r = record(r#"{"num": 1, "name": "Stench", "desc": "x", "alpha": true}"#);
        assert_eq!(r.keys().collect::<Vec<_>>(), ["num", "name", "desc", "alpha"]);
    }

    #[test]
    fn insert_after_places_field_next_to_anchor() {
        let mut r = record(r#"{"num": 1, "name": "Stench", "rating": 0.5}"#);
        assert!(r.insert_after("name", "chineseName", json!("恶臭")));
        assert_eq!(
            r.keys().collect::<Vec<_>>(),
            ["num", "name", "chineseName", "rating"]
        );
    }

    #[test]
    fn insert_after_moves_existing_field_instead_of_duplicating() {
        let mut r = record(r#"{"chineseName": "old", "num": 1, "name": "Stench"}"#);
        assert!(r.insert_after("name", "chineseName", json!("恶臭")));
        assert_eq!(r.keys().collect::<Vec<_>>(), ["num", "name", "chineseName"]);
        assert_eq!(r.get_str("chineseName"), Some("恶臭"));
    }

    #[test]
    fn insert_after_missing_anchor_is_a_no_op() {
        let mut r = record(r#"{"num": 1}"#);
        assert!(!r.insert_after("name", "chineseName", json!("x")));
        assert_eq!(r.keys().count(), 1);
    }

    #[test]
    fn set_replaces_in_place_or_appends() {
        let mut r = record(r#"{"SkillUp": 1, "name": "Pikachu"}"#);
        r.set("SkillUp", json!(2));
        r.set("extra", json!(3));
        assert_eq!(r.keys().collect::<Vec<_>>(), ["SkillUp", "name", "extra"]);
        assert_eq!(r.get("SkillUp"), Some(&json!(2)));
    }

    #[test]
    fn serialize_writes_fields_in_record_order() {
        let mut r = record(r#"{"name": "Pound", "desc": "Hits."}"#);
        r.insert_after("desc", "chineseDesc", json!("击中。"));
        assert_eq!(
            serde_json::to_string(&r).unwrap(),
            r#"{"name":"Pound","desc":"Hits.","chineseDesc":"击中。"}"#
        );
    }
}
