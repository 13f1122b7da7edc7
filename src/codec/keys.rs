//! Case-insensitive field matching
//!
//! [`Folded`] hands a parsed [`Value`] to serde. When serde asks for a struct
//! it names the struct's wire fields, and any object key equal to one of them
//! ignoring ASCII case is renamed to that exact spelling before the derived
//! visitor sees it. Nested objects and arrays are wrapped again, so the rule
//! holds at every depth.

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::forward_to_deserialize_any;
use serde_json::{map, Map, Value};

type Fields = &'static [&'static str];

/// A JSON value whose object keys match struct fields regardless of case
pub struct Folded(pub Value);

/// Spelling of `key` as listed in `fields`, or `key` unchanged when no field
/// matches
pub fn canonical_key(fields: &[&str], key: String) -> String {
    if fields.contains(&key.as_str()) {
        return key;
    }
    match fields.iter().find(|field| field.eq_ignore_ascii_case(&key)) {
        Some(field) => field.to_string(),
        None => key,
    }
}

impl<'de> Deserializer<'de> for Folded {
    type Error = serde_json::Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.0 {
            Value::Object(obj) => visitor.visit_map(Entries::new(obj, None)),
            Value::Array(items) => visitor.visit_seq(Items(items.into_iter())),
            other => other.deserialize_any(visitor),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.0 {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(Folded(other)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: Fields,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        match self.0 {
            Value::Object(obj) => visitor.visit_map(Entries::new(obj, Some(fields))),
            other => Folded(other).deserialize_any(visitor),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.0.deserialize_enum(name, variants, visitor)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map identifier
        ignored_any
    }
}

struct Items(std::vec::IntoIter<Value>);

impl<'de> SeqAccess<'de> for Items {
    type Error = serde_json::Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Self::Error> {
        self.0
            .next()
            .map(|item| seed.deserialize(Folded(item)))
            .transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.0.len())
    }
}

struct Entries {
    iter: map::IntoIter,
    fields: Option<Fields>,
    value: Option<Value>,
}

impl Entries {
    fn new(obj: Map<String, Value>, fields: Option<Fields>) -> Self {
        Self {
            iter: obj.into_iter(),
            fields,
            value: None,
        }
    }
}

impl<'de> MapAccess<'de> for Entries {
    type Error = serde_json::Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Self::Error> {
        let Some((key, value)) = self.iter.next() else {
            return Ok(None);
        };
        self.value = Some(value);

        let key = match self.fields {
            Some(fields) => canonical_key(fields, key),
            None => key,
        };
        seed.deserialize(MapKey(key)).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Self::Error> {
        match self.value.take() {
            Some(value) => seed.deserialize(Folded(value)),
            None => Err(de::Error::custom("map value requested before its key")),
        }
    }
}

/// Object key. Integer-keyed maps such as tick histories parse the key text.
struct MapKey(String);

macro_rules! parse_key {
    ($($method:ident => $ty:ty, $visit:ident;)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
                match self.0.parse::<$ty>() {
                    Ok(n) => visitor.$visit(n),
                    Err(_) => visitor.visit_string(self.0),
                }
            }
        )*
    };
}

impl<'de> Deserializer<'de> for MapKey {
    type Error = serde_json::Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_string(self.0)
    }

    parse_key! {
        deserialize_i8 => i64, visit_i64;
        deserialize_i16 => i64, visit_i64;
        deserialize_i32 => i64, visit_i64;
        deserialize_i64 => i64, visit_i64;
        deserialize_u8 => u64, visit_u64;
        deserialize_u16 => u64, visit_u64;
        deserialize_u32 => u64, visit_u64;
        deserialize_u64 => u64, visit_u64;
    }

    forward_to_deserialize_any! {
        bool i128 u128 f32 f64 char str string bytes byte_buf option unit
        unit_struct newtype_struct seq tuple tuple_struct map struct enum
        identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Inner {
        total_stars: i32,
        has_duplicate_ip: Option<bool>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Outer {
        #[serde(rename = "_id")]
        id: String,
        game_id: String,
        players: Vec<Inner>,
        history: BTreeMap<i64, String>,
    }

    #[test]
    fn test_canonical_key_prefers_exact_spelling() {
        let fields = ["gameId", "tick"];
        assert_eq!(canonical_key(&fields, "gameId".to_string()), "gameId");
        assert_eq!(canonical_key(&fields, "GAMEID".to_string()), "gameId");
        assert_eq!(canonical_key(&fields, "gameid".to_string()), "gameId");
        assert_eq!(canonical_key(&fields, "other".to_string()), "other");
    }

    #[test]
    fn test_nested_keys_match_in_any_case() {
        let outer = Outer::deserialize(Folded(json!({
            "_ID": "g1",
            "GAMEID": "g1",
            "Players": [{ "TOTALSTARS": 3, "hasduplicateip": true }],
            "history": { "2": "b", "10": "j" }
        })))
        .unwrap();

        assert_eq!(outer.id, "g1");
        assert_eq!(outer.game_id, "g1");
        assert_eq!(
            outer.players,
            vec![Inner {
                total_stars: 3,
                has_duplicate_ip: Some(true)
            }]
        );
        assert_eq!(outer.history.keys().copied().collect::<Vec<_>>(), vec![2, 10]);
    }

    #[test]
    fn test_null_option_and_bad_map_key() {
        let inner = Inner::deserialize(Folded(json!({ "totalStars": 1, "HasDuplicateIP": null }))).unwrap();
        assert_eq!(inner.has_duplicate_ip, None);

        let err = BTreeMap::<i64, String>::deserialize(Folded(json!({ "latest": "x" })));
        assert!(err.is_err());
    }
}
