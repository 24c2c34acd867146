//! Flat key/value save maps.
//!
//! Every entity writes its own keys explicitly. Player-scoped keys carry a
//! `P{index}_` prefix. The map serializes to a single JSON object.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use salvo_core::enums::WeaponKind;

use crate::error::SaveError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaveMap(BTreeMap<String, Value>);

impl SaveMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Store a raw JSON value, replacing any previous one.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn put<T: Serialize>(&mut self, key: impl Into<String>, value: T) -> Result<(), SaveError> {
        self.0.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, SaveError> {
        self.get_opt(key)?
            .ok_or_else(|| SaveError::MissingKey(key.to_string()))
    }

    /// Like `get`, but a missing key is `Ok(None)`. A present key with the
    /// wrong shape is still an error.
    pub fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SaveError> {
        let Some(value) = self.0.get(key) else {
            return Ok(None);
        };
        T::deserialize(value)
            .map(Some)
            .map_err(|e| SaveError::BadValue {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    /// Weapons are stored by their stable key.
    pub fn get_weapon(&self, key: &str) -> Result<WeaponKind, SaveError> {
        let name: String = self.get(key)?;
        WeaponKind::from_key(&name).ok_or_else(|| SaveError::BadValue {
            key: key.to_string(),
            reason: format!("unknown weapon {name:?}"),
        })
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_get() {
        let mut map = SaveMap::new();
        map.put("wind", -12).unwrap();
        map.put("weapon", WeaponKind::Roller.key()).unwrap();
        assert_eq!(map.get::<i32>("wind").unwrap(), -12);
        assert_eq!(map.get_weapon("weapon").unwrap(), WeaponKind::Roller);
    }

    #[test]
    fn test_missing_and_malformed_keys() {
        let mut map = SaveMap::new();
        map.put("life", "lots").unwrap();
        assert!(matches!(map.get::<u32>("nope"), Err(SaveError::MissingKey(k)) if k == "nope"));
        assert!(matches!(map.get::<u32>("life"), Err(SaveError::BadValue { .. })));
        assert!(map.get_opt::<u32>("nope").unwrap().is_none());
        map.put("weapon", "banana").unwrap();
        assert!(map.get_weapon("weapon").is_err());
    }

    #[test]
    fn test_negative_into_unsigned_is_rejected() {
        let mut map = SaveMap::new();
        map.put("round", -1).unwrap();
        assert!(map.get::<u32>("round").is_err());
    }

    #[test]
    fn test_json_text() {
        let mut map = SaveMap::new();
        map.put("P0_x", 31).unwrap();
        map.put("terrain", vec![1i16, 2, 3]).unwrap();
        let text = map.to_json().unwrap();
        assert!(text.contains("\"P0_x\": 31"));
        assert_eq!(SaveMap::from_json(&text).unwrap(), map);
        assert!(SaveMap::from_json("[1, 2]").is_err());
    }
}
