//! Insertion-ordered entry lists for map and set values.
//!
//! Keys are arbitrary [`Value`]s compared with [`Value::same_value_zero`], so
//! these can't be hash maps; lookups are linear, which is fine for the sizes
//! an inspector shows.

use crate::Value;

/// Entries of a map value, in insertion order.
#[derive(Clone, Default)]
pub struct MapEntries(Vec<(Value, Value)>);

impl MapEntries {
    /// An empty map.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The value stored under `key`.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0
            .iter()
            .find(|(k, _)| k.same_value_zero(key))
            .map(|(_, v)| v)
    }

    /// The value stored under a string key.
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Insert or overwrite. An existing key keeps its position.
    pub fn set(&mut self, key: Value, value: Value) {
        match self.0.iter_mut().find(|(k, _)| k.same_value_zero(&key)) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Iterate `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.0.iter().map(|(k, v)| (k, v))
    }

    /// Iterate keys.
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().map(|(k, _)| k)
    }
}

impl FromIterator<(Value, Value)> for MapEntries {
    fn from_iter<T: IntoIterator<Item = (Value, Value)>>(iter: T) -> Self {
        let mut entries = Self::new();
        for (k, v) in iter {
            entries.set(k, v);
        }
        entries
    }
}

/// Members of a set value, in insertion order.
#[derive(Clone, Default)]
pub struct SetEntries(Vec<Value>);

impl SetEntries {
    /// An empty set.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `value` is a member.
    pub fn contains(&self, value: &Value) -> bool {
        self.0.iter().any(|v| v.same_value_zero(value))
    }

    /// Add a member; returns `false` if it was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.0.push(value);
        true
    }

    /// The member at insertion position `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Iterate members.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }
}

impl FromIterator<Value> for SetEntries {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        let mut set = Self::new();
        for v in iter {
            set.insert(v);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_set_overwrites_in_place() {
        let mut map: MapEntries = [(Value::from("a"), Value::from(1)), (Value::from("b"), Value::from(2))]
            .into_iter()
            .collect();
        map.set(Value::from("a"), Value::from(3));
        let keys: Vec<_> = map.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(map.get_str("a").and_then(Value::as_number), Some(3.0));
    }

    #[test]
    fn nan_keys_collapse() {
        let set: SetEntries = [Value::Number(f64::NAN), Value::Number(f64::NAN), Value::Number(0.0), Value::Number(-0.0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn object_members_are_kept_by_identity() {
        let a = Value::array([]);
        let set: SetEntries = [a.clone(), a, Value::array([])].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
