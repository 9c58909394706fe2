//! MIDI port lists reported by the plugin.

use serde_json::Value;
use tracing::debug;

/// Port display names keyed by the plugin's port index, ordered by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortList {
    ports: Vec<(u32, String)>,
}

impl PortList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a `{ name: index }` object. Indices may be numbers or numeric
    /// strings; entries with any other index are skipped.
    pub fn from_value(value: &Value) -> Self {
        let mut list = Self::new();
        if let Value::Object(map) = value {
            for (name, index) in map {
                match port_index(index) {
                    Some(index) => list.insert(name, index),
                    None => debug!("Skipping port {:?} with index {}", name, index),
                }
            }
        }
        list
    }

    /// Add or rename the port at `index`.
    pub fn insert(&mut self, name: &str, index: u32) {
        match self.ports.binary_search_by_key(&index, |(i, _)| *i) {
            Ok(pos) => self.ports[pos].1 = name.to_string(),
            Err(pos) => self.ports.insert(pos, (index, name.to_string())),
        }
    }

    pub fn name_of(&self, index: u32) -> Option<&str> {
        self.ports
            .binary_search_by_key(&index, |(i, _)| *i)
            .ok()
            .map(|pos| self.ports[pos].1.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.ports.iter().map(|(index, name)| (*index, name.as_str()))
    }
}

/// A port index sent as a number or a numeric string.
pub(crate) fn port_index(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ports_ordered_by_index() {
        let list = PortList::from_value(&json!({
            "Zeta Synth": "2",
            "IAC Driver Bus 1": 0,
            "USB MIDI": "1",
        }));
        let names: Vec<&str> = list.iter().map(|(_, name)| name).collect();
        assert_eq!(names, vec!["IAC Driver Bus 1", "USB MIDI", "Zeta Synth"]);
        assert_eq!(list.name_of(1), Some("USB MIDI"));
        assert_eq!(list.name_of(7), None);
    }

    #[test]
    fn test_bad_indices_are_skipped() {
        let list = PortList::from_value(&json!({
            "Good": 3,
            "Negative": -1,
            "Word": "first",
            "Null": null,
        }));
        assert_eq!(list.len(), 1);
        assert_eq!(list.name_of(3), Some("Good"));
    }

    #[test]
    fn test_non_object_is_empty() {
        assert!(PortList::from_value(&json!(["a", "b"])).is_empty());
    }

    #[test]
    fn test_insert_replaces_same_index() {
        let mut list = PortList::new();
        list.insert("Old", 0);
        list.insert("New", 0);
        assert_eq!(list.len(), 1);
        assert_eq!(list.name_of(0), Some("New"));
    }
}
