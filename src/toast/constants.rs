// Exported constant table: symbolic names scripts use instead of magic numbers

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::config::keys;
use super::gravity::Gravity;
use super::request::ToastDuration;

/// Read-only name -> value map, built once per process
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ConstantTable {
    entries: BTreeMap<&'static str, i32>,
}

static EXPORTED: Lazy<ConstantTable> = Lazy::new(ConstantTable::build);

/// The process-wide constant table
pub fn exported_constants() -> &'static ConstantTable {
    &EXPORTED
}

impl ConstantTable {
    fn build() -> Self {
        let entries = BTreeMap::from([
            (keys::DURATION_SHORT, ToastDuration::SHORT.ticks()),
            (keys::DURATION_LONG, ToastDuration::LONG.ticks()),
            (keys::GRAVITY_TOP, Gravity::TOP_CENTER.raw()),
            (keys::GRAVITY_BOTTOM, Gravity::BOTTOM_CENTER.raw()),
            (keys::GRAVITY_CENTER, Gravity::CENTER.raw()),
        ]);

        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<i32> {
        self.entries.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.entries.iter().map(|(key, value)| (*key, *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON object form, for hosts that take constants as a blob
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_five_keys() {
        let table = exported_constants();
        let keys: Vec<_> = table.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["BOTTOM", "CENTER", "LONG", "SHORT", "TOP"]);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_platform_values() {
        let table = exported_constants();
        assert_eq!(table.get("SHORT"), Some(0));
        assert_eq!(table.get("LONG"), Some(1));
        assert_eq!(table.get("TOP"), Some(49));
        assert_eq!(table.get("BOTTOM"), Some(81));
        assert_eq!(table.get("CENTER"), Some(17));
        assert_eq!(table.get("MEDIUM"), None);
    }

    #[test]
    fn test_stable_across_calls() {
        let first = exported_constants();
        let second = exported_constants();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.iter().collect::<Vec<_>>(), second.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_json_form() {
        let json: serde_json::Value =
            serde_json::from_str(&exported_constants().to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"BOTTOM": 81, "CENTER": 17, "LONG": 1, "SHORT": 0, "TOP": 49})
        );
    }
}
