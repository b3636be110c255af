//! Collected values and the Aggregate Signal Set

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::category::SignalCategory;
use super::types::{
    BasicInfo, DeviceInfo, FeaturesInfo, HardwareInfo, NetworkInfo, ScreenInfo, Signal,
};
use crate::constants::digest::ERROR_SENTINEL;

/// Outcome of one collector: a record, or the "error" sentinel
#[derive(Debug, Clone, PartialEq)]
pub enum CollectedValue {
    Collected(Signal),
    Error,
}

impl CollectedValue {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn signal(&self) -> Option<&Signal> {
        match self {
            Self::Collected(signal) => Some(signal),
            Self::Error => None,
        }
    }
}

impl From<Signal> for CollectedValue {
    fn from(signal: Signal) -> Self {
        Self::Collected(signal)
    }
}

impl Serialize for CollectedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Collected(signal) => signal.serialize(serializer),
            Self::Error => serializer.serialize_str(ERROR_SENTINEL),
        }
    }
}

/// Mapping from category to collected value, always in declaration order
///
/// Holds only the categories that were enabled and attempted. A category whose
/// collector failed is present with [`CollectedValue::Error`], never absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateSignalSet {
    entries: Vec<(SignalCategory, CollectedValue)>,
}

impl AggregateSignalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for a category
    ///
    /// Entries stay sorted by declaration order regardless of insertion order.
    pub fn insert(&mut self, category: SignalCategory, value: CollectedValue) {
        match self.entries.binary_search_by_key(&category, |(c, _)| *c) {
            Ok(pos) => self.entries[pos].1 = value,
            Err(pos) => self.entries.insert(pos, (category, value)),
        }
    }

    pub fn get(&self, category: SignalCategory) -> Option<&CollectedValue> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, category: SignalCategory) -> bool {
        self.get(category).is_some()
    }

    /// True when the category is present with the error sentinel
    pub fn is_error(&self, category: SignalCategory) -> bool {
        self.get(category).map(|v| v.is_error()).unwrap_or(false)
    }

    pub fn categories(&self) -> Vec<SignalCategory> {
        self.entries.iter().map(|(c, _)| *c).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SignalCategory, &CollectedValue)> {
        self.entries.iter().map(|(c, v)| (*c, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn basic(&self) -> Option<&BasicInfo> {
        match self.get(SignalCategory::Basic)?.signal()? {
            Signal::Basic(v) => Some(v),
            _ => None,
        }
    }

    pub fn screen(&self) -> Option<&ScreenInfo> {
        match self.get(SignalCategory::Screen)?.signal()? {
            Signal::Screen(v) => Some(v),
            _ => None,
        }
    }

    pub fn hardware(&self) -> Option<&HardwareInfo> {
        match self.get(SignalCategory::Hardware)?.signal()? {
            Signal::Hardware(v) => Some(v),
            _ => None,
        }
    }

    pub fn network(&self) -> Option<&NetworkInfo> {
        match self.get(SignalCategory::Network)?.signal()? {
            Signal::Network(v) => Some(v),
            _ => None,
        }
    }

    pub fn features(&self) -> Option<&FeaturesInfo> {
        match self.get(SignalCategory::Features)?.signal()? {
            Signal::Features(v) => Some(v),
            _ => None,
        }
    }

    pub fn device(&self) -> Option<&DeviceInfo> {
        match self.get(SignalCategory::Device)?.signal()? {
            Signal::Device(v) => Some(v),
            _ => None,
        }
    }
}

impl Serialize for AggregateSignalSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, value) in &self.entries {
            map.serialize_entry(category.as_str(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic() -> CollectedValue {
        Signal::Basic(BasicInfo {
            user_agent: "ua".into(),
            language: "en-US".into(),
            platform: "Linux x86_64".into(),
        })
        .into()
    }

    #[test]
    fn test_insert_keeps_declaration_order() {
        let mut set = AggregateSignalSet::new();
        set.insert(SignalCategory::Device, CollectedValue::Error);
        set.insert(SignalCategory::Basic, basic());
        set.insert(SignalCategory::Network, CollectedValue::Error);

        assert_eq!(
            set.categories(),
            vec![SignalCategory::Basic, SignalCategory::Network, SignalCategory::Device]
        );
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut set = AggregateSignalSet::new();
        set.insert(SignalCategory::Basic, CollectedValue::Error);
        set.insert(SignalCategory::Basic, basic());
        assert_eq!(set.len(), 1);
        assert!(!set.is_error(SignalCategory::Basic));
        assert_eq!(set.basic().unwrap().language, "en-US");
    }

    #[test]
    fn test_error_sentinel_serialization() {
        let mut set = AggregateSignalSet::new();
        set.insert(SignalCategory::Screen, CollectedValue::Error);
        set.insert(SignalCategory::Basic, basic());

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(
            json,
            r#"{"basic":{"userAgent":"ua","language":"en-US","platform":"Linux x86_64"},"screen":"error"}"#
        );
    }

    #[test]
    fn test_typed_accessors_skip_errors() {
        let mut set = AggregateSignalSet::new();
        set.insert(SignalCategory::Hardware, CollectedValue::Error);
        assert!(set.contains(SignalCategory::Hardware));
        assert!(set.hardware().is_none());
        assert!(set.screen().is_none());
    }
}
