//! Order-preserving choice table.
//!
//! Choice tables are maps keyed by label, but display order matters, so they
//! are collected into a `Vec` in the order the deserializer visits them.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::ChoiceOptions;

/// Choices of one scene, keyed by label, in document order.
#[derive(Debug, Clone, Default)]
pub struct ChoiceList(Vec<(String, ChoiceOptions)>);

impl ChoiceList {
    /// Build a list from label/options pairs.
    pub fn new(entries: Vec<(String, ChoiceOptions)>) -> Self {
        Self(entries)
    }

    /// All entries in display order.
    pub fn entries(&self) -> &[(String, ChoiceOptions)] {
        &self.0
    }

    /// Iterate over `(label, options)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = &(String, ChoiceOptions)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct ChoiceListVisitor;

impl<'de> Visitor<'de> for ChoiceListVisitor {
    type Value = ChoiceList;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a table of choices keyed by label")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((label, options)) = access.next_entry::<String, ChoiceOptions>()? {
            // A repeated label replaces the earlier entry but keeps its slot
            if let Some(slot) = entries
                .iter_mut()
                .find(|entry: &&mut (String, ChoiceOptions)| entry.0 == label)
            {
                slot.1 = options;
            } else {
                entries.push((label, options));
            }
        }
        Ok(ChoiceList(entries))
    }
}

impl<'de> Deserialize<'de> for ChoiceList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ChoiceListVisitor)
    }
}
