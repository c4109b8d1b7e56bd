//! Bijection between external names and dense integer ids

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name <-> id mapping with ids in `0..len()`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMap {
    names: Vec<String>,
    ids: HashMap<String, u32>,
}

impl NameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or assign the id for `name`; new names receive the next dense id
    pub fn get_or_insert(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as u32;
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        id
    }

    /// Build from names listed in id order
    ///
    /// # Errors
    ///
    /// Returns [`Error::InconsistentMapping`] if a name repeats, since the
    /// reverse lookup would then be ambiguous.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for name in names {
            let name = name.into();
            if map.ids.contains_key(&name) {
                return Err(Error::InconsistentMapping { value: name });
            }
            map.get_or_insert(&name);
        }
        Ok(map)
    }

    /// Build from an `id -> name` table, deriving the reverse `name -> id` map
    ///
    /// The ids must be exactly `0..table.len()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InconsistentMapping`] if two ids share a name, and
    /// [`Error::NodeOutOfRange`] if the ids are not dense.
    pub fn from_id_table(table: &HashMap<u32, String>) -> Result<Self> {
        let mut names = vec![None; table.len()];
        for (&id, name) in table {
            let slot = names.get_mut(id as usize).ok_or(Error::NodeOutOfRange {
                node: id as usize,
                node_count: table.len(),
            })?;
            *slot = Some(name.clone());
        }
        // dense ids with a table of equal length means every slot is filled
        Self::from_names(names.into_iter().flatten())
    }

    pub fn id(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    /// Like [`NameMap::id`], but an unknown name is an error
    pub fn require_id(&self, name: &str) -> Result<u32> {
        self.id(name).ok_or_else(|| Error::UnknownName {
            name: name.to_string(),
        })
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    /// All names in id order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Reverse a map, failing if it is not one-to-one
///
/// # Errors
///
/// Returns [`Error::InconsistentMapping`] naming the first repeated value.
pub fn reverse_map<K, V>(map: &HashMap<K, V>) -> Result<HashMap<V, K>>
where
    K: Clone,
    V: Clone + Eq + std::hash::Hash + std::fmt::Display,
{
    let mut reversed = HashMap::with_capacity(map.len());
    for (key, value) in map {
        if reversed.insert(value.clone(), key.clone()).is_some() {
            return Err(Error::InconsistentMapping {
                value: value.to_string(),
            });
        }
    }
    Ok(reversed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_ids_in_insertion_order() {
        let mut map = NameMap::new();
        assert_eq!(map.get_or_insert("TP53"), 0);
        assert_eq!(map.get_or_insert("BRCA1"), 1);
        assert_eq!(map.get_or_insert("TP53"), 0);

        assert_eq!(map.len(), 2);
        assert_eq!(map.name(1), Some("BRCA1"));
        assert_eq!(map.id("TP53"), Some(0));
        assert_eq!(map.id("EGFR"), None);
    }

    #[test]
    fn test_from_names_rejects_duplicates() {
        let err = NameMap::from_names(["liver", "heart", "liver"]).unwrap_err();
        assert!(matches!(err, Error::InconsistentMapping { value } if value == "liver"));
    }

    #[test]
    fn test_from_id_table() {
        let table: HashMap<u32, String> =
            [(1, "heart".to_string()), (0, "liver".to_string())].into();
        let map = NameMap::from_id_table(&table).unwrap();
        assert_eq!(map.names(), &["liver".to_string(), "heart".to_string()]);
    }

    #[test]
    fn test_from_id_table_rejects_shared_names() {
        let table: HashMap<u32, String> =
            [(0, "liver".to_string()), (1, "liver".to_string())].into();
        assert!(matches!(
            NameMap::from_id_table(&table),
            Err(Error::InconsistentMapping { .. })
        ));
    }

    #[test]
    fn test_from_id_table_rejects_sparse_ids() {
        let table: HashMap<u32, String> = [(0, "a".to_string()), (5, "b".to_string())].into();
        assert!(matches!(
            NameMap::from_id_table(&table),
            Err(Error::NodeOutOfRange { node: 5, .. })
        ));
    }

    #[test]
    fn test_require_id_unknown() {
        let map = NameMap::from_names(["a"]).unwrap();
        assert!(matches!(map.require_id("b"), Err(Error::UnknownName { .. })));
    }

    #[test]
    fn test_reverse_map() {
        let map: HashMap<&str, u32> = [("a", 0), ("b", 1)].into();
        let reversed = reverse_map(&map).unwrap();
        assert_eq!(reversed[&1], "b");

        let bad: HashMap<&str, u32> = [("a", 0), ("b", 0)].into();
        assert!(matches!(
            reverse_map(&bad),
            Err(Error::InconsistentMapping { value }) if value == "0"
        ));
    }
}
