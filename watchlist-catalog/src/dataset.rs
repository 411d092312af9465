use std::collections::HashMap;

use crate::types::Record;

/// Records keyed by IMDb id, in insertion order.
///
/// Built once from an iterator and never mutated afterwards. When two
/// records share a key the later one wins but keeps the earlier one's
/// position.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    index: HashMap<String, usize>,
}

impl Dataset {
    fn insert(&mut self, record: Record) {
        match self.index.get(&record.global_id) {
            Some(&pos) => {
                log::debug!(
                    "Duplicate key '{}': replacing '{}' with '{}'",
                    record.global_id,
                    self.records[pos].title,
                    record.title
                );
                self.records[pos] = record;
            }
            None => {
                self.index
                    .insert(record.global_id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.index.get(key).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut dataset = Dataset::default();
        for record in iter {
            dataset.insert(record);
        }
        dataset
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[path = "tests/dataset_tests.rs"]
mod tests;
