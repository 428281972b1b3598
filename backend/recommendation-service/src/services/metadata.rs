use std::collections::HashMap;

use crate::models::MetadataEntry;

/// Item display metadata keyed by item id.
///
/// The artifact does not guarantee unique item ids; the first entry seen for
/// an id is the one served.
#[derive(Debug, Default)]
pub struct MetadataTable {
    entries: HashMap<i64, MetadataEntry>,
    shadowed: usize,
}

impl MetadataTable {
    pub fn from_entries(entries: impl IntoIterator<Item = MetadataEntry>) -> Self {
        let mut table = Self::default();
        for entry in entries {
            if table.entries.contains_key(&entry.item_id) {
                table.shadowed += 1;
                continue;
            }
            table.entries.insert(entry.item_id, entry);
        }
        table
    }

    pub fn get(&self, item_id: i64) -> Option<&MetadataEntry> {
        self.entries.get(&item_id)
    }

    /// Title for `item_id`, if the item is known and carries one.
    pub fn title(&self, item_id: i64) -> Option<&str> {
        self.get(item_id).and_then(|entry| entry.title.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ignored because an earlier entry had the same item id.
    pub fn shadowed(&self) -> usize {
        self.shadowed
    }
}
