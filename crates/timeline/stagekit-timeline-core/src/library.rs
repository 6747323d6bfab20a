//! Document library: reusable items that stage instances point at by name.

use serde::{Deserialize, Serialize};

use crate::store::DataStore;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Nested timeline content instantiated on the stage.
    Symbol,
    Sound,
    Bitmap,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LibraryItem {
    pub name: String,
    pub kind: ItemKind,
    /// Per-item persistent data, shared by every instance.
    pub data: DataStore,
}

impl LibraryItem {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
            data: DataStore::default(),
        }
    }
}

/// Name-keyed item collection. Adding under an existing name replaces the
/// item, matching how re-import behaves.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    items: Vec<LibraryItem>,
}

impl Library {
    pub fn add(&mut self, item: LibraryItem) {
        match self.items.iter_mut().find(|i| i.name == item.name) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    pub fn item(&self, name: &str) -> Option<&LibraryItem> {
        self.items.iter().find(|i| i.name == name)
    }

    pub fn item_mut(&mut self, name: &str) -> Option<&mut LibraryItem> {
        self.items.iter_mut().find(|i| i.name == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<LibraryItem> {
        let pos = self.items.iter().position(|i| i.name == name)?;
        Some(self.items.remove(pos))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LibraryItem> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_replaces_same_name() {
        let mut lib = Library::default();
        lib.add(LibraryItem::new("logo", ItemKind::Bitmap));
        lib.add(LibraryItem::new("logo", ItemKind::Symbol));
        assert_eq!(lib.len(), 1);
        assert_eq!(lib.item("logo").unwrap().kind, ItemKind::Symbol);
    }

    #[test]
    fn remove_returns_item() {
        let mut lib = Library::default();
        lib.add(LibraryItem::new("beep", ItemKind::Sound));
        let removed = lib.remove("beep").unwrap();
        assert_eq!(removed.name, "beep");
        assert!(lib.is_empty());
        assert!(lib.remove("beep").is_none());
    }
}
