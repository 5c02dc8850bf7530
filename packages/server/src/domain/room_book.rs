//! Per-provider bookkeeping of hosted and joined rooms.

use std::collections::BTreeMap;

use tokio::sync::Mutex;

use super::{handle::RoomHandle, value_object::EntityName};

/// A name-keyed set of room handles.
#[derive(Debug, Default)]
pub struct RoomShelf {
    rooms: Mutex<BTreeMap<EntityName, RoomHandle>>,
}

impl RoomShelf {
    pub async fn insert(&self, name: EntityName, room: RoomHandle) {
        self.rooms.lock().await.insert(name, room);
    }

    pub async fn get(&self, name: &EntityName) -> Option<RoomHandle> {
        self.rooms.lock().await.get(name).cloned()
    }

    pub async fn remove(&self, name: &EntityName) -> Option<RoomHandle> {
        self.rooms.lock().await.remove(name)
    }

    /// Remove `name` only while it still maps to `room`.
    pub async fn remove_matching(&self, name: &EntityName, room: &RoomHandle) -> bool {
        let mut rooms = self.rooms.lock().await;
        if rooms.get(name) != Some(room) {
            return false;
        }
        rooms.remove(name);
        true
    }

    pub async fn contains(&self, name: &EntityName) -> bool {
        self.rooms.lock().await.contains_key(name)
    }

    pub async fn len(&self) -> usize {
        self.rooms.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rooms.lock().await.is_empty()
    }

    /// Names in ascending order.
    pub async fn names(&self) -> Vec<EntityName> {
        self.rooms.lock().await.keys().cloned().collect()
    }

    /// Remove and return every entry.
    pub async fn drain(&self) -> Vec<(EntityName, RoomHandle)> {
        std::mem::take(&mut *self.rooms.lock().await)
            .into_iter()
            .collect()
    }
}

/// Rooms a provider hosts (owns) and rooms its client has joined.
#[derive(Debug, Default)]
pub struct RoomBook {
    hosted: RoomShelf,
    joined: RoomShelf,
}

impl RoomBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hosted(&self) -> &RoomShelf {
        &self.hosted
    }

    pub fn joined(&self) -> &RoomShelf {
        &self.joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::StubRoom;

    #[tokio::test]
    async fn test_shelf_insert_and_remove() {
        // テスト項目: ルームを登録・削除でき、件数と名前一覧に反映される
        // given (前提条件):
        let book = RoomBook::new();
        let r1 = StubRoom::new("r1");
        let r2 = StubRoom::new("r2");

        // when (操作):
        book.hosted().insert(r2.entity_name(), r2.handle()).await;
        book.hosted().insert(r1.entity_name(), r1.handle()).await;
        let removed = book.hosted().remove(&r2.entity_name()).await;

        // then (期待する結果):
        assert_eq!(removed, Some(r2.handle()));
        assert_eq!(book.hosted().len().await, 1);
        assert_eq!(book.hosted().names().await, vec![r1.entity_name()]);
        assert!(book.joined().is_empty().await);
    }

    #[tokio::test]
    async fn test_shelf_drain_empties() {
        // テスト項目: drain で全件を取り出すと空になる
        // given (前提条件):
        let book = RoomBook::new();
        let r1 = StubRoom::new("r1");
        book.joined().insert(r1.entity_name(), r1.handle()).await;

        // when (操作):
        let drained = book.joined().drain().await;

        // then (期待する結果):
        assert_eq!(drained.len(), 1);
        assert!(!book.joined().contains(&r1.entity_name()).await);
    }

    #[tokio::test]
    async fn test_remove_matching_keeps_replaced_entry() {
        // テスト項目: 同名でも別のルームに置き換わっていれば削除しない
        // given (前提条件):
        let book = RoomBook::new();
        let old = StubRoom::new("r1");
        let new = StubRoom::new("r1");
        book.joined().insert(new.entity_name(), new.handle()).await;

        // when (操作):
        let removed_old = book.joined().remove_matching(&old.entity_name(), &old.handle()).await;
        let removed_new = book.joined().remove_matching(&new.entity_name(), &new.handle()).await;

        // then (期待する結果):
        assert!(!removed_old);
        assert!(removed_new);
        assert!(book.joined().is_empty().await);
    }
}
