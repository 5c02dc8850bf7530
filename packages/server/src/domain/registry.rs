//! Naming registry with lazy dead-entity reclamation.
//!
//! Liveness is never polled. A binding is found dead only when a call made
//! through it fails, and is reclaimed right there. No call to an entity is
//! made while the name map is locked, so a hung entity stalls only the
//! request that probes it.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use futures_util::future::join_all;
use tokio::sync::Mutex;

use super::{
    entity::{ChatRegistry, EntityInfo},
    error::Remote,
    handle::{EntityHandle, RoomHandle},
    value_object::EntityName,
};

/// The chat service's registry of named entities.
#[derive(Debug, Default)]
pub struct Registry {
    entities: Mutex<HashMap<EntityName, EntityHandle>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entities.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entities.lock().await.is_empty()
    }

    /// The handle bound under `name`, without probing it.
    pub async fn lookup(&self, name: &EntityName) -> Option<EntityHandle> {
        self.entities.lock().await.get(name).cloned()
    }

    /// Remove the binding of `name` if it still points at `entity`.
    async fn reclaim(&self, name: &EntityName, entity: &EntityHandle) -> bool {
        let mut entities = self.entities.lock().await;
        if entities.get(name) != Some(entity) {
            return false;
        }
        entities.remove(name);
        tracing::info!("Reclaimed name [{}] from {}", name, entity.reference());
        true
    }
}

#[async_trait]
impl ChatRegistry for Registry {
    async fn register(&self, entity: EntityHandle) -> Remote<bool> {
        let name = match entity.name().await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("Refusing to register unreachable {}: {}", entity.reference(), e);
                return Ok(false);
            }
        };
        tracing::info!("Attempting to register entity [{}]", name);

        let occupant = self.lookup(&name).await;
        if let Some(occupant) = &occupant {
            match occupant.name().await {
                Ok(_) => {
                    tracing::info!("Entity [{}] already exists and is still alive", name);
                    return Ok(false);
                }
                Err(e) => {
                    tracing::warn!("Entity [{}] has died, releasing its name: {}", name, e);
                }
            }
        }

        // The probe ran unlocked; only bind if nobody else bound the name meanwhile.
        let mut entities = self.entities.lock().await;
        let current = entities.get(&name);
        if current.is_some() && current != occupant.as_ref() {
            tracing::info!("Entity [{}] was registered concurrently", name);
            return Ok(false);
        }

        entities.insert(name.clone(), entity);
        tracing::info!("Entity successfully registered [{}]", name);
        Ok(true)
    }

    async fn deregister(&self, entity: EntityHandle) -> Remote<bool> {
        let probed = entity.name().await;

        let mut entities = self.entities.lock().await;
        let name = match probed {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::debug!(
                    "{} did not answer ({}), looking it up by identity",
                    entity.reference(),
                    e
                );
                entities
                    .iter()
                    .find(|(_, bound)| **bound == entity)
                    .map(|(name, _)| name.clone())
            }
        };

        let Some(name) = name else {
            tracing::info!("There is no registered entity for {}", entity.reference());
            return Ok(false);
        };
        if entities.remove(&name).is_none() {
            tracing::info!("There is no registered entity [{}]", name);
            return Ok(false);
        }

        tracing::info!("Entity successfully deregistered [{}]", name);
        Ok(true)
    }

    async fn get_info(&self, name: EntityName) -> Remote<Option<EntityInfo>> {
        let Some(entity) = self.lookup(&name).await else {
            return Ok(None);
        };

        match entity.info().await {
            Ok(info) => Ok(Some(info)),
            Err(e) => {
                tracing::warn!("Entity [{}] died unexpectedly: {}", name, e);
                self.reclaim(&name, &entity).await;
                Ok(None)
            }
        }
    }

    async fn get_chat_rooms(&self) -> Remote<BTreeMap<EntityName, RoomHandle>> {
        let bindings: Vec<(EntityName, EntityHandle)> = self
            .entities
            .lock()
            .await
            .iter()
            .map(|(name, entity)| (name.clone(), entity.clone()))
            .collect();

        let probes = join_all(bindings.iter().map(|(_, entity)| entity.name())).await;

        let mut rooms = BTreeMap::new();
        for ((name, entity), probe) in bindings.into_iter().zip(probes) {
            match probe {
                Ok(_) => {
                    if let EntityHandle::Room(room) = entity {
                        rooms.insert(name, room);
                    }
                }
                Err(e) => {
                    tracing::warn!("Deregistering [{}], it died unexpectedly: {}", name, e);
                    self.reclaim(&name, &entity).await;
                }
            }
        }

        tracing::debug!("Returning {} chat room(s)", rooms.len());
        Ok(rooms)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::domain::test_support::{StubClient, StubRoom, name};

    #[tokio::test]
    async fn test_register_duplicate_live_name_fails() {
        // テスト項目: 生存中のエンティティと同じ名前の登録は失敗し、既存の束縛は残る
        // given (前提条件):
        let registry = Registry::new();
        let first = StubClient::new("alice");
        let second = StubClient::new("alice");
        registry.register(first.handle().into()).await.unwrap();

        // when (操作):
        let result = registry.register(second.handle().into()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(false));
        assert_eq!(
            registry.lookup(&name("alice")).await,
            Some(EntityHandle::from(first.handle()))
        );
    }

    #[tokio::test]
    async fn test_register_replaces_dead_binding() {
        // テスト項目: 既存のエンティティが到達不能なら名前を回収して新しいエンティティを束縛する
        // given (前提条件):
        let registry = Registry::new();
        let first = StubClient::new("alice");
        let second = StubClient::new("alice");
        registry.register(first.handle().into()).await.unwrap();
        first.kill();

        // when (操作):
        let result = registry.register(second.handle().into()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(true));
        assert_eq!(registry.len().await, 1);
        assert_eq!(
            registry.lookup(&name("alice")).await,
            Some(EntityHandle::from(second.handle()))
        );
    }

    #[tokio::test]
    async fn test_hung_occupant_does_not_block_other_calls() {
        // テスト項目: 応答しない既存エンティティへの問い合わせ中も他の操作は待たされない
        // given (前提条件):
        let registry = Arc::new(Registry::new());
        let stale = StubClient::new("alice");
        let bob = StubClient::new("bob");
        let r1 = StubRoom::new("r1");
        registry.register(stale.handle().into()).await.unwrap();
        registry.register(bob.handle().into()).await.unwrap();
        stale.hang();

        let successor = StubClient::new("alice");
        let pending = tokio::spawn({
            let registry = registry.clone();
            let successor = successor.handle();
            async move { registry.register(successor.into()).await }
        });
        tokio::task::yield_now().await;

        // when (操作):
        let others = tokio::time::timeout(Duration::from_secs(1), async {
            let info = registry.get_info(name("bob")).await;
            let registered = registry.register(r1.handle().into()).await;
            let deregistered = registry.deregister(bob.handle().into()).await;
            (info, registered, deregistered)
        })
        .await;

        // then (期待する結果):
        let (info, registered, deregistered) = others.expect("registry is blocked");
        assert_eq!(info.unwrap().unwrap()["Name"], "bob");
        assert_eq!(registered, Ok(true));
        assert_eq!(deregistered, Ok(true));
        assert!(!pending.is_finished());
        pending.abort();
    }

    #[tokio::test]
    async fn test_register_unreachable_entity_fails() {
        // テスト項目: 名前を答えられないエンティティは登録できない
        // given (前提条件):
        let registry = Registry::new();
        let ghost = StubClient::new("ghost");
        ghost.kill();

        // when (操作):
        let result = registry.register(ghost.handle().into()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(false));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_register_same_name_single_winner() {
        // テスト項目: 同じ名前の同時登録は一つだけ成功する
        // given (前提条件):
        let registry = Registry::new();
        let first = StubRoom::new("r1");
        let second = StubRoom::new("r1");

        // when (操作):
        let (a, b) = tokio::join!(
            registry.register(first.handle().into()),
            registry.register(second.handle().into())
        );

        // then (期待する結果):
        assert_ne!(a.unwrap(), b.unwrap());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_deregister_live_entity() {
        // テスト項目: 登録済みのエンティティを登録解除でき、二度目は失敗する
        // given (前提条件):
        let registry = Registry::new();
        let room = StubRoom::new("r1");
        registry.register(room.handle().into()).await.unwrap();

        // when (操作):
        let first = registry.deregister(room.handle().into()).await;
        let second = registry.deregister(room.handle().into()).await;

        // then (期待する結果):
        assert_eq!(first, Ok(true));
        assert_eq!(second, Ok(false));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_deregister_dead_entity_by_identity() {
        // テスト項目: 名前を答えられないエンティティはハンドルの同一性で逆引きして登録解除される
        // given (前提条件):
        let registry = Registry::new();
        let bob = StubClient::new("bob");
        let alice = StubClient::new("alice");
        registry.register(bob.handle().into()).await.unwrap();
        registry.register(alice.handle().into()).await.unwrap();
        bob.kill();

        // when (操作):
        let result = registry.deregister(bob.handle().into()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(true));
        assert_eq!(registry.lookup(&name("bob")).await, None);
        assert!(registry.lookup(&name("alice")).await.is_some());
    }

    #[tokio::test]
    async fn test_deregister_unknown_dead_entity_fails() {
        // テスト項目: 登録されていない到達不能なエンティティの登録解除は失敗する
        // given (前提条件):
        let registry = Registry::new();
        let ghost = StubClient::new("ghost");
        ghost.kill();

        // when (操作):
        let result = registry.deregister(ghost.handle().into()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(false));
    }

    #[tokio::test]
    async fn test_get_info() {
        // テスト項目: 登録済みなら info を返し、未登録なら None を返す
        // given (前提条件):
        let registry = Registry::new();
        let alice = StubClient::new("alice");
        registry.register(alice.handle().into()).await.unwrap();

        // when (操作):
        let known = registry.get_info(name("alice")).await.unwrap();
        let unknown = registry.get_info(name("nobody")).await.unwrap();

        // then (期待する結果):
        assert_eq!(known.unwrap()["Name"], "alice");
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn test_get_info_of_dead_entity_reclaims() {
        // テスト項目: 到達不能なエンティティの info は None になり、束縛も回収される
        // given (前提条件):
        let registry = Registry::new();
        let bob = StubClient::new("bob");
        registry.register(bob.handle().into()).await.unwrap();
        bob.kill();

        // when (操作):
        let info = registry.get_info(name("bob")).await;

        // then (期待する結果):
        assert_eq!(info, Ok(None));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_chat_rooms_filters_and_sweeps() {
        // テスト項目: ルームのみを返し、到達不能なエンティティはその場で回収される
        // given (前提条件):
        let registry = Registry::new();
        let r1 = StubRoom::new("r1");
        let r2 = StubRoom::new("r2");
        let alice = StubClient::new("alice");
        let bob = StubClient::new("bob");
        for entity in [
            EntityHandle::from(r1.handle()),
            r2.handle().into(),
            alice.handle().into(),
            bob.handle().into(),
        ] {
            registry.register(entity).await.unwrap();
        }
        r2.kill();
        bob.kill();

        // when (操作):
        let rooms = registry.get_chat_rooms().await.unwrap();

        // then (期待する結果):
        assert_eq!(rooms.keys().cloned().collect::<Vec<_>>(), vec![name("r1")]);
        assert_eq!(rooms[&name("r1")], r1.handle());
        assert_eq!(registry.len().await, 2);
        assert_eq!(registry.lookup(&name("r2")).await, None);
        assert_eq!(registry.get_info(name("bob")).await, Ok(None));
    }
}
