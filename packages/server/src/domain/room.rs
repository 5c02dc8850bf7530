//! Chat room: membership, broadcast and self-closing lifecycle.
//!
//! Every read or write of the member set happens under the room's single
//! membership lock. Broadcasts copy the set out under the lock and deliver
//! from the copy, so slow or dead members never hold up joins and leaves.
//!
//! A member's display name is resolved once, when it joins. Later broadcasts
//! attributed to it, the eviction notice included, make no call to it.

use std::{
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use futures_util::future::join_all;
use palaver_shared::time::{elapsed_minutes, millis_to_jst_rfc3339, now_millis};
use tokio::sync::{Mutex, mpsc::UnboundedSender};

use super::{
    entity::{ChatRoom, Entity, EntityInfo, EntityKind},
    error::Remote,
    event::OwnerEvent,
    handle::ClientHandle,
    value_object::{EntityName, Timestamp},
};

/// Broadcast after a client joins, attributed to that client.
pub const JOINED_NOTICE: &str = "(joined)";

/// Broadcast after a client leaves, attributed to that client.
pub const LEFT_NOTICE: &str = "(left)";

/// Sender shown when the sender's name cannot be resolved.
pub const UNKNOWN_SENDER: &str = "someone";

#[derive(Debug)]
struct Membership {
    open: bool,
    /// Members and the names their messages are attributed to.
    members: HashMap<ClientHandle, String>,
}

/// A chat room hosted in this process.
pub struct LocalChatRoom {
    name: EntityName,
    created_at: Timestamp,
    message_count: AtomicU64,
    membership: Mutex<Membership>,
    owner: UnboundedSender<OwnerEvent>,
}

impl LocalChatRoom {
    /// Create an open, empty room reporting to `owner`.
    pub fn new(name: EntityName, owner: UnboundedSender<OwnerEvent>) -> Self {
        Self {
            name,
            created_at: Timestamp::now(),
            message_count: AtomicU64::new(0),
            membership: Mutex::new(Membership {
                open: true,
                members: HashMap::new(),
            }),
            owner,
        }
    }

    pub fn room_name(&self) -> &EntityName {
        &self.name
    }

    pub async fn is_open(&self) -> bool {
        self.membership.lock().await.open
    }

    pub async fn member_count(&self) -> usize {
        self.membership.lock().await.members.len()
    }

    pub async fn is_member(&self, client: &ClientHandle) -> bool {
        self.membership.lock().await.members.contains_key(client)
    }

    /// Broadcasts issued so far, synthetic notices included.
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    async fn snapshot(&self) -> Vec<ClientHandle> {
        self.membership
            .lock()
            .await
            .members
            .keys()
            .cloned()
            .collect()
    }

    fn notify_owner(&self, event: OwnerEvent) {
        if self.owner.send(event).is_err() {
            tracing::warn!("Owner of room '{}' is no longer listening", self.name);
        }
    }

    async fn resolve_sender(&self, client: &ClientHandle) -> String {
        match client.name().await {
            Ok(name) => name.into_string(),
            Err(e) => {
                tracing::debug!("Could not resolve sender in room '{}': {}", self.name, e);
                UNKNOWN_SENDER.to_string()
            }
        }
    }

    /// Remove `client`, closing the room if it was the last member.
    ///
    /// Returns the name the member's messages were attributed to, or `None`
    /// if it was not a member.
    async fn depart(&self, client: &ClientHandle) -> Option<String> {
        let mut membership = self.membership.lock().await;
        let sender = membership.members.remove(client)?;

        // Still under the lock, so no join can revive a closing room.
        if membership.members.is_empty() && membership.open {
            membership.open = false;
            tracing::info!("Room '{}' is empty, closing", self.name);
            self.notify_owner(OwnerEvent::RoomClosed {
                room: self.name.clone(),
            });
        }
        Some(sender)
    }

    /// Deliver one message to a snapshot of the members.
    ///
    /// Counts as one message whatever the outcome. Returns the members whose
    /// delivery failed.
    async fn fan_out(&self, sender: &str, message: &str) -> Vec<ClientHandle> {
        let recipients = self.snapshot().await;
        let outcomes = join_all(recipients.iter().map(|member| {
            member.deliver(self.name.clone(), sender.to_string(), message.to_string())
        }))
        .await;
        self.message_count.fetch_add(1, Ordering::SeqCst);

        recipients
            .into_iter()
            .zip(outcomes)
            .filter_map(|(member, outcome)| match outcome {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!(
                        "Member {} of room '{}' is unreachable: {}",
                        member.reference(),
                        self.name,
                        e
                    );
                    Some(member)
                }
            })
            .collect()
    }

    /// Deliver `message` from `sender` and evict every member it cannot reach.
    ///
    /// An evicted member leaves as if it had called [`ChatRoom::leave`] and is
    /// reported to the owner. The "(left)" notices of one round of evictions
    /// go out concurrently; members they cannot reach are evicted in the
    /// next round.
    async fn broadcast(&self, sender: &str, message: &str) {
        let mut unreachable: HashSet<ClientHandle> =
            self.fan_out(sender, message).await.into_iter().collect();

        while !unreachable.is_empty() {
            let mut departed = Vec::new();
            for member in unreachable {
                // A concurrent broadcast may have evicted it already.
                if let Some(name) = self.depart(&member).await {
                    tracing::info!("Evicted {} from room '{}'", member.reference(), self.name);
                    self.notify_owner(OwnerEvent::ClientUnreachable { client: member });
                    departed.push(name);
                }
            }

            let notices =
                join_all(departed.iter().map(|name| self.fan_out(name, LEFT_NOTICE))).await;
            unreachable = notices.into_iter().flatten().collect();
        }
    }
}

#[async_trait]
impl Entity for LocalChatRoom {
    async fn name(&self) -> Remote<EntityName> {
        Ok(self.name.clone())
    }

    async fn info(&self) -> Remote<EntityInfo> {
        let (open, participants) = {
            let membership = self.membership.lock().await;
            (membership.open, membership.members.len())
        };
        let created = self.created_at.value();

        let mut info = EntityInfo::new();
        info.insert("Kind".to_string(), EntityKind::Room.label().to_string());
        info.insert("Name".to_string(), self.name.to_string());
        info.insert("Created".to_string(), millis_to_jst_rfc3339(created));
        info.insert("# Messages".to_string(), self.message_count().to_string());
        info.insert(
            "Time Open".to_string(),
            format!("{} minutes", elapsed_minutes(created, now_millis())),
        );
        info.insert("# Participants".to_string(), participants.to_string());
        info.insert("Open".to_string(), open.to_string());
        Ok(info)
    }
}

#[async_trait]
impl ChatRoom for LocalChatRoom {
    async fn join(&self, client: ClientHandle) -> Remote<bool> {
        let sender = self.resolve_sender(&client).await;
        {
            let mut membership = self.membership.lock().await;
            if !membership.open || membership.members.contains_key(&client) {
                return Ok(false);
            }
            membership.members.insert(client.clone(), sender.clone());
        }
        tracing::info!("{} joined room '{}'", client.reference(), self.name);

        self.broadcast(&sender, JOINED_NOTICE).await;
        Ok(true)
    }

    async fn talk(&self, client: ClientHandle, message: String) -> Remote<bool> {
        let known = self.membership.lock().await.members.get(&client).cloned();
        let sender = match known {
            Some(sender) => sender,
            None => self.resolve_sender(&client).await,
        };
        self.broadcast(&sender, &message).await;
        Ok(true)
    }

    async fn leave(&self, client: ClientHandle) -> Remote<bool> {
        let Some(sender) = self.depart(&client).await else {
            return Ok(false);
        };
        tracing::info!("{} left room '{}'", client.reference(), self.name);

        self.broadcast(&sender, LEFT_NOTICE).await;
        Ok(true)
    }

    async fn empty(&self) -> Remote<()> {
        let recipients = {
            let mut membership = self.membership.lock().await;
            membership.open = false;
            membership.members.keys().cloned().collect::<Vec<_>>()
        };
        tracing::info!(
            "Closing room '{}' for {} member(s)",
            self.name,
            recipients.len()
        );

        let outcomes = join_all(
            recipients
                .iter()
                .map(|member| member.closed(self.name.clone())),
        )
        .await;
        for (member, outcome) in recipients.iter().zip(outcomes) {
            if let Err(e) = outcome {
                tracing::warn!(
                    "Could not tell {} that room '{}' closed: {}",
                    member.reference(),
                    self.name,
                    e
                );
            }
        }
        Ok(())
    }
}
