//! UseCase: チャットルームの作成と削除
//!
//! ルームは作成したプロバイダが所有し、所有者だけが削除できる。

use std::sync::Arc;

use super::{context::ProviderContext, error::ProviderError};
use crate::domain::{ChatRoom, EntityName, LocalChatRoom};

/// ホストするチャットルームのユースケース
pub struct HostRoomUseCase {
    ctx: Arc<ProviderContext>,
}

impl HostRoomUseCase {
    /// 新しい HostRoomUseCase を作成
    pub fn new(ctx: Arc<ProviderContext>) -> Self {
        Self { ctx }
    }

    /// ルームを作成・公開・登録し、作成者を自動的に参加させる
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 作成成功
    /// * `Ok(false)` - 同名のエンティティが生存している
    /// * `Err(ProviderError)` - クライアント未登録、またはレジストリに到達できない
    pub async fn register(&self, name: EntityName) -> Result<bool, ProviderError> {
        let client = self.ctx.client().await?;

        let room = Arc::new(LocalChatRoom::new(
            name.clone(),
            self.ctx.owner_events.clone(),
        ));
        let handle = self.ctx.exports.export_room(room);

        match self.ctx.registry.register(handle.clone().into()).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!("Chat room name '{}' is in use", name);
                self.ctx.exports.withdraw(handle.reference());
                return Ok(false);
            }
            Err(e) => {
                self.ctx.exports.withdraw(handle.reference());
                return Err(e.into());
            }
        }
        tracing::info!("Registered chat room '{}'", name);
        self.ctx.book.hosted().insert(name.clone(), handle.clone()).await;

        match handle.join(client).await {
            Ok(true) => self.ctx.book.joined().insert(name, handle).await,
            Ok(false) => tracing::warn!("Could not join own chat room '{}'", name),
            Err(e) => tracing::warn!("Could not join own chat room '{}': {}", name, e),
        }
        Ok(true)
    }

    /// ホストしているルームを閉じて登録を解除する
    ///
    /// 参加中なら退出し、残りの参加者に閉鎖を通知してから、登録解除と公開の取り下げを行う。
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 削除成功
    /// * `Ok(false)` - このプロバイダがホストしているルームではない
    /// * `Err(ProviderError)` - レジストリに到達できない（ルームは取り下げ済み）
    pub async fn deregister(&self, name: &EntityName) -> Result<bool, ProviderError> {
        let Some(room) = self.ctx.book.hosted().remove(name).await else {
            return Ok(false);
        };

        if self.ctx.book.joined().remove_matching(name, &room).await {
            let client = self.ctx.client().await?;
            if let Err(e) = room.leave(client).await {
                tracing::warn!("Could not leave chat room '{}': {}", name, e);
            }
        }
        if let Err(e) = room.empty().await {
            tracing::warn!("Could not empty chat room '{}': {}", name, e);
        }

        let deregistered = self.ctx.registry.deregister(room.clone().into()).await;
        self.ctx.exports.withdraw(room.reference());
        match deregistered {
            Ok(found) => {
                tracing::info!("Deregistered chat room '{}' ({})", name, found);
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }
}
