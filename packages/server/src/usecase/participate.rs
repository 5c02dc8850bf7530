//! UseCase: チャットルームへの参加・発言・退出
//!
//! 呼び出しに失敗したルームは死んだものとみなし、記録から外してレジストリの登録も解除する。

use std::sync::Arc;

use super::{context::ProviderContext, error::ProviderError};
use crate::domain::{ChatRoom, EntityName};

/// ルーム参加者としてのユースケース
pub struct ParticipateUseCase {
    ctx: Arc<ProviderContext>,
}

impl ParticipateUseCase {
    /// 新しい ParticipateUseCase を作成
    pub fn new(ctx: Arc<ProviderContext>) -> Self {
        Self { ctx }
    }

    /// レジストリでルームを探して参加する
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 参加成功
    /// * `Ok(false)` - ルームが存在しない・参加済み・閉鎖済み・到達できない
    /// * `Err(ProviderError)` - クライアント未登録、またはレジストリに到達できない
    pub async fn join(&self, name: &EntityName) -> Result<bool, ProviderError> {
        let client = self.ctx.client().await?;
        if self.ctx.book.joined().contains(name).await {
            return Ok(false);
        }

        let rooms = self.ctx.registry.get_chat_rooms().await?;
        let Some(room) = rooms.get(name).cloned() else {
            tracing::debug!("No chat room named '{}'", name);
            return Ok(false);
        };

        match room.join(client).await {
            Ok(true) => {
                self.ctx.book.joined().insert(name.clone(), room).await;
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(e) => {
                tracing::debug!("Join of '{}' failed: {}", name, e);
                self.ctx.discard_room(name, &room).await;
                Ok(false)
            }
        }
    }

    /// 参加中のルームで発言する
    ///
    /// 到達できないルームは記録とレジストリから外す。このときメッセージは誰にも
    /// 届いていないので、成功扱いにはせず `Ok(false)` を返す。
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 送信成功（個々の参加者への配送結果は問わない）
    /// * `Ok(false)` - 参加していない、またはルームに到達できない
    pub async fn talk(&self, name: &EntityName, message: String) -> Result<bool, ProviderError> {
        let client = self.ctx.client().await?;
        let Some(room) = self.ctx.book.joined().get(name).await else {
            return Ok(false);
        };

        match room.talk(client, message).await {
            Ok(accepted) => Ok(accepted),
            Err(e) => {
                tracing::debug!("Talk in '{}' failed: {}", name, e);
                self.ctx.discard_room(name, &room).await;
                Ok(false)
            }
        }
    }

    /// 参加中のルームから退出する
    ///
    /// 到達できないルームは記録から外し、退出したものとして扱う。
    pub async fn leave(&self, name: &EntityName) -> Result<bool, ProviderError> {
        let client = self.ctx.client().await?;
        let Some(room) = self.ctx.book.joined().remove(name).await else {
            return Ok(false);
        };

        match room.leave(client).await {
            Ok(left) => Ok(left),
            Err(e) => {
                tracing::debug!("Leave of '{}' failed: {}", name, e);
                self.ctx.discard_room(name, &room).await;
                Ok(true)
            }
        }
    }
}
