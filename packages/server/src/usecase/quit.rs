//! UseCase: プロバイダの終了処理

use std::sync::Arc;

use super::context::ProviderContext;
use crate::domain::ChatRoom;

/// 終了処理のユースケース
pub struct QuitUseCase {
    ctx: Arc<ProviderContext>,
}

impl QuitUseCase {
    /// 新しい QuitUseCase を作成
    pub fn new(ctx: Arc<ProviderContext>) -> Self {
        Self { ctx }
    }

    /// 参加中のルームから退出し、ホストしているルームとクライアントを片付ける
    ///
    /// 個々の失敗はログに残して処理を続ける。
    pub async fn execute(&self) {
        let client = self.ctx.client.lock().await.take();

        if let Some(client) = &client {
            for (name, room) in self.ctx.book.joined().drain().await {
                if let Err(e) = room.leave(client.clone()).await {
                    tracing::warn!("Could not leave chat room '{}': {}", name, e);
                }
            }
        }

        for (name, room) in self.ctx.book.hosted().drain().await {
            if let Err(e) = room.empty().await {
                tracing::warn!("Could not empty chat room '{}': {}", name, e);
            }
            if let Err(e) = self.ctx.registry.deregister(room.clone().into()).await {
                tracing::warn!("Could not deregister chat room '{}': {}", name, e);
            }
            self.ctx.exports.withdraw(room.reference());
        }

        if let Some(client) = client {
            if let Err(e) = self.ctx.registry.deregister(client.clone().into()).await {
                tracing::warn!("Could not deregister chat client: {}", e);
            }
            self.ctx.exports.withdraw(client.reference());
        }
        tracing::info!("Provider has quit");
    }
}
