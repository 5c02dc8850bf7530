//! UseCase: ルーム所有者とクライアントへの通知の処理
//!
//! ホストしているルームからの所有者通知と、自クライアントに届いた通知をバックグラウンドで処理する。

use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use super::context::ProviderContext;
use crate::domain::{ClientEvent, OwnerEvent};

/// 通知処理のユースケース
pub struct NotificationUseCase {
    ctx: Arc<ProviderContext>,
    /// UI（CLI など）へ転送する先
    ui: UnboundedSender<ClientEvent>,
}

impl NotificationUseCase {
    /// 新しい NotificationUseCase を作成
    pub fn new(ctx: Arc<ProviderContext>, ui: UnboundedSender<ClientEvent>) -> Self {
        Self { ctx, ui }
    }

    /// ルーム所有者としての通知を処理する
    pub async fn on_owner_event(&self, event: OwnerEvent) {
        match event {
            OwnerEvent::RoomClosed { room } => {
                // Already forgotten when the owner deregistered it explicitly.
                let Some(handle) = self.ctx.book.hosted().remove(&room).await else {
                    tracing::debug!("Closed chat room '{}' is no longer hosted", room);
                    return;
                };
                tracing::info!("Chat room '{}' is empty and closed", room);

                match self.ctx.registry.deregister(handle.clone().into()).await {
                    Ok(true) => tracing::info!("Deregistered chat room '{}'", room),
                    Ok(false) => tracing::debug!("Chat room '{}' was not registered", room),
                    Err(e) => tracing::warn!("Could not deregister chat room '{}': {}", room, e),
                }
                self.ctx.exports.withdraw(handle.reference());
            }
            OwnerEvent::ClientUnreachable { client } => {
                tracing::info!("Reclaiming unreachable client {}", client.reference());
                match self.ctx.registry.deregister(client.into()).await {
                    Ok(found) => tracing::debug!("Client deregistered: {}", found),
                    Err(e) => tracing::warn!("Could not deregister client: {}", e),
                }
            }
        }
    }

    /// 自クライアントに届いた通知を処理して UI に転送する
    pub async fn on_client_event(&self, event: ClientEvent) {
        if let ClientEvent::RoomClosed { room } = &event {
            tracing::info!("Chat room '{}' has been closed", room);
            self.ctx.book.joined().remove(room).await;
        }
        if self.ui.send(event).is_err() {
            tracing::debug!("UI is no longer listening");
        }
    }

    /// 両方のチャネルが閉じるまで通知を処理し続ける
    pub async fn run(
        self,
        mut owner_events: UnboundedReceiver<OwnerEvent>,
        mut client_events: UnboundedReceiver<ClientEvent>,
    ) {
        let mut owner_open = true;
        let mut client_open = true;
        while owner_open || client_open {
            tokio::select! {
                event = owner_events.recv(), if owner_open => match event {
                    Some(event) => self.on_owner_event(event).await,
                    None => owner_open = false,
                },
                event = client_events.recv(), if client_open => match event {
                    Some(event) => self.on_client_event(event).await,
                    None => client_open = false,
                },
            }
        }
        tracing::debug!("Notification pump stopped");
    }
}
