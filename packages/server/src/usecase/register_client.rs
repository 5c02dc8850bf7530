//! UseCase: チャットクライアントの登録

use std::sync::Arc;

use super::{context::ProviderContext, error::ProviderError};
use crate::domain::{EntityName, LocalChatClient};

/// チャットクライアント登録のユースケース
pub struct RegisterClientUseCase {
    ctx: Arc<ProviderContext>,
}

impl RegisterClientUseCase {
    /// 新しい RegisterClientUseCase を作成
    pub fn new(ctx: Arc<ProviderContext>) -> Self {
        Self { ctx }
    }

    /// クライアントを作成・公開し、レジストリに登録する
    ///
    /// # Arguments
    ///
    /// * `name` - 画面表示名（レジストリ全体で一意）
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 登録成功
    /// * `Ok(false)` - 同名のエンティティが生存している
    /// * `Err(ProviderError)` - 登録済み、またはレジストリに到達できない
    pub async fn execute(&self, name: EntityName) -> Result<bool, ProviderError> {
        let mut slot = self.ctx.client.lock().await;
        if slot.is_some() {
            return Err(ProviderError::AlreadyRegistered);
        }

        let client = Arc::new(LocalChatClient::new(
            name.clone(),
            self.ctx.book.clone(),
            self.ctx.client_events.clone(),
        ));
        let handle = self.ctx.exports.export_client(client);

        match self.ctx.registry.register(handle.clone().into()).await {
            Ok(true) => {
                tracing::info!("Registered chat client '{}'", name);
                *slot = Some(handle);
                Ok(true)
            }
            Ok(false) => {
                tracing::info!("Chat client name '{}' is in use", name);
                self.ctx.exports.withdraw(handle.reference());
                Ok(false)
            }
            Err(e) => {
                self.ctx.exports.withdraw(handle.reference());
                Err(e.into())
            }
        }
    }
}
