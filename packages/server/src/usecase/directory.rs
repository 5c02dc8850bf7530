//! UseCase: レジストリと自プロセスの記録の照会

use std::sync::Arc;

use super::{context::ProviderContext, error::ProviderError};
use crate::domain::{EntityInfo, EntityName};

/// 照会系のユースケース
pub struct DirectoryUseCase {
    ctx: Arc<ProviderContext>,
}

impl DirectoryUseCase {
    /// 新しい DirectoryUseCase を作成
    pub fn new(ctx: Arc<ProviderContext>) -> Self {
        Self { ctx }
    }

    /// 名前で登録されたエンティティの情報を取得する
    ///
    /// # Returns
    ///
    /// * `Ok(Some(info))` - 登録されていて到達できる
    /// * `Ok(None)` - 未登録、または到達できず登録が回収された
    pub async fn entity_info(&self, name: EntityName) -> Result<Option<EntityInfo>, ProviderError> {
        Ok(self.ctx.registry.get_info(name).await?)
    }

    /// 生存しているルーム名の一覧（昇順）
    pub async fn chat_rooms(&self) -> Result<Vec<EntityName>, ProviderError> {
        let rooms = self.ctx.registry.get_chat_rooms().await?;
        Ok(rooms.into_keys().collect())
    }

    /// ホストしているルーム名の一覧
    pub async fn hosted_chat_rooms(&self) -> Vec<EntityName> {
        self.ctx.book.hosted().names().await
    }

    /// 参加しているルーム名の一覧
    pub async fn joined_chat_rooms(&self) -> Vec<EntityName> {
        self.ctx.book.joined().names().await
    }
}
