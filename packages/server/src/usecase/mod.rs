//! UseCase 層
//!
//! プロバイダ（1 プロセス分のチャット参加者）の操作を実装するレイヤー。
//! CLI から [`ChatProvider`] 経由で呼び出され、Domain 層のエンティティとレジストリを操作します。

pub mod context;
pub mod directory;
pub mod error;
pub mod host_room;
pub mod notification;
pub mod participate;
pub mod provider;
pub mod quit;
pub mod register_client;

pub use context::ProviderContext;
pub use directory::DirectoryUseCase;
pub use error::ProviderError;
pub use host_room::HostRoomUseCase;
pub use notification::NotificationUseCase;
pub use participate::ParticipateUseCase;
pub use provider::ChatProvider;
pub use quit::QuitUseCase;
pub use register_client::RegisterClientUseCase;
