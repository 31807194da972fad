//! cb-discord: Discord Gateway セッション
//!
//! Serenity 0.12 を使用して Discord Gateway にログインし、
//! Ready イベントで認証済みのボットを記録します。

pub mod bot;
pub mod error;
pub mod handler;
pub mod session;

pub use bot::{GatewayConnector, GatewaySession, SerenityConnector};
pub use error::{DiscordError, Result};
pub use handler::ReadyHandler;
pub use session::{SessionState, SessionTracker};
