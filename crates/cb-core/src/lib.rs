//! cb-core: cordbridge のコアライブラリ
//!
//! 設定、エラー型、Discord インタラクションのペイロード/レスポンス型を提供します。

pub mod config;
pub mod error;
pub mod interaction;

pub use config::{ApiConfig, Config, DEFAULT_REPLY};
pub use error::{Error, Result};
pub use interaction::{InteractionPayload, InteractionResponse, ResponseData, respond};
