//! cb-api: cordbridge の HTTP サーバー
//!
//! Discord インタラクションの Webhook エンドポイントを axum で提供します。
//! リクエストはハンドラー実行前に Ed25519 署名で検証されます。

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use error::{ApiError, Result};
pub use middleware::signature::SignatureVerifier;
pub use server::{AppState, create_router, serve};
