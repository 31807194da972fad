//! エラー型定義 (cb-api)

use thiserror::Error;

/// cb-api のエラー型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid request signature")]
    InvalidSignature,

    #[error("Missing header: {0}")]
    MissingHeader(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, ApiError>;
