//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. cordbridge.toml 設定ファイル
//! 3. デフォルト値
//!
//! 設定ファイル内では `${VAR_NAME}` 形式で環境変数を展開できます。

use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::{Error, Result};

/// Default config file looked up by [`Config::load`]
pub const CONFIG_FILE: &str = "cordbridge.toml";

/// Static reply sent for every non-ping interaction unless overridden
pub const DEFAULT_REPLY: &str = "Hello from ngrok!";

/// Main configuration for cordbridge
#[derive(Clone)]
pub struct Config {
    /// Bot token used to log into the Discord gateway
    pub discord_token: String,

    /// Hex-encoded application public key for interaction signatures
    pub public_key: String,

    /// HTTP listener configuration
    pub api: ApiConfig,

    /// Content of the reply to application command interactions
    pub reply_content: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Port the HTTP listener binds on all interfaces
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
        }
    }
}

fn default_api_port() -> u16 {
    3000
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("discord_token", &"<redacted>")
            .field("public_key", &self.public_key)
            .field("api", &self.api)
            .field("reply_content", &self.reply_content)
            .finish()
    }
}

/// Partially resolved settings before validation
#[derive(Debug, Default)]
struct RawConfig {
    discord_token: Option<String>,
    public_key: Option<String>,
    port: Option<String>,
    reply_content: Option<String>,
}

impl RawConfig {
    /// 環境変数で設定を上書きする
    fn apply_env_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get("DISCORD_TOKEN").or_else(|| get("DISCORD_BOT_TOKEN")) {
            self.discord_token = Some(token);
        }
        if let Some(key) = get("DISCORD_PUBLIC_KEY") {
            self.public_key = Some(key);
        }
        if let Some(port) = get("PORT").or_else(|| get("API_PORT")) {
            self.port = Some(port);
        }
        if let Some(reply) = get("INTERACTION_REPLY") {
            self.reply_content = Some(reply);
        }
    }

    fn validate(self) -> Result<Config> {
        let discord_token = non_empty(self.discord_token)
            .ok_or_else(|| Error::Config("DISCORD_TOKEN not set".to_string()))?;
        let public_key = non_empty(self.public_key)
            .ok_or_else(|| Error::Config("DISCORD_PUBLIC_KEY not set".to_string()))?;

        let port = match self.port {
            Some(p) => p
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("Invalid port: {}", p)))?,
            None => default_api_port(),
        };

        Ok(Config {
            discord_token: discord_token.trim().to_string(),
            public_key: public_key.trim().to_string(),
            api: ApiConfig { port },
            reply_content: self
                .reply_content
                .unwrap_or_else(|| DEFAULT_REPLY.to_string()),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut raw = RawConfig::default();
        raw.apply_env_overrides(&lookup);
        raw.validate()
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// `./cordbridge.toml` があればそれを読み込み、なければ環境変数のみを使います。
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE, |key| std::env::var(key).ok())
    }

    /// Read `path` if it exists, otherwise fall back to `lookup` alone
    pub fn load_from<P, F>(path: P, lookup: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        if !path.exists() {
            return Self::from_lookup(lookup);
        }

        tracing::info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content, lookup)
    }

    /// TOML 設定ファイルから設定を読み込む（環境変数が優先）
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content, |key| std::env::var(key).ok())
    }

    /// Parse TOML content, expand `${VAR}` references and apply overrides
    ///
    /// References are expanded in the parsed string values, so substituted
    /// text is never interpreted as TOML.
    pub fn from_toml_str<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let toml: TomlConfig = toml::from_str(content)?;

        let discord = toml.discord.unwrap_or_default();
        let api = toml.api.unwrap_or_default();
        let interactions = toml.interactions.unwrap_or_default();
        let expand = |value: Option<String>| value.map(|v| expand_env_vars(&v, &lookup));

        let mut raw = RawConfig {
            discord_token: expand(discord.token),
            public_key: expand(discord.public_key),
            port: api.port.map(|p| p.to_string()),
            reply_content: expand(interactions.reply),
        };
        raw.apply_env_overrides(&lookup);
        raw.validate()
    }
}

/// `${VAR_NAME}` 形式の文字列を環境変数の値に置換する
///
/// 存在しない変数は空文字列になります。閉じ括弧のない `${` はそのまま残します。
fn expand_env_vars<F>(value: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            result.push_str(&rest[start..]);
            return result;
        };

        if let Some(env_value) = lookup(&after[..end]) {
            result.push_str(&env_value);
        }
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    result
}

// ============================================================================
// TOML 構造体定義（ファイル解析用）
// ============================================================================

#[derive(Debug, Deserialize)]
struct TomlConfig {
    discord: Option<TomlDiscordConfig>,
    api: Option<TomlApiConfig>,
    interactions: Option<TomlInteractionsConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlDiscordConfig {
    token: Option<String>,
    public_key: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlApiConfig {
    port: Option<u16>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlInteractionsConfig {
    reply: Option<String>,
}
