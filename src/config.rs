use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 平台 API 基地址
    pub api_base_url: String,
    /// 本地令牌文件路径（唯一的持久化存储位置）
    pub token_file: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".to_string(),
            token_file: "session.token".to_string(),
            request_timeout_secs: 30,
            verbose_logging: false,
        }
    }
}

/// client.toml 的可选字段，缺省项回落到 Config::default()
#[derive(Debug, Deserialize)]
struct ConfigFile {
    api_base_url: Option<String>,
    token_file: Option<String>,
    request_timeout_secs: Option<u64>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 从环境变量读取配置（未设置的变量使用默认值）
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 用环境变量覆盖已有配置
    fn with_env_overrides(self) -> Self {
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(self.api_base_url),
            token_file: std::env::var("TOKEN_FILE").unwrap_or(self.token_file),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
        }
    }

    /// 从 TOML 文本解析配置（缺省字段使用默认值）
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| {
            AppError::Config(ConfigError::FileParseFailed {
                path: String::new(),
                source: Box::new(e),
            })
        })?;
        let default = Self::default();
        Ok(Self {
            api_base_url: file.api_base_url.unwrap_or(default.api_base_url),
            token_file: file.token_file.unwrap_or(default.token_file),
            request_timeout_secs: file
                .request_timeout_secs
                .unwrap_or(default.request_timeout_secs),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        })
    }

    /// 加载配置：优先 client.toml，再用环境变量覆盖
    pub fn load() -> Self {
        if !Path::new("client.toml").exists() {
            return Self::from_env();
        }
        let base = match std::fs::read_to_string("client.toml") {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("client.toml 解析失败，使用默认配置: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("client.toml 读取失败，使用默认配置: {}", e);
                Self::default()
            }
        };
        base.with_env_overrides()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_api() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:5000");
        assert_eq!(config.token_file, "session.token");
    }

    #[test]
    fn toml_overrides_only_present_fields() {
        let config = Config::from_toml_str(
            r#"
            api_base_url = "https://exam.example.com"
            verbose_logging = true
            "#,
        )
        .expect("配置应能解析");
        assert_eq!(config.api_base_url, "https://exam.example.com");
        assert!(config.verbose_logging);
        // 未出现的字段保持默认
        assert_eq!(config.token_file, "session.token");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn env_overrides_beat_defaults() {
        std::env::set_var("REQUEST_TIMEOUT_SECS", "5");
        let config = Config::from_env();
        std::env::remove_var("REQUEST_TIMEOUT_SECS");
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let result = Config::from_toml_str("api_base_url = [");
        assert!(result.is_err(), "残缺的 TOML 应该报配置错误");
    }
}
