//! 会话存储服务 - 业务能力层
//!
//! 只负责"本地令牌槽位"能力：登录成功写入，登出/注销清除。
//! 客户端没有其他任何本地持久化状态。

use crate::config::Config;
use crate::error::{AppError, AppResult};
use std::fs;
use std::path::Path;
use tracing::debug;

/// 会话存储服务
///
/// 职责：
/// - 把令牌写入唯一的命名槽位（一个本地文件）
/// - 启动时读回令牌
/// - 登出或注销账号时清空槽位
pub struct SessionStore {
    token_file_path: String,
}

impl SessionStore {
    /// 创建新的会话存储服务
    pub fn new(config: &Config) -> Self {
        Self {
            token_file_path: config.token_file.clone(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            token_file_path: path.into(),
        }
    }

    /// 读取令牌（槽位为空返回 None）
    pub fn load(&self) -> AppResult<Option<String>> {
        let path = Path::new(&self.token_file_path);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::session_read_failed(&self.token_file_path, e))?;
        let token = content.trim().to_string();
        if token.is_empty() {
            return Ok(None);
        }
        debug!("从 {} 读回令牌", self.token_file_path);
        Ok(Some(token))
    }

    /// 写入令牌（登录成功后调用）
    pub fn save(&self, token: &str) -> AppResult<()> {
        fs::write(&self.token_file_path, token)
            .map_err(|e| AppError::session_write_failed(&self.token_file_path, e))?;
        debug!("令牌已写入 {}", self.token_file_path);
        Ok(())
    }

    /// 清空槽位（登出/注销账号时调用，槽位本来就空则无动作）
    pub fn clear(&self) -> AppResult<()> {
        let path = Path::new(&self.token_file_path);
        if path.exists() {
            fs::remove_file(path)
                .map_err(|e| AppError::session_write_failed(&self.token_file_path, e))?;
            debug!("令牌槽位已清空");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> SessionStore {
        let path = std::env::temp_dir().join(format!("test_platform_client_{}", name));
        SessionStore::with_path(path.to_string_lossy().to_string())
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = temp_store("roundtrip.token");
        store.save("jwt-token-abc").expect("应能写入令牌");
        assert_eq!(store.load().unwrap().as_deref(), Some("jwt-token-abc"));
        store.clear().unwrap();
    }

    #[test]
    fn load_missing_slot_is_none() {
        let store = temp_store("missing.token");
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let store = temp_store("clear.token");
        store.save("t").unwrap();
        store.clear().expect("第一次清空应成功");
        store.clear().expect("槽位已空时清空也不应报错");
        assert!(store.load().unwrap().is_none());
    }
}
