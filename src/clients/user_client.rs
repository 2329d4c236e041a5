/// 用户 API 客户端
///
/// 封装 /users/* 接口（个人资料与用户列表）
use crate::error::AppResult;
use crate::infrastructure::HttpExecutor;
use crate::models::{MutationResponse, ProfileUpdate, User};

/// 用户客户端
pub struct UserClient;

impl UserClient {
    /// 创建新的用户客户端
    pub fn new() -> Self {
        Self
    }

    /// 获取当前用户资料
    pub async fn profile(&self, executor: &HttpExecutor) -> AppResult<User> {
        executor.get_as("/users/profile").await
    }

    /// 更新当前用户资料
    pub async fn update_profile(
        &self,
        executor: &HttpExecutor,
        update: &ProfileUpdate,
    ) -> AppResult<User> {
        executor.put_as("/users/profile", update).await
    }

    /// 注销账号（调用方负责随后清除本地令牌）
    pub async fn delete_profile(&self, executor: &HttpExecutor) -> AppResult<MutationResponse> {
        let value = executor.delete("/users/profile").await?;
        Ok(MutationResponse::from_body(value)?)
    }

    /// 获取全部用户（指派测验时筛选学生用）
    pub async fn list(&self, executor: &HttpExecutor) -> AppResult<Vec<User>> {
        executor.get_as("/users").await
    }
}

impl Default for UserClient {
    fn default() -> Self {
        Self::new()
    }
}
