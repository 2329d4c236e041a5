/// 认证 API 客户端
///
/// 封装 /auth/* 接口，全部无需令牌
use crate::error::AppResult;
use crate::infrastructure::HttpExecutor;
use crate::models::{Credentials, LoginResponse, MutationResponse, RegisterRequest};
use serde_json::json;
use tracing::debug;

/// 认证客户端
pub struct AuthClient;

impl AuthClient {
    /// 创建新的认证客户端
    pub fn new() -> Self {
        Self
    }

    /// 登录
    ///
    /// # 参数
    /// - `executor`: HTTP 执行器
    /// - `credentials`: 邮箱 + 密码
    ///
    /// # 返回
    /// 返回服务器签发的令牌
    pub async fn login(
        &self,
        executor: &HttpExecutor,
        credentials: &Credentials,
    ) -> AppResult<String> {
        let response: LoginResponse = executor.post_as("/auth/login", credentials).await?;
        debug!("登录成功: {}", credentials.email);
        Ok(response.token)
    }

    /// 注册新账号（注册后需要邮箱验证）
    pub async fn register(
        &self,
        executor: &HttpExecutor,
        request: &RegisterRequest,
    ) -> AppResult<MutationResponse> {
        executor.post_as("/auth/register", request).await
    }

    /// 发起找回密码流程
    pub async fn forgot_password(
        &self,
        executor: &HttpExecutor,
        email: &str,
    ) -> AppResult<MutationResponse> {
        executor
            .post_as("/auth/forgot-password", &json!({ "email": email }))
            .await
    }

    /// 用重置令牌设置新密码
    pub async fn reset_password(
        &self,
        executor: &HttpExecutor,
        token: &str,
        new_password: &str,
    ) -> AppResult<MutationResponse> {
        executor
            .post_as(
                "/auth/reset-password",
                &json!({ "token": token, "password": new_password }),
            )
            .await
    }

    /// 验证邮箱
    pub async fn verify_email(
        &self,
        executor: &HttpExecutor,
        token: &str,
    ) -> AppResult<MutationResponse> {
        executor
            .post_as("/auth/verify-email", &json!({ "token": token }))
            .await
    }
}

impl Default for AuthClient {
    fn default() -> Self {
        Self::new()
    }
}
