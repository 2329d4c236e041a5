//! HTTP 执行器 - 基础设施层
//!
//! 持有唯一的 HTTP 资源（reqwest::Client + 基地址 + 令牌），只暴露"发请求"的能力

use crate::config::Config;
use crate::error::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::debug;

/// HTTP 执行器
///
/// 职责：
/// - 持有唯一的 reqwest::Client 资源
/// - 统一附加 Authorization 头
/// - 统一解析 JSON 与非 2xx 响应
/// - 不认识 Question / Test
/// - 不处理业务流程
pub struct HttpExecutor {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpExecutor {
    /// 创建新的 HTTP 执行器
    ///
    /// # 参数
    /// - `config`: 程序配置
    /// - `token`: 本地会话槽位里的令牌（未登录为 None）
    pub fn new(config: &Config, token: Option<String>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Other(format!("HTTP客户端初始化失败: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// 当前是否持有令牌
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// 替换令牌（登录成功后调用）
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// GET 请求
    pub async fn get(&self, endpoint: &str) -> AppResult<JsonValue> {
        let req = self.http.get(self.url(endpoint));
        self.execute(req, endpoint).await
    }

    /// 带查询参数的 GET 请求
    pub async fn get_with_query(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> AppResult<JsonValue> {
        let req = self.http.get(self.url(endpoint)).query(query);
        self.execute(req, endpoint).await
    }

    /// POST JSON 请求
    pub async fn post(&self, endpoint: &str, body: &impl Serialize) -> AppResult<JsonValue> {
        let req = self.http.post(self.url(endpoint)).json(body);
        self.execute(req, endpoint).await
    }

    /// PUT JSON 请求
    pub async fn put(&self, endpoint: &str, body: &impl Serialize) -> AppResult<JsonValue> {
        let req = self.http.put(self.url(endpoint)).json(body);
        self.execute(req, endpoint).await
    }

    /// DELETE 请求
    pub async fn delete(&self, endpoint: &str) -> AppResult<JsonValue> {
        let req = self.http.delete(self.url(endpoint));
        self.execute(req, endpoint).await
    }

    /// multipart 表单请求（批量上传用）
    pub async fn post_multipart(
        &self,
        endpoint: &str,
        form: reqwest::multipart::Form,
    ) -> AppResult<JsonValue> {
        let req = self.http.post(self.url(endpoint)).multipart(form);
        self.execute(req, endpoint).await
    }

    /// GET 请求并反序列化为指定类型
    pub async fn get_as<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        let value = self.get(endpoint).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// 带查询参数的 GET 请求并反序列化为指定类型
    pub async fn get_with_query_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let value = self.get_with_query(endpoint, query).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// POST JSON 请求并反序列化为指定类型
    pub async fn post_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> AppResult<T> {
        let value = self.post(endpoint, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// PUT JSON 请求并反序列化为指定类型
    pub async fn put_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> AppResult<T> {
        let value = self.put(endpoint, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// 统一的请求执行与响应解析
    ///
    /// 非 2xx 响应转成 ApiError::BadResponse，服务器的 message 字段原样携带。
    /// 请求一旦失败即为终态，不做重试（由操作者手动重试）。
    async fn execute(&self, req: reqwest::RequestBuilder, endpoint: &str) -> AppResult<JsonValue> {
        let req = match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        debug!("→ {}", endpoint);

        let response = req
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        let status = response.status().as_u16();
        // 错误响应的 body 也可能携带 message，所以先照常解析
        let body: JsonValue = response.json().await.unwrap_or(JsonValue::Null);

        debug!("← {} 状态码 {}", endpoint, status);

        if !(200..300).contains(&status) {
            let message = body
                .get("message")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            return Err(AppError::api_bad_response(endpoint, status, message));
        }

        Ok(body)
    }
}
