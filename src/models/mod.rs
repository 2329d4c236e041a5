pub mod question;
pub mod user;

pub use question::{
    BulkUploadReport, BulkUploadRowError, Question, QuestionDraft, QuestionFilter, QuestionOption,
    QuestionType,
};
pub use test::{
    AssignRequest, AttemptAnswer, AttemptSubmission, Test, TestAnalytics, TestDraft, TestResult,
};
pub use user::{Credentials, LoginResponse, ProfileUpdate, RegisterRequest, Role, User};

use serde::Deserialize;
use serde_json::Value as JsonValue;

/// 写操作的通用响应（创建类接口带 id，其余只有 message）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl MutationResponse {
    /// 从响应体解析；删除类接口可能返回空体(204)，按空响应处理
    pub fn from_body(value: JsonValue) -> serde_json::Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mutation_response_tolerates_empty_204_body() {
        // DELETE 成功时服务端返回 '', 204，响应体解析为 Null
        let response = MutationResponse::from_body(JsonValue::Null).expect("空响应体应能解析");
        assert!(response.id.is_none());
        assert!(response.message.is_none());
    }

    #[test]
    fn mutation_response_reads_id_and_message() {
        let response =
            MutationResponse::from_body(json!({"id": 7, "message": "已删除"})).unwrap();
        assert_eq!(response.id, Some(7));
        assert_eq!(response.message.as_deref(), Some("已删除"));
    }
}
