/// 题库 API 客户端
///
/// 封装 /api/v1/questions 相关的全部调用
use crate::error::{AppError, AppResult};
use crate::infrastructure::HttpExecutor;
use crate::models::{BulkUploadReport, MutationResponse, Question, QuestionDraft, QuestionFilter};
use std::path::Path;
use tracing::debug;

/// 题库客户端
pub struct QuestionClient;

impl QuestionClient {
    /// 创建新的题库客户端
    pub fn new() -> Self {
        Self
    }

    /// 查询题目列表
    ///
    /// # 参数
    /// - `executor`: HTTP 执行器
    /// - `filter`: 搜索与类型过滤条件
    ///
    /// # 返回
    /// 返回匹配的题目列表（候选池）
    pub async fn list(
        &self,
        executor: &HttpExecutor,
        filter: &QuestionFilter,
    ) -> AppResult<Vec<Question>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(search) = &filter.search {
            query.push(("search", search.clone()));
        }
        if let Some(question_type) = filter.question_type {
            query.push(("question_type", question_type.as_str().to_string()));
        }

        let questions: Vec<Question> = executor
            .get_with_query_as("/api/v1/questions", &query)
            .await?;

        debug!("题库查询返回 {} 道题目", questions.len());
        Ok(questions)
    }

    /// 获取单个题目
    pub async fn get(&self, executor: &HttpExecutor, question_id: i64) -> AppResult<Question> {
        executor
            .get_as(&format!("/api/v1/questions/{}", question_id))
            .await
    }

    /// 新建题目
    pub async fn create(
        &self,
        executor: &HttpExecutor,
        draft: &QuestionDraft,
    ) -> AppResult<MutationResponse> {
        executor.post_as("/api/v1/questions", draft).await
    }

    /// 更新题目
    pub async fn update(
        &self,
        executor: &HttpExecutor,
        question_id: i64,
        draft: &QuestionDraft,
    ) -> AppResult<MutationResponse> {
        executor
            .put_as(&format!("/api/v1/questions/{}", question_id), draft)
            .await
    }

    /// 删除题目（服务端成功时返回空体 204）
    pub async fn delete(
        &self,
        executor: &HttpExecutor,
        question_id: i64,
    ) -> AppResult<MutationResponse> {
        let value = executor
            .delete(&format!("/api/v1/questions/{}", question_id))
            .await?;
        Ok(MutationResponse::from_body(value)?)
    }

    /// 批量上传题目（CSV 文件，multipart 表单）
    ///
    /// # 参数
    /// - `executor`: HTTP 执行器
    /// - `file_path`: 本地 CSV 文件路径
    ///
    /// # 返回
    /// 返回上传摘要与逐行错误
    pub async fn bulk_upload(
        &self,
        executor: &HttpExecutor,
        file_path: &Path,
    ) -> AppResult<BulkUploadReport> {
        let bytes = tokio::fs::read(file_path).await.map_err(|e| {
            AppError::Other(format!("读取上传文件失败 ({}): {}", file_path.display(), e))
        })?;

        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "questions.csv".to_string());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let value = executor
            .post_multipart("/api/v1/questions/bulk-upload", form)
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}

impl Default for QuestionClient {
    fn default() -> Self {
        Self::new()
    }
}
