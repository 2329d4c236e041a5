/// 测验 API 客户端
///
/// 封装 /api/v1/tests 相关的全部调用
use crate::error::AppResult;
use crate::infrastructure::HttpExecutor;
use crate::models::{
    AssignRequest, AttemptSubmission, MutationResponse, Question, Test, TestAnalytics, TestDraft,
    TestResult,
};
use tracing::debug;

/// 测验客户端
pub struct TestClient;

impl TestClient {
    /// 创建新的测验客户端
    pub fn new() -> Self {
        Self
    }

    /// 查询当前用户可见的测验列表
    pub async fn list(&self, executor: &HttpExecutor) -> AppResult<Vec<Test>> {
        let tests: Vec<Test> = executor.get_as("/api/v1/tests").await?;
        debug!("测验列表返回 {} 条", tests.len());
        Ok(tests)
    }

    /// 获取测验详情
    pub async fn get(&self, executor: &HttpExecutor, test_id: i64) -> AppResult<Test> {
        executor.get_as(&format!("/api/v1/tests/{}", test_id)).await
    }

    /// 新建测验
    ///
    /// # 参数
    /// - `executor`: HTTP 执行器
    /// - `draft`: 测验数据，question_ids 必须已是考试顺序
    pub async fn create(
        &self,
        executor: &HttpExecutor,
        draft: &TestDraft,
    ) -> AppResult<MutationResponse> {
        executor.post_as("/api/v1/tests", draft).await
    }

    /// 指派测验给学生
    pub async fn assign(
        &self,
        executor: &HttpExecutor,
        test_id: i64,
        request: &AssignRequest,
    ) -> AppResult<MutationResponse> {
        executor
            .post_as(&format!("/api/v1/tests/{}/assign", test_id), request)
            .await
    }

    /// 获取测验的题目（考试顺序）
    pub async fn questions(
        &self,
        executor: &HttpExecutor,
        test_id: i64,
    ) -> AppResult<Vec<Question>> {
        executor
            .get_as(&format!("/api/v1/tests/{}/questions", test_id))
            .await
    }

    /// 提交答卷
    pub async fn submit_attempt(
        &self,
        executor: &HttpExecutor,
        test_id: i64,
        submission: &AttemptSubmission,
    ) -> AppResult<MutationResponse> {
        executor
            .post_as(&format!("/api/v1/tests/{}/attempt", test_id), submission)
            .await
    }

    /// 查询成绩列表
    pub async fn results(
        &self,
        executor: &HttpExecutor,
        test_id: i64,
    ) -> AppResult<Vec<TestResult>> {
        executor
            .get_as(&format!("/api/v1/tests/{}/results", test_id))
            .await
    }

    /// 查询统计数据
    pub async fn analytics(
        &self,
        executor: &HttpExecutor,
        test_id: i64,
    ) -> AppResult<TestAnalytics> {
        executor
            .get_as(&format!("/api/v1/tests/{}/analytics", test_id))
            .await
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
