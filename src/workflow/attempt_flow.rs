//! 答题流程 - 流程层
//!
//! 核心职责：定义"作答一份测验"的完整流程
//!
//! 流程顺序：
//! 1. 拉取测验题目（考试顺序）
//! 2. 按题目 ID 记录作答（选项 ID 或文本）
//! 3. 提交答卷

use anyhow::Result;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::clients::TestClient;
use crate::infrastructure::HttpExecutor;
use crate::models::{AttemptAnswer, AttemptSubmission, MutationResponse, Question};

/// 答题流程
pub struct AttemptFlow {
    test_client: TestClient,
    test_id: i64,
    questions: Vec<Question>,
    answers: HashMap<i64, JsonValue>,
}

impl AttemptFlow {
    /// 创建新的答题流程
    pub fn new(test_id: i64) -> Self {
        Self {
            test_client: TestClient::new(),
            test_id,
            questions: Vec::new(),
            answers: HashMap::new(),
        }
    }

    /// 拉取测验题目（考试顺序）
    pub async fn load_questions(&mut self, executor: &HttpExecutor) -> Result<()> {
        info!("🔍 正在拉取测验 {} 的题目...", self.test_id);
        self.questions = self.test_client.questions(executor, self.test_id).await?;
        info!("✓ 共 {} 道题目", self.questions.len());
        Ok(())
    }

    /// 题目列表（考试顺序）
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// 记录作答（同一题重复作答覆盖旧值）
    ///
    /// # 参数
    /// - `question_id`: 题目 ID
    /// - `answer`: 选项 ID（数字）或自由文本
    pub fn answer(&mut self, question_id: i64, answer: JsonValue) {
        if !self.questions.iter().any(|q| q.id == question_id) {
            warn!("⚠️ 题目 {} 不属于本测验，忽略该作答", question_id);
            return;
        }
        self.answers.insert(question_id, answer);
    }

    /// 尚未作答的题目 ID（考试顺序）
    pub fn unanswered(&self) -> Vec<i64> {
        self.questions
            .iter()
            .filter(|q| !self.answers.contains_key(&q.id))
            .map(|q| q.id)
            .collect()
    }

    /// 提交答卷
    ///
    /// 答案按考试顺序排列；未作答的题目不出现在请求体里。
    pub async fn submit(&self, executor: &HttpExecutor) -> Result<MutationResponse> {
        let unanswered = self.unanswered();
        if !unanswered.is_empty() {
            warn!("⚠️ 还有 {} 道题未作答，仍按原样提交", unanswered.len());
        }

        let answers: Vec<AttemptAnswer> = self
            .questions
            .iter()
            .filter_map(|q| {
                self.answers.get(&q.id).map(|value| AttemptAnswer {
                    question_id: q.id,
                    answer: value.clone(),
                })
            })
            .collect();

        info!(
            "📤 正在提交测验 {} 的答卷 ({} 条作答)...",
            self.test_id,
            answers.len()
        );
        let response = self
            .test_client
            .submit_attempt(executor, self.test_id, &AttemptSubmission { answers })
            .await?;
        info!("✓ 答卷提交成功");
        Ok(response)
    }
}
