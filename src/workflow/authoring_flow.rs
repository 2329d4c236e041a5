//! 组卷流程 - 流程层
//!
//! 核心职责：定义"创建一份测验"的完整流程
//!
//! 流程顺序：
//! 1. 拉取题库 → 选题同步器对账（每次拉取恰好一次）
//! 2. 操作者筛选/勾选/拖拽排序
//! 3. 按考试顺序提交 question_ids

use anyhow::Result;
use tracing::{info, warn};

use crate::clients::{QuestionClient, TestClient};
use crate::config::Config;
use crate::error::SelectionError;
use crate::infrastructure::HttpExecutor;
use crate::models::{MutationResponse, Question, QuestionFilter};
use crate::services::QuestionSelection;
use crate::workflow::authoring_ctx::AuthoringCtx;

/// 组卷流程
///
/// - 编排选题与提交，自己不持有 HTTP 资源
/// - 只依赖业务能力（clients / selection）
pub struct AuthoringFlow {
    question_client: QuestionClient,
    test_client: TestClient,
    selection: QuestionSelection,
    verbose_logging: bool,
}

impl AuthoringFlow {
    /// 创建新的组卷流程
    pub fn new(config: &Config) -> Self {
        Self {
            question_client: QuestionClient::new(),
            test_client: TestClient::new(),
            selection: QuestionSelection::new(),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 编辑已有测验：用其题目顺序预填选题状态
    pub fn with_existing_order(config: &Config, question_ids: Vec<i64>) -> Self {
        Self {
            question_client: QuestionClient::new(),
            test_client: TestClient::new(),
            selection: QuestionSelection::with_selected(question_ids),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 拉取题库并对账选题状态
    ///
    /// 对账在每次拉取后恰好执行一次：池子里消失的已选题目被移除，
    /// 幸存条目保持手工排好的顺序。
    pub async fn refresh_pool(
        &mut self,
        executor: &HttpExecutor,
        filter: &QuestionFilter,
    ) -> Result<()> {
        info!("🔍 正在拉取题库...");
        let pool = self.question_client.list(executor, filter).await?;
        info!("✓ 题库拉取完成，共 {} 道题目", pool.len());

        if self.verbose_logging {
            self.log_pool(&pool);
        }

        self.install_pool(pool);
        Ok(())
    }

    /// 用新的题库池对账选题状态
    pub(crate) fn install_pool(&mut self, pool: Vec<Question>) {
        let dropped = self.selection.set_pool(pool);
        if dropped > 0 {
            warn!("⚠️ 有 {} 道已选题目在题库刷新后不存在，已自动移除", dropped);
        }
    }

    /// 设置候选搜索词
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.selection.set_search(text);
    }

    /// 候选题目（搜索过滤后的未选集合）
    pub fn candidates(&self) -> Vec<&Question> {
        self.selection.candidates()
    }

    /// 勾选/取消勾选题目
    pub fn toggle_select(&mut self, question_id: i64) -> bool {
        let changed = self.selection.toggle_select(question_id);
        if !changed {
            warn!("⚠️ 题目 {} 不在当前题库池中，忽略", question_id);
        }
        changed
    }

    /// 拖拽重排已选题目
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), SelectionError> {
        self.selection.reorder(from, to)
    }

    /// 从已选列表移除题目
    pub fn remove(&mut self, question_id: i64) {
        self.selection.remove(question_id);
    }

    /// 当前考试顺序的已选题目
    pub fn ordered_selection(&self) -> Vec<&Question> {
        self.selection.ordered_selection()
    }

    /// 按考试顺序提交测验
    ///
    /// # 参数
    /// - `executor`: HTTP 执行器
    /// - `ctx`: 组卷上下文（名称、时长、窗口等元数据）
    pub async fn submit(
        &self,
        executor: &HttpExecutor,
        ctx: &AuthoringCtx,
    ) -> Result<MutationResponse> {
        let question_ids: Vec<i64> = self
            .selection
            .ordered_selection()
            .iter()
            .map(|q| q.id)
            .collect();

        if question_ids.is_empty() {
            warn!("⚠️ {} 没有选中任何题目，仍按原样提交", ctx);
        }

        info!("📤 正在提交测验 {} ({} 道题目)...", ctx, question_ids.len());
        let response = self
            .test_client
            .create(executor, &ctx.to_draft(question_ids))
            .await?;

        info!(
            "✓ 测验创建成功{}",
            response
                .id
                .map(|id| format!(" (ID: {})", id))
                .unwrap_or_default()
        );
        Ok(response)
    }

    // ========== 日志辅助方法 ==========

    /// 显示题库池预览
    fn log_pool(&self, pool: &[Question]) {
        for (i, q) in pool.iter().take(5).enumerate() {
            info!("  {}. [{}] {}", i + 1, q.question_type, q.content_preview());
        }
        if pool.len() > 5 {
            info!("  ... 其余 {} 道省略", pool.len() - 5);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionType;

    fn question(id: i64, content: &str) -> Question {
        Question {
            id,
            subject_id: None,
            topic_id: None,
            question_type: QuestionType::McqSingle,
            content: content.to_string(),
            difficulty: None,
            explanation: None,
            options: Vec::new(),
        }
    }

    #[test]
    fn existing_order_survives_first_pool_install() {
        // 编辑已有测验：预填 [3,1]，第一次装入池子后顺序不变
        let mut flow = AuthoringFlow::with_existing_order(&Config::default(), vec![3, 1]);
        flow.install_pool(vec![question(1, "Q1"), question(2, "Q2"), question(3, "Q3")]);

        let ids: Vec<i64> = flow.ordered_selection().iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn existing_order_drops_ids_missing_from_pool() {
        let mut flow = AuthoringFlow::with_existing_order(&Config::default(), vec![3, 9, 1]);
        flow.install_pool(vec![question(1, "Q1"), question(3, "Q3")]);

        let ids: Vec<i64> = flow.ordered_selection().iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn toggling_outside_pool_reports_no_change() {
        let mut flow = AuthoringFlow::new(&Config::default());
        flow.install_pool(vec![question(1, "Q1")]);
        assert!(!flow.toggle_select(99));
        assert!(flow.toggle_select(1));
    }
}
