//! 组卷上下文
//!
//! 封装"我正在创建一份什么样的测验"这一信息（题目之外的元数据）

use crate::models::TestDraft;
use std::fmt::Display;

/// 组卷上下文
///
/// 包含测验的调度元数据，题目列表由选题同步器产出后再合并
#[derive(Debug, Clone)]
pub struct AuthoringCtx {
    /// 测验名称
    pub name: String,

    /// 科目 ID
    pub subject_id: Option<i64>,

    /// 组卷模式
    pub pattern: Option<String>,

    /// 时长（分钟）
    pub duration_minutes: i64,

    /// 开放窗口起点
    pub start_time: Option<String>,

    /// 开放窗口终点
    pub end_time: Option<String>,

    /// 允许作答次数
    pub attempt_limit: i64,
}

impl AuthoringCtx {
    /// 创建新的组卷上下文
    pub fn new(name: impl Into<String>, duration_minutes: i64, attempt_limit: i64) -> Self {
        Self {
            name: name.into(),
            subject_id: None,
            pattern: None,
            duration_minutes,
            start_time: None,
            end_time: None,
            attempt_limit,
        }
    }

    /// 合并考试顺序的题目 ID，生成提交数据
    pub fn to_draft(&self, question_ids: Vec<i64>) -> TestDraft {
        TestDraft {
            name: self.name.clone(),
            subject_id: self.subject_id,
            pattern: self.pattern.clone(),
            duration_minutes: self.duration_minutes,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            attempt_limit: self.attempt_limit,
            question_ids,
        }
    }
}

impl Display for AuthoringCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[测验 {} 时长#{}分钟 次数上限#{}]",
            self.name, self.duration_minutes, self.attempt_limit
        )
    }
}
