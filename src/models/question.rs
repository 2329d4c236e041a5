use serde::{Deserialize, Serialize};

/// 题目类型（与服务端枚举一一对应）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    McqSingle,
    McqMultiple,
    TrueFalse,
    ShortAnswer,
    FillBlank,
}

impl QuestionType {
    /// 查询参数里使用的服务端取值
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::McqSingle => "mcq_single",
            QuestionType::McqMultiple => "mcq_multiple",
            QuestionType::TrueFalse => "true_false",
            QuestionType::ShortAnswer => "short_answer",
            QuestionType::FillBlank => "fill_blank",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            QuestionType::McqSingle => "单选题",
            QuestionType::McqMultiple => "多选题",
            QuestionType::TrueFalse => "判断题",
            QuestionType::ShortAnswer => "简答题",
            QuestionType::FillBlank => "填空题",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mcq_single" => Ok(QuestionType::McqSingle),
            "mcq_multiple" => Ok(QuestionType::McqMultiple),
            "true_false" => Ok(QuestionType::TrueFalse),
            "short_answer" => Ok(QuestionType::ShortAnswer),
            "fill_blank" => Ok(QuestionType::FillBlank),
            other => Err(format!("未知的题目类型: {}", other)),
        }
    }
}

/// 选项（从属于某一道题目，顺序按服务端返回保持不变）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub option_text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// 题目（题库中的一条记录，客户端视角下除选中状态外不可变）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    #[serde(default)]
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub topic_id: Option<i64>,
    pub question_type: QuestionType,
    pub content: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

impl Question {
    /// 题干预览（最多80个字符，用于日志显示）
    pub fn content_preview(&self) -> String {
        crate::utils::logging::truncate_text(&self.content, 80)
    }
}

/// 新建/编辑题目的提交数据（没有服务端分配的 id）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDraft {
    #[serde(default)]
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub topic_id: Option<i64>,
    pub question_type: QuestionType,
    pub content: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

/// 题库查询条件
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    /// 按题干内容模糊搜索
    pub search: Option<String>,
    /// 按题目类型过滤
    pub question_type: Option<QuestionType>,
}

/// 批量上传单行错误
#[derive(Debug, Clone, Deserialize)]
pub struct BulkUploadRowError {
    pub row: u64,
    pub message: String,
}

/// 批量上传结果
#[derive(Debug, Clone, Deserialize)]
pub struct BulkUploadReport {
    pub summary: String,
    #[serde(default)]
    pub error_count: u64,
    #[serde(default)]
    pub errors: Vec<BulkUploadRowError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_uses_snake_case_on_the_wire() {
        let json = serde_json::to_string(&QuestionType::McqSingle).unwrap();
        assert_eq!(json, "\"mcq_single\"");
        let back: QuestionType = serde_json::from_str("\"true_false\"").unwrap();
        assert_eq!(back, QuestionType::TrueFalse);
    }

    #[test]
    fn question_deserializes_from_server_shape() {
        let json = r#"{
            "id": 7,
            "subject_id": 2,
            "question_type": "mcq_single",
            "content": "What is 2 + 2?",
            "difficulty": "easy",
            "explanation": "Basic arithmetic",
            "options": [
                {"id": 1, "option_text": "3", "is_correct": false},
                {"id": 2, "option_text": "4", "is_correct": true}
            ]
        }"#;
        let q: Question = serde_json::from_str(json).expect("服务端返回的题目应能解析");
        assert_eq!(q.id, 7);
        assert_eq!(q.question_type, QuestionType::McqSingle);
        assert_eq!(q.options.len(), 2);
        // 选项顺序按返回保持不变
        assert_eq!(q.options[0].option_text, "3");
        assert!(q.options[1].is_correct);
    }

    #[test]
    fn question_tolerates_missing_optional_fields() {
        let json = r#"{"id": 1, "question_type": "short_answer", "content": "Explain gravity."}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert!(q.options.is_empty());
        assert!(q.difficulty.is_none());
    }

    #[test]
    fn bulk_report_parses_errors() {
        let json = r#"{
            "summary": "8 uploaded, 2 failed",
            "error_count": 2,
            "errors": [
                {"row": 3, "message": "missing content"},
                {"row": 5, "message": "bad question_type"}
            ]
        }"#;
        let report: BulkUploadReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.error_count, 2);
        assert_eq!(report.errors[0].row, 3);
    }
}
