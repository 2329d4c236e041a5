//! 命令行定义
//!
//! clap 子命令树 + 交互式选题循环的命令解析

use crate::models::QuestionType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 测验平台命令行客户端
#[derive(Debug, Parser)]
#[command(name = "test_platform_client", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 登录并把令牌写入本地会话槽位
    Login {
        email: String,
        password: String,
    },
    /// 登出（清空本地令牌）
    Logout,
    /// 注册新账号
    Register {
        email: String,
        password: String,
        /// 角色: admin / teacher / student
        #[arg(long, default_value = "student")]
        role: String,
    },
    /// 发起找回密码
    ForgotPassword { email: String },
    /// 用重置令牌设置新密码
    ResetPassword { token: String, password: String },
    /// 验证邮箱
    VerifyEmail { token: String },
    /// 个人资料
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// 题库管理
    Questions {
        #[command(subcommand)]
        command: QuestionCommand,
    },
    /// 测验管理
    Tests {
        #[command(subcommand)]
        command: TestCommand,
    },
    /// 用户列表
    Users,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// 查看资料
    Show,
    /// 更新资料（只发送填写过的字段）
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// 注销账号（同时清空本地令牌）
    Delete,
}

#[derive(Debug, Subcommand)]
pub enum QuestionCommand {
    /// 查询题目列表
    List {
        /// 按题干内容搜索
        #[arg(long)]
        search: Option<String>,
        /// 按类型过滤: mcq_single / mcq_multiple / true_false / short_answer / fill_blank
        #[arg(long)]
        question_type: Option<QuestionType>,
    },
    /// 查看单个题目
    Show { id: i64 },
    /// 从 TOML 文件新建题目
    Add {
        #[arg(long)]
        file: PathBuf,
    },
    /// 从 TOML 文件更新题目
    Update {
        id: i64,
        #[arg(long)]
        file: PathBuf,
    },
    /// 删除题目
    Delete { id: i64 },
    /// 批量上传题目（CSV）
    BulkUpload { file: PathBuf },
}

#[derive(Debug, Subcommand)]
pub enum TestCommand {
    /// 查询测验列表
    List,
    /// 查看测验详情
    Show { id: i64 },
    /// 创建测验（选题顺序即考试顺序）
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 60)]
        duration_minutes: i64,
        #[arg(long)]
        subject_id: Option<i64>,
        #[arg(long)]
        pattern: Option<String>,
        #[arg(long)]
        start_time: Option<String>,
        #[arg(long)]
        end_time: Option<String>,
        #[arg(long, default_value_t = 1)]
        attempt_limit: i64,
        /// 直接给出考试顺序的题目 ID（逗号分隔）
        #[arg(long, value_delimiter = ',')]
        question_ids: Option<Vec<i64>>,
        /// 拉取题库时的搜索条件
        #[arg(long)]
        search: Option<String>,
        /// 拉取题库时的类型过滤
        #[arg(long)]
        question_type: Option<QuestionType>,
        /// 进入交互式选题（search/add/move/rm/list/done）
        #[arg(long)]
        interactive: bool,
    },
    /// 指派测验给学生
    Assign {
        id: i64,
        /// 学生用户 ID（逗号分隔）
        #[arg(long, value_delimiter = ',')]
        user_ids: Vec<i64>,
        #[arg(long)]
        start_time: Option<String>,
        #[arg(long)]
        end_time: Option<String>,
        #[arg(long, default_value_t = 1)]
        attempt_limit: i64,
    },
    /// 查看测验的题目
    Questions { id: i64 },
    /// 交互式作答
    Attempt { id: i64 },
    /// 查看成绩
    Results { id: i64 },
    /// 查看统计
    Analytics { id: i64 },
}

/// 交互式选题循环里的单条命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurationCommand {
    /// 设置候选搜索词（空字符串清除）
    Search(String),
    /// 勾选题目（追加到已选末尾）
    Add(i64),
    /// 把已选列表第 from 位移动到第 to 位（界面从 1 开始计数）
    Move(usize, usize),
    /// 从已选列表移除题目
    Remove(i64),
    /// 显示当前候选与已选
    List,
    /// 结束选题并提交
    Done,
    /// 放弃组卷
    Quit,
}

/// 解析交互式选题命令
///
/// # 参数
/// - `line`: 操作者输入的一行文本
///
/// # 返回
/// 返回解析出的命令，无法识别时返回错误说明
pub fn parse_curation_command(line: &str) -> Result<CurationCommand, String> {
    let mut parts = line.split_whitespace();
    let verb = match parts.next() {
        Some(v) => v,
        None => return Err("请输入命令 (list/search/add/move/rm/done/quit)".to_string()),
    };

    match verb {
        "search" => {
            let text = parts.collect::<Vec<_>>().join(" ");
            Ok(CurationCommand::Search(text))
        }
        "add" => {
            let id = parts
                .next()
                .ok_or("用法: add <题目ID>")?
                .parse::<i64>()
                .map_err(|_| "题目ID必须是数字".to_string())?;
            Ok(CurationCommand::Add(id))
        }
        "move" => {
            let from = parts
                .next()
                .ok_or("用法: move <从> <到>")?
                .parse::<usize>()
                .map_err(|_| "位置必须是数字".to_string())?;
            let to = parts
                .next()
                .ok_or("用法: move <从> <到>")?
                .parse::<usize>()
                .map_err(|_| "位置必须是数字".to_string())?;
            if from == 0 || to == 0 {
                return Err("位置从 1 开始计数".to_string());
            }
            Ok(CurationCommand::Move(from - 1, to - 1))
        }
        "rm" => {
            let id = parts
                .next()
                .ok_or("用法: rm <题目ID>")?
                .parse::<i64>()
                .map_err(|_| "题目ID必须是数字".to_string())?;
            Ok(CurationCommand::Remove(id))
        }
        "list" => Ok(CurationCommand::List),
        "done" => Ok(CurationCommand::Done),
        "quit" => Ok(CurationCommand::Quit),
        other => Err(format!("未知命令: {}", other)),
    }
}
