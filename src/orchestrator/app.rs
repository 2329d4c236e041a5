//! 命令调度器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责命令分发和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：读取会话槽位、创建 HttpExecutor
//! 2. **命令分发**：把 CLI 子命令映射到 clients / workflow
//! 3. **会话生命周期**：登录写入令牌，登出/注销清空令牌
//! 4. **交互式选题**：tests create 的命令循环（拖拽排序的 CLI 对应物）
//!
//! ## 设计特点
//!
//! - **资源所有者**：唯一持有 HttpExecutor 的模块
//! - **串行执行**：一条命令跑完才结束进程，没有共享可变状态
//! - **失败即终态**：API 错误直接展示，不自动重试，由操作者重试

use crate::cli::{
    parse_curation_command, Command, CurationCommand, ProfileCommand, QuestionCommand, TestCommand,
};
use crate::clients::{AuthClient, QuestionClient, TestClient, UserClient};
use crate::config::Config;
use crate::error::{AppError, SessionError};
use crate::infrastructure::HttpExecutor;
use crate::models::{
    AssignRequest, Credentials, ProfileUpdate, Question, QuestionDraft, QuestionFilter,
    RegisterRequest, Role,
};
use crate::services::SessionStore;
use crate::utils::logging;
use crate::workflow::{AttemptFlow, AuthoringCtx, AuthoringFlow};
use anyhow::Result;
use serde_json::{json, Value as JsonValue};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    session_store: SessionStore,
    executor: HttpExecutor,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let session_store = SessionStore::new(&config);

        // 读回本地会话槽位里的令牌（未登录为 None）
        let token = session_store.load()?;
        let executor = HttpExecutor::new(&config, token)?;

        if config.verbose_logging {
            logging::log_startup(&config);
        }

        Ok(Self {
            config,
            session_store,
            executor,
        })
    }

    /// 运行单条命令（跑完即进程结束）
    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login { email, password } => self.login(email, password).await,
            Command::Logout => self.logout(),
            Command::Register {
                email,
                password,
                role,
            } => self.register(email, password, &role).await,
            Command::ForgotPassword { email } => self.forgot_password(&email).await,
            Command::ResetPassword { token, password } => {
                self.reset_password(&token, &password).await
            }
            Command::VerifyEmail { token } => self.verify_email(&token).await,
            Command::Profile { command } => self.run_profile(command).await,
            Command::Questions { command } => self.run_questions(command).await,
            Command::Tests { command } => self.run_tests(command).await,
            Command::Users => self.list_users().await,
        }
    }

    // ========== 认证与会话 ==========

    async fn login(&mut self, email: String, password: String) -> Result<()> {
        // 登录本身不携带令牌
        let anonymous = HttpExecutor::new(&self.config, None)?;
        let token = AuthClient::new()
            .login(&anonymous, &Credentials { email, password })
            .await?;

        self.session_store.save(&token)?;
        self.executor.set_token(Some(token));
        info!("✓ 登录成功，令牌已保存");
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.session_store.clear()?;
        self.executor.set_token(None);
        info!("✓ 已登出");
        Ok(())
    }

    async fn register(&self, email: String, password: String, role: &str) -> Result<()> {
        let role = match role {
            "admin" => Role::Admin,
            "teacher" => Role::Teacher,
            "student" => Role::Student,
            other => anyhow::bail!("未知角色: {} (可选 admin/teacher/student)", other),
        };

        let anonymous = HttpExecutor::new(&self.config, None)?;
        let response = AuthClient::new()
            .register(
                &anonymous,
                &RegisterRequest {
                    email,
                    password,
                    role,
                },
            )
            .await?;
        info!(
            "✓ 注册成功: {}",
            response
                .message
                .unwrap_or_else(|| "请查收验证邮件".to_string())
        );
        Ok(())
    }

    async fn forgot_password(&self, email: &str) -> Result<()> {
        let anonymous = HttpExecutor::new(&self.config, None)?;
        let response = AuthClient::new().forgot_password(&anonymous, email).await?;
        info!(
            "✓ {}",
            response
                .message
                .unwrap_or_else(|| "重置邮件已发送".to_string())
        );
        Ok(())
    }

    async fn reset_password(&self, token: &str, password: &str) -> Result<()> {
        let anonymous = HttpExecutor::new(&self.config, None)?;
        let response = AuthClient::new()
            .reset_password(&anonymous, token, password)
            .await?;
        info!(
            "✓ {}",
            response.message.unwrap_or_else(|| "密码已重置".to_string())
        );
        Ok(())
    }

    async fn verify_email(&self, token: &str) -> Result<()> {
        let anonymous = HttpExecutor::new(&self.config, None)?;
        let response = AuthClient::new().verify_email(&anonymous, token).await?;
        info!(
            "✓ {}",
            response.message.unwrap_or_else(|| "邮箱已验证".to_string())
        );
        Ok(())
    }

    fn ensure_logged_in(&self) -> Result<()> {
        if !self.executor.has_token() {
            return Err(AppError::Session(SessionError::NotLoggedIn).into());
        }
        Ok(())
    }

    // ========== 个人资料 ==========

    async fn run_profile(&mut self, command: ProfileCommand) -> Result<()> {
        self.ensure_logged_in()?;
        let client = UserClient::new();

        match command {
            ProfileCommand::Show => {
                let user = client.profile(&self.executor).await?;
                info!("👤 {} <{}>", user.display_name(), user.email);
                if let Some(role) = user.role {
                    info!("   角色: {}", role);
                }
            }
            ProfileCommand::Update { name, password } => {
                let user = client
                    .update_profile(&self.executor, &ProfileUpdate { name, password })
                    .await?;
                info!("✓ 资料已更新: {}", user.display_name());
            }
            ProfileCommand::Delete => {
                client.delete_profile(&self.executor).await?;
                // 账号没了，本地令牌一并清空
                self.session_store.clear()?;
                self.executor.set_token(None);
                info!("✓ 账号已注销，本地令牌已清空");
            }
        }
        Ok(())
    }

    // ========== 题库 ==========

    async fn run_questions(&self, command: QuestionCommand) -> Result<()> {
        self.ensure_logged_in()?;
        let client = QuestionClient::new();

        match command {
            QuestionCommand::List {
                search,
                question_type,
            } => {
                let filter = QuestionFilter {
                    search,
                    question_type,
                };
                let questions = client.list(&self.executor, &filter).await?;
                info!("✓ 共 {} 道题目", questions.len());
                for q in &questions {
                    info!(
                        "  #{} [{}]{} {}",
                        q.id,
                        q.question_type,
                        q.difficulty
                            .as_deref()
                            .map(|d| format!(" 难度:{}", d))
                            .unwrap_or_default(),
                        q.content_preview()
                    );
                }
            }
            QuestionCommand::Show { id } => {
                let q = client.get(&self.executor, id).await?;
                print_question(&q);
            }
            QuestionCommand::Add { file } => {
                let draft = load_question_draft(&file).await?;
                let response = client.create(&self.executor, &draft).await?;
                info!(
                    "✓ 题目已创建{}",
                    response
                        .id
                        .map(|id| format!(" (ID: {})", id))
                        .unwrap_or_default()
                );
            }
            QuestionCommand::Update { id, file } => {
                let draft = load_question_draft(&file).await?;
                client.update(&self.executor, id, &draft).await?;
                info!("✓ 题目 {} 已更新", id);
            }
            QuestionCommand::Delete { id } => {
                client.delete(&self.executor, id).await?;
                info!("✓ 题目 {} 已删除", id);
            }
            QuestionCommand::BulkUpload { file } => {
                info!("📤 正在上传 {} ...", file.display());
                let report = client.bulk_upload(&self.executor, &file).await?;
                info!("✓ {}", report.summary);
                if report.error_count > 0 {
                    warn!("⚠️ {} 行失败:", report.error_count);
                    for err in &report.errors {
                        warn!("  第 {} 行: {}", err.row, err.message);
                    }
                }
            }
        }
        Ok(())
    }

    // ========== 测验 ==========

    async fn run_tests(&self, command: TestCommand) -> Result<()> {
        self.ensure_logged_in()?;
        let client = TestClient::new();

        match command {
            TestCommand::List => {
                let tests = client.list(&self.executor).await?;
                info!("✓ 共 {} 份测验", tests.len());
                for t in &tests {
                    info!(
                        "  #{} {} (时长 {} 分钟)",
                        t.id,
                        t.name,
                        t.duration_minutes.unwrap_or(0)
                    );
                }
            }
            TestCommand::Show { id } => {
                let t = client.get(&self.executor, id).await?;
                info!("📋 #{} {}", t.id, t.name);
                info!("   时长: {} 分钟", t.duration_minutes.unwrap_or(0));
                if let (Some(start), Some(end)) = (&t.start_time, &t.end_time) {
                    info!("   窗口: {} ~ {}", start, end);
                }
                info!("   次数上限: {}", t.attempt_limit.unwrap_or(1));
                info!("   题目数: {}", t.question_ids.len());
            }
            TestCommand::Create {
                name,
                duration_minutes,
                subject_id,
                pattern,
                start_time,
                end_time,
                attempt_limit,
                question_ids,
                search,
                question_type,
                interactive,
            } => {
                let mut ctx = AuthoringCtx::new(name, duration_minutes, attempt_limit);
                ctx.subject_id = subject_id;
                ctx.pattern = pattern;
                ctx.start_time = start_time;
                ctx.end_time = end_time;

                let filter = QuestionFilter {
                    search,
                    question_type,
                };
                self.create_test(ctx, filter, question_ids, interactive)
                    .await?;
            }
            TestCommand::Assign {
                id,
                user_ids,
                start_time,
                end_time,
                attempt_limit,
            } => {
                let request = AssignRequest {
                    user_ids,
                    start_time,
                    end_time,
                    attempt_limit,
                };
                let response = client.assign(&self.executor, id, &request).await?;
                info!(
                    "✓ {}",
                    response.message.unwrap_or_else(|| "测验已指派".to_string())
                );
            }
            TestCommand::Questions { id } => {
                let questions = client.questions(&self.executor, id).await?;
                info!("✓ 测验 {} 共 {} 道题目（考试顺序）", id, questions.len());
                for (i, q) in questions.iter().enumerate() {
                    info!("  {}. [{}] {}", i + 1, q.question_type, q.content_preview());
                }
            }
            TestCommand::Attempt { id } => {
                self.attempt_test(id).await?;
            }
            TestCommand::Results { id } => {
                let results = client.results(&self.executor, id).await?;
                if results.is_empty() {
                    info!("暂无成绩");
                }
                for r in &results {
                    info!(
                        "  #{} 分数: {} | 状态: {}",
                        r.id,
                        r.score
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        if r.is_graded { "已批改" } else { "待批改" }
                    );
                }
            }
            TestCommand::Analytics { id } => {
                let analytics = client.analytics(&self.executor, id).await?;
                info!("📊 测验 {} 统计", id);
                info!("   平均分: {:?}", analytics.average_score);
                info!("   最高分: {:?}", analytics.highest_score);
                info!("   最低分: {:?}", analytics.lowest_score);
                info!("   作答次数: {}", analytics.total_attempts);
            }
        }
        Ok(())
    }

    /// 组卷：拉池子 → 选题（参数直给或交互式）→ 提交
    async fn create_test(
        &self,
        ctx: AuthoringCtx,
        filter: QuestionFilter,
        question_ids: Option<Vec<i64>>,
        interactive: bool,
    ) -> Result<()> {
        let mut flow = AuthoringFlow::new(&self.config);
        flow.refresh_pool(&self.executor, &filter).await?;

        // 参数直给的 ID 按给定顺序勾选（池子里没有的会被忽略并告警）
        if let Some(ids) = question_ids {
            for id in ids {
                flow.toggle_select(id);
            }
        }

        if interactive {
            let stdin = std::io::stdin();
            let aborted = run_curation_loop(&mut flow, &mut stdin.lock())?;
            if aborted {
                info!("组卷已放弃");
                return Ok(());
            }
        }

        flow.submit(&self.executor, &ctx).await?;
        Ok(())
    }

    /// 作答：逐题提示输入，最后整卷提交
    async fn attempt_test(&self, test_id: i64) -> Result<()> {
        let mut flow = AttemptFlow::new(test_id);
        flow.load_questions(&self.executor).await?;

        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();

        let questions: Vec<Question> = flow.questions().to_vec();
        for (i, q) in questions.iter().enumerate() {
            println!("\n{}. {}", i + 1, q.content);
            if q.options.is_empty() {
                print!("你的回答: ");
            } else {
                for opt in &q.options {
                    println!("   [{}] {}", opt.id.unwrap_or(0), opt.option_text);
                }
                print!("选项 ID: ");
            }
            std::io::stdout().flush().ok();

            let line = match lines.next() {
                Some(line) => line?,
                None => break,
            };
            let input = line.trim();
            if input.is_empty() {
                // 跳过未作答的题
                continue;
            }

            let answer: JsonValue = if q.options.is_empty() {
                json!(input)
            } else {
                match input.parse::<i64>() {
                    Ok(option_id) => json!(option_id),
                    Err(_) => {
                        warn!("⚠️ 选项 ID 必须是数字，跳过本题");
                        continue;
                    }
                }
            };
            flow.answer(q.id, answer);
        }

        flow.submit(&self.executor).await?;
        Ok(())
    }

    // ========== 用户 ==========

    async fn list_users(&self) -> Result<()> {
        self.ensure_logged_in()?;
        let users = UserClient::new().list(&self.executor).await?;
        info!("✓ 共 {} 个用户", users.len());
        for user in &users {
            info!(
                "  #{} {} <{}>{}",
                user.id,
                user.display_name(),
                user.email,
                user.role.map(|r| format!(" [{}]", r)).unwrap_or_default()
            );
        }
        Ok(())
    }
}

/// 交互式选题循环（拖拽排序界面的 CLI 对应物）
///
/// # 返回
/// 操作者输入 quit 放弃时返回 true
fn run_curation_loop(flow: &mut AuthoringFlow, input: &mut impl BufRead) -> Result<bool> {
    println!("进入选题模式。命令: search <文本> | add <题目ID> | move <从> <到> | rm <题目ID> | list | done | quit");
    print_curation_state(flow);

    let mut line = String::new();
    loop {
        print!("选题> ");
        std::io::stdout().flush().ok();

        line.clear();
        if input.read_line(&mut line)? == 0 {
            // 输入流结束视为 done
            return Ok(false);
        }

        let command = match parse_curation_command(line.trim()) {
            Ok(command) => command,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };

        match command {
            CurationCommand::Search(text) => {
                flow.set_search(text);
                print_curation_state(flow);
            }
            CurationCommand::Add(id) => {
                flow.toggle_select(id);
                print_curation_state(flow);
            }
            CurationCommand::Move(from, to) => match flow.reorder(from, to) {
                Ok(()) => print_curation_state(flow),
                Err(e) => println!("{}", e),
            },
            CurationCommand::Remove(id) => {
                flow.remove(id);
                print_curation_state(flow);
            }
            CurationCommand::List => print_curation_state(flow),
            CurationCommand::Done => return Ok(false),
            CurationCommand::Quit => return Ok(true),
        }
    }
}

/// 显示候选池与当前考试顺序
fn print_curation_state(flow: &AuthoringFlow) {
    let candidates = flow.candidates();
    println!("── 候选 ({} 道) ──", candidates.len());
    for q in candidates.iter().take(10) {
        println!("  #{} [{}] {}", q.id, q.question_type, q.content_preview());
    }
    if candidates.len() > 10 {
        println!("  ... 其余 {} 道省略（用 search 缩小范围）", candidates.len() - 10);
    }

    let selected = flow.ordered_selection();
    println!("── 已选 ({} 道，考试顺序) ──", selected.len());
    for (i, q) in selected.iter().enumerate() {
        println!("  {}. #{} {}", i + 1, q.id, q.content_preview());
    }
}

/// 打印完整题目
fn print_question(q: &Question) {
    info!("📝 #{} [{}] {}", q.id, q.question_type, q.content);
    if let Some(difficulty) = &q.difficulty {
        info!("   难度: {}", difficulty);
    }
    if let Some(explanation) = &q.explanation {
        info!("   解析: {}", explanation);
    }
    for opt in &q.options {
        info!(
            "   - {}{}",
            opt.option_text,
            if opt.is_correct { " (正确)" } else { "" }
        );
    }
}

/// 从 TOML 文件加载题目草稿
async fn load_question_draft(path: &Path) -> Result<QuestionDraft> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("无法读取题目文件 {}: {}", path.display(), e))?;
    let draft: QuestionDraft = toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("无法解析题目文件 {}: {}", path.display(), e))?;
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionType;
    use std::io::Cursor;

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

    fn flow_with_pool() -> AuthoringFlow {
        let mut flow = AuthoringFlow::new(&Config::default());
        flow.install_pool(vec![
            question(1, "Algebra basics"),
            question(2, "Geometry intro"),
            question(3, "Calculus primer"),
        ]);
        flow
    }

    #[test]
    fn curation_loop_follows_scripted_commands() {
        let mut flow = flow_with_pool();
        let script = "add 1\nadd 3\nmove 1 2\nrm 1\ndone\n";
        let mut input = Cursor::new(script);
        let aborted = run_curation_loop(&mut flow, &mut input).unwrap();
        assert!(!aborted);
        let ids: Vec<i64> = flow.ordered_selection().iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn curation_loop_quit_aborts() {
        let mut flow = flow_with_pool();
        let mut input = Cursor::new("add 2\nquit\n");
        let aborted = run_curation_loop(&mut flow, &mut input).unwrap();
        assert!(aborted);
    }

    #[test]
    fn curation_loop_eof_means_done() {
        let mut flow = flow_with_pool();
        let mut input = Cursor::new("add 2\n");
        let aborted = run_curation_loop(&mut flow, &mut input).unwrap();
        assert!(!aborted);
        let ids: Vec<i64> = flow.ordered_selection().iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn question_draft_parses_from_toml() {
        let toml_text = r#"
            question_type = "mcq_single"
            content = "What is 2 + 2?"
            difficulty = "easy"

            [[options]]
            option_text = "3"
            is_correct = false

            [[options]]
            option_text = "4"
            is_correct = true
        "#;
        let draft: QuestionDraft = toml::from_str(toml_text).expect("题目草稿应能解析");
        assert_eq!(draft.question_type, QuestionType::McqSingle);
        assert_eq!(draft.options.len(), 2);
        assert!(draft.options[1].is_correct);
    }
}
