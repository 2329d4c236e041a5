//! # Test Platform Client
//!
//! 测验平台的 Rust 命令行客户端
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 连接池 + 令牌），只暴露能力
//! - `HttpExecutor` - 唯一的 reqwest::Client owner，提供请求能力
//!
//! ### ② 业务能力层（Clients / Services）
//! - `clients/` - 无状态端点封装，按资源划分
//! - `AuthClient` / `QuestionClient` / `TestClient` / `UserClient`
//! - `services/` - 描述"我能做什么"
//! - `QuestionSelection` - 选题同步能力（池子 / 顺序 / 搜索）
//! - `SessionStore` - 会话槽位读写能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义一次完整操作的流程
//! - `AuthoringCtx` - 组卷上下文（名称 + 时长 + 窗口）
//! - `AuthoringFlow` - 组卷编排（拉池 → 选题 → 提交）
//! - `AttemptFlow` - 作答编排（拉题 → 作答 → 整卷提交）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 命令调度器，管理会话与资源
//!
//! ## 模块结构

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, SelectionError};
pub use infrastructure::HttpExecutor;
pub use models::{Question, QuestionType, Test, TestDraft};
pub use orchestrator::App;
pub use services::{QuestionSelection, SessionStore};
pub use workflow::{AttemptFlow, AuthoringCtx, AuthoringFlow};
