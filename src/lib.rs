//! # Scorecard
//!
//! 把在线考试的答题卡（Response Sheet）HTML 转换为成绩单的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有解析后的文档，只暴露查询能力
//! - `SheetDocument` - 唯一的 DOM owner，提供 query_all() 能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `detect_format` - 识别答题卡方言
//! - `QuestionExtractor` - 两种方言的题目提取
//! - `SectionMapper` / `score` - 科目映射与计分
//! - `FetchService` - 多路线获取答题卡
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张答题卡"的完整处理流程
//! - `SheetCtx` - 上下文封装（序号 + 标签 + 考试）
//! - `ScorecardFlow` - 流程编排（parse → extract → score → assemble）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 应用入口，管理并发
//! - `orchestrator/sheet_processor` - 单张答题卡的读写
//!
//! ## 模块结构

pub mod browser;
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
pub use error::{AppError, AppResult};
pub use infrastructure::SheetDocument;
pub use models::{ExamCatalog, ScorecardData};
pub use orchestrator::{App, SheetInput};
pub use services::{FetchOutcome, FetchService};
pub use workflow::{ScorecardFlow, SheetCtx};
