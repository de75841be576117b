//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责输入输出和并发调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量答题卡处理器
//! - 管理应用生命周期（加载考试目录、构建流程）
//! - 单张分析：文件或 URL → 成绩单
//! - 批量扫描 `.html` 答题卡
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `sheet_processor` - 单张答题卡处理器
//! - 读取答题卡文件
//! - 调用 ScorecardFlow 生成成绩单
//! - 写出 JSON
//! - 输出单张答题卡的摘要
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PathBuf>)
//!     ↓
//! sheet_processor (处理单个文件)
//!     ↓
//! workflow::ScorecardFlow (处理单张答题卡)
//!     ↓
//! services (能力层：format / extract / score / fetch)
//!     ↓
//! infrastructure (基础设施：SheetDocument)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，sheet_processor 管单个
//! 2. **I/O 集中**：只有编排层读写文件和发起网络请求
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure

pub mod batch_processor;
pub mod sheet_processor;

// 重新导出主要类型
pub use batch_processor::{App, BatchStats, SheetInput};
pub use sheet_processor::process_sheet_file;
