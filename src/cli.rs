use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "scorecard",
    version,
    about = "答题卡 HTML → 成绩单（逐题判分、分科统计、负分计算）"
)]
pub struct Cli {
    /// 显示详细日志（等同 VERBOSE_LOGGING=true）
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 分析一张答题卡
    Analyze(AnalyzeArgs),
    /// 批量分析文件夹中的所有 .html 答题卡
    Batch(BatchArgs),
    /// 列出考试目录
    Exams(ExamsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// 本地 HTML 文件
    #[arg(long, conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// 答题卡地址
    #[arg(long)]
    pub url: Option<String>,

    /// 考试 ID，省略时自动识别
    #[arg(long)]
    pub exam: Option<String>,

    /// JSON 输出路径，省略时输出到标准输出
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    #[arg(long)]
    pub dir: PathBuf,

    #[arg(long)]
    pub exam: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ExamsArgs {
    /// 只列出该类别（SSC / RAILWAY / IB / BANK / POLICE）
    #[arg(long)]
    pub category: Option<String>,
}
