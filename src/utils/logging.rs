/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use anyhow::Result;
use std::fs;
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::{ScorecardData, SectionResult};

/// 初始化 tracing 订阅器
///
/// `RUST_LOG` 优先；否则 verbose 时为 debug，默认 info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 测试中可能重复初始化，忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n答题卡分析日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 向日志文件追加一行（带时间戳）
pub fn append_log_line(log_file_path: &str, line: &str) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%H:%M:%S"),
        line
    )?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `mode`: 运行模式描述
/// - `max_concurrent`: 最大并发数
pub fn log_startup(mode: &str, max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", mode);
    info!("📊 最大并发数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录答题卡加载信息
pub fn log_sheets_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 张待分析的答题卡", total);
    info!("📋 将以每批 {} 张的方式处理", max_concurrent);
}

/// 记录批次开始信息
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批答题卡: {}-{} / 共 {} 张", start, end, total);
    info!("{}", "=".repeat(60));
}

/// 批量结果的计数摘要
pub fn format_sheet_tally(scored: usize, no_questions: usize, failed: usize) -> String {
    format!(
        "成绩单 {} 张 | 未识别出题目 {} 张 | 失败 {} 张",
        scored, no_questions, failed
    )
}

/// 记录批次完成信息
pub fn log_batch_complete(
    batch_num: usize,
    total_batches: usize,
    scored: usize,
    no_questions: usize,
    failed: usize,
) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 第 {}/{} 批完成: {}",
        batch_num,
        total_batches,
        format_sheet_tally(scored, no_questions, failed)
    );
    info!("{}", "─".repeat(60));
}

/// 输出批量分析的最终汇总
pub fn log_batch_summary(
    scored: usize,
    no_questions: usize,
    failed: usize,
    output_dir: &str,
    log_file_path: &str,
) {
    let total = scored + no_questions + failed;
    info!("\n{}", "=".repeat(60));
    info!(
        "📊 答题卡分析完成 ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 生成成绩单: {}/{}", scored, total);
    if no_questions > 0 {
        info!("⚠️ 未识别出题目: {} (可能是登录页或已过期的链接)", no_questions);
    }
    if failed > 0 {
        info!("❌ 读取或写出失败: {}", failed);
    }
    info!("{}", "=".repeat(60));
    info!("📁 成绩单 JSON: {}", output_dir);
    info!("📝 逐张结果: {}", log_file_path);
}

/// 日志中显示的名称：折叠空白，超长时按字符截断，空值显示为 "-"
pub fn display_label(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return "-".to_string();
    }
    if collapsed.chars().count() > max_chars {
        let mut clipped: String = collapsed.chars().take(max_chars).collect();
        clipped.push('…');
        clipped
    } else {
        collapsed
    }
}

/// 一个科目的单行摘要
pub fn format_section_line(section: &SectionResult) -> String {
    format!(
        "{} {:<28} ✓{:<3} ✗{:<3} -{:<3} ★{:<2} = {:>7.2} / {:.0}",
        section.part,
        display_label(&section.subject, 25),
        section.correct,
        section.wrong,
        section.skipped,
        section.bonus,
        section.score,
        section.max_marks
    )
}

/// 输出成绩单摘要
pub fn log_scorecard_summary(data: &ScorecardData) {
    info!("\n{}", "=".repeat(60));
    if let Some(candidate) = &data.candidate_info {
        info!(
            "👤 {} ({})",
            display_label(&candidate.candidate_name, 30),
            candidate.roll_number
        );
    }
    info!("📋 {} | {} | {} 道题目", data.exam.name, data.format, data.questions.len());
    info!("{}", "─".repeat(60));

    for section in &data.sections {
        info!("{}", format_section_line(section));
    }
    if let Some(qualifying) = &data.qualifying_section {
        info!("{} (资格科目，不计入总分)", format_section_line(qualifying));
    }
    if let Some(unmapped) = &data.unmapped_section {
        info!("{} (未映射)", format_section_line(unmapped));
    }

    info!("{}", "─".repeat(60));
    info!(
        "🎯 总分: {:.2} / {:.0}  (正确 {} / 错误 {} / 未答 {} / 作废 {})",
        data.totals.total_score,
        data.totals.total_max_marks,
        data.totals.total_correct,
        data.totals.total_wrong,
        data.totals.total_skipped,
        data.totals.total_bonus
    );
    for diagnostic in &data.diagnostics {
        info!("💡 {}", diagnostic);
    }
    info!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("答题卡分析", 3), "答题卡…");
        assert_eq!(display_label("  ASHA\n  KUMARI ", 30), "ASHA KUMARI");
        assert_eq!(display_label("   ", 10), "-");
    }

    #[test]
    fn test_sheet_tally() {
        assert_eq!(
            format_sheet_tally(3, 1, 0),
            "成绩单 3 张 | 未识别出题目 1 张 | 失败 0 张"
        );
    }

    #[test]
    fn test_section_line_contains_counts() {
        let section = SectionResult {
            part: "A".to_string(),
            subject: "Reasoning".to_string(),
            total_questions: 25,
            correct: 20,
            wrong: 3,
            skipped: 2,
            bonus: 0,
            marks_per_correct: 2.0,
            negative_per_wrong: 0.5,
            max_marks: 50.0,
            score: 38.5,
            is_qualifying: false,
        };
        let line = format_section_line(&section);
        assert!(line.starts_with("A Reasoning"));
        assert!(line.contains("✓20"));
        assert!(line.contains("38.50 / 50"));
    }

    #[test]
    fn test_log_file_header_and_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.txt");
        let path = path.to_str().unwrap();

        init_log_file(path).unwrap();
        append_log_line(path, "sheet_a.html ok").unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("答题卡分析日志"));
        assert!(content.trim_end().ends_with("sheet_a.html ok"));
    }
}
