//! 单张答题卡处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **读取**：从文件读入原始 HTML
//! 2. **流程调度**：委托 `ScorecardFlow` 生成成绩单
//! 3. **输出**：把成绩单写成 JSON 文件
//! 4. **统计输出**：记录单张答题卡的摘要

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Diagnostic, ScorecardData};
use crate::utils::logging::log_scorecard_summary;
use crate::workflow::{ScorecardFlow, SheetCtx};

/// 读取答题卡文件
pub async fn read_sheet_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))
        .with_context(|| format!("无法读取答题卡: {}", path.display()))
}

/// 成绩单序列化为格式化的 JSON
pub fn scorecard_json(data: &ScorecardData) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// 写出成绩单 JSON
pub async fn write_scorecard(path: &Path, data: &ScorecardData) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("无法创建输出目录: {}", parent.display()))?;
    }
    fs::write(path, scorecard_json(data)?)
        .await
        .with_context(|| format!("无法写入成绩单: {}", path.display()))?;
    info!("💾 成绩单已保存: {}", path.display());
    Ok(())
}

/// 批量模式下的输出路径：`<output_dir>/<文件名>.json`
pub fn output_path_for(sheet_path: &Path, output_dir: &Path) -> PathBuf {
    let stem = sheet_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "scorecard".to_string());
    output_dir.join(format!("{}.json", stem))
}

/// 处理单个答题卡文件
///
/// # 返回
/// 识别出题目时返回 true；文档可解析但没有题目时返回 false
pub async fn process_sheet_file(
    flow: &ScorecardFlow,
    sheet_path: &Path,
    ctx: &SheetCtx,
    output_dir: &Path,
) -> Result<bool> {
    info!("{} 开始分析", ctx);

    let raw_html = read_sheet_file(sheet_path).await?;
    let data = flow
        .run(&raw_html, ctx)
        .map_err(AppError::from)
        .with_context(|| format!("{} 解析失败", ctx))?;

    log_scorecard_summary(&data);
    write_scorecard(&output_path_for(sheet_path, output_dir), &data).await?;

    if data.has_diagnostic(&Diagnostic::NoQuestionsFound) {
        warn!("{} ⚠️ 没有识别出题目，格式可能不受支持", ctx);
        return Ok(false);
    }
    Ok(true)
}
