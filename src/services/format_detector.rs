//! 答题卡格式识别
//!
//! 只检查原始文本中的特征，不解析 DOM

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::SheetFormat;

/// CSS 类标记答案的特征
const CLASSED_FINGERPRINTS: &[&str] = &["questionRowTbl", "menu-tbl", "rightAns", "wrngAns"];

static COLORED_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(bgcolor\s*=\s*["']?\s*(green|red|yellow|lightgreen|#)|background(-color)?\s*:\s*(green|red|yellow|lightgreen))"#)
        .unwrap()
});

static QUESTION_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)>\s*Q\.\s*(No\.?\s*[:.]?\s*)?\d+").unwrap());

/// 识别答题卡的标记方言
///
/// 两种特征都不明显时回退为 `ViewCandidateResponse`
pub fn detect_format(raw_html: &str) -> SheetFormat {
    let classed_hits = CLASSED_FINGERPRINTS
        .iter()
        .filter(|f| raw_html.contains(*f))
        .count();

    if classed_hits > 0 {
        debug!("识别为 ViewCandidateResponse 格式 (命中 {} 个特征)", classed_hits);
        return SheetFormat::ViewCandidateResponse;
    }

    if COLORED_CELL.is_match(raw_html) && QUESTION_ROW.is_match(raw_html) {
        debug!("识别为 AssessmentTable 格式");
        return SheetFormat::AssessmentTable;
    }

    debug!("未识别出格式特征，回退为 ViewCandidateResponse");
    SheetFormat::ViewCandidateResponse
}
