//! 成绩单生成流程 - 流程层
//!
//! 核心职责：定义"一张答题卡"的完整处理流程
//!
//! 流程顺序：
//! 1. 解析文档 → 识别格式 → 推断图片基础地址
//! 2. 提取考生信息 → 选定考试
//! 3. 提取题目（编号 + 科目映射 + 判分）
//! 4. 计分 → 组装成绩单 → 汇总诊断信息
//!
//! 整个流程是同步的纯计算，不做任何 I/O

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ParseError;
use crate::infrastructure::SheetDocument;
use crate::models::{
    CandidateInfo, Diagnostic, ExamCatalog, ExamConfig, ExamSummary, QuestionResult,
    ScorecardData, DEFAULT_EXAM_ID, RRB_FALLBACK_EXAM_ID,
};
use crate::services::{
    detect_format, extract_candidate_info, score, BaseUrl, QuestionExtractor, SectionMapper,
};
use crate::workflow::sheet_ctx::SheetCtx;

/// 成绩单生成流程
///
/// - 不持有任何网络或浏览器资源
/// - 只依赖业务能力（services）和只读的考试目录
#[derive(Debug, Clone)]
pub struct ScorecardFlow {
    catalog: Arc<ExamCatalog>,
    default_exam_id: String,
}

impl Default for ScorecardFlow {
    fn default() -> Self {
        Self::new(Arc::new(ExamCatalog::builtin()), DEFAULT_EXAM_ID)
    }
}

impl ScorecardFlow {
    pub fn new(catalog: Arc<ExamCatalog>, default_exam_id: impl Into<String>) -> Self {
        Self {
            catalog,
            default_exam_id: default_exam_id.into(),
        }
    }

    pub fn from_config(catalog: Arc<ExamCatalog>, config: &Config) -> Self {
        Self::new(catalog, config.default_exam_id.clone())
    }

    pub fn catalog(&self) -> &ExamCatalog {
        &self.catalog
    }

    /// 处理一张答题卡
    ///
    /// 只有输入为空或完全不是 HTML 时返回错误，其余异常都记录为诊断信息
    pub fn run(&self, raw_html: &str, ctx: &SheetCtx) -> Result<ScorecardData, ParseError> {
        let document = SheetDocument::parse(raw_html)?;
        let mut diagnostics = Vec::new();

        let format = detect_format(raw_html);
        let base_url = BaseUrl::detect(raw_html, ctx.source_url.as_deref());
        info!(
            "{} 📄 格式: {}, 分页: {}, 图片地址: {}",
            ctx,
            format,
            document.part_count(),
            base_url
        );

        let candidate_info = extract_candidate_info(&document);
        if candidate_info.is_none() {
            debug!("{} 未找到考生信息", ctx);
            diagnostics.push(Diagnostic::CandidateInfoMissing);
        }

        let exam = self.choose_exam(ctx, candidate_info.as_ref(), raw_html, &mut diagnostics);
        let exam_summary = summarize(exam);
        info!("{} 📋 考试: {} ({})", ctx, exam_summary.name, exam_summary.id);

        let mapper = SectionMapper::new(exam_summary.ranges.clone());
        let questions = QuestionExtractor::from(format).extract(&document, &base_url, &mapper);
        info!("{} ✓ 提取到 {} 道题目", ctx, questions.len());

        let breakdown = score(&questions, &exam_summary.ranges);
        let unmapped = breakdown.unmapped.as_ref().map(|u| u.total_questions);
        diagnostics.extend(question_diagnostics(&questions, exam, unmapped));

        for diagnostic in diagnostics.iter().filter(|d| d.is_prominent()) {
            warn!("{} ⚠️ {}", ctx, diagnostic);
        }

        Ok(ScorecardData::assemble(
            candidate_info,
            exam_summary,
            format,
            base_url.to_string(),
            questions,
            breakdown,
            diagnostics,
        ))
    }

    /// 选定计分所用的考试
    ///
    /// 指定 ID 优先；未知 ID 回退到默认考试；未指定时根据 RRB 特征自动识别
    fn choose_exam(
        &self,
        ctx: &SheetCtx,
        candidate_info: Option<&CandidateInfo>,
        raw_html: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<&ExamConfig> {
        match ctx.exam_id.as_deref() {
            Some(requested) => match self.catalog.get(requested) {
                Some(exam) => Some(exam),
                None => {
                    let fallback = self.fallback_exam();
                    let fallback_id = fallback.map(|e| e.id.clone()).unwrap_or_default();
                    warn!("{} 未知考试 {}，回退到考试 {}", ctx, requested, fallback_id);
                    diagnostics.push(Diagnostic::CatalogMiss {
                        requested: requested.to_string(),
                        fallback: fallback_id,
                    });
                    fallback
                }
            },
            None if looks_like_rrb(candidate_info, raw_html, ctx.source_url.as_deref()) => {
                debug!("{} 识别为 RRB 答题卡", ctx);
                self.catalog
                    .get(RRB_FALLBACK_EXAM_ID)
                    .or_else(|| self.fallback_exam())
            }
            None => self.fallback_exam(),
        }
    }

    /// 默认考试；配置的默认考试不在目录中时使用内置默认考试
    fn fallback_exam(&self) -> Option<&ExamConfig> {
        self.catalog
            .get(&self.default_exam_id)
            .or_else(|| self.catalog.get(DEFAULT_EXAM_ID))
    }
}

fn looks_like_rrb(candidate_info: Option<&CandidateInfo>, raw_html: &str, source_url: Option<&str>) -> bool {
    let subject_mentions_rrb = candidate_info.is_some_and(|info| {
        let subject = info.subject.to_lowercase();
        subject.contains("rrb") || subject.contains("ntpc")
    });

    subject_mentions_rrb
        || raw_html.contains("rrb.digialm.com")
        || source_url.is_some_and(|u| u.contains("rrb.digialm.com"))
}

fn summarize(exam: Option<&ExamConfig>) -> ExamSummary {
    match exam {
        Some(exam) => ExamSummary {
            id: exam.id.clone(),
            name: exam.name.clone(),
            ranges: exam.section_ranges(),
        },
        None => ExamSummary {
            id: String::new(),
            name: String::new(),
            ranges: Vec::new(),
        },
    }
}

/// 与题目相关的诊断信息
fn question_diagnostics(
    questions: &[QuestionResult],
    exam: Option<&ExamConfig>,
    unmapped: Option<u32>,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if questions.is_empty() {
        diagnostics.push(Diagnostic::NoQuestionsFound);
        return diagnostics;
    }

    if let Some(count) = unmapped {
        diagnostics.push(Diagnostic::UnmappedQuestions { count });
    }

    let found = questions.len() as u32;
    if let Some(expected) = exam.map(ExamConfig::subject_question_total) {
        if expected != found {
            diagnostics.push(Diagnostic::QuestionCountMismatch { expected, found });
        }
    }

    let inferred = questions.iter().filter(|q| q.chosen_inferred).count() as u32;
    if inferred > 0 {
        diagnostics.push(Diagnostic::ChosenOptionInferred { count: inferred });
    }

    diagnostics
}
