use serde::{Deserialize, Serialize};

use super::exam::ExamSectionRange;
use super::question::QuestionResult;

/// 答题卡标记方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetFormat {
    /// 行流式，背景色标记答案
    AssessmentTable,
    /// 每题一个单元格，CSS 类标记答案
    ViewCandidateResponse,
}

impl std::fmt::Display for SheetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetFormat::AssessmentTable => write!(f, "AssessmentTable"),
            SheetFormat::ViewCandidateResponse => write!(f, "ViewCandidateResponse"),
        }
    }
}

/// 考生信息，任何字段都可能为空
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInfo {
    pub registration_number: String,
    pub roll_number: String,
    pub candidate_name: String,
    pub community: String,
    pub venue_name: String,
    pub exam_date: String,
    pub exam_time: String,
    pub shift: String,
    pub subject: String,
}

/// 一个科目的统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResult {
    pub part: String,
    pub subject: String,
    pub total_questions: u32,
    pub correct: u32,
    pub wrong: u32,
    pub skipped: u32,
    pub bonus: u32,
    pub marks_per_correct: f64,
    pub negative_per_wrong: f64,
    pub max_marks: f64,
    pub score: f64,
    pub is_qualifying: bool,
}

/// 非资格科目的合计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTotals {
    pub total_correct: u32,
    pub total_wrong: u32,
    pub total_skipped: u32,
    pub total_bonus: u32,
    pub total_score: f64,
    pub total_max_marks: f64,
}

/// 计分器输出
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub sections: Vec<SectionResult>,
    pub qualifying: Option<SectionResult>,
    /// 落在所有区间之外的题目
    pub unmapped: Option<SectionResult>,
    pub totals: ScoreTotals,
}

/// 解析过程中吸收掉的异常情况
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// 没有找到考生信息（不影响计分）
    CandidateInfoMissing,
    /// 没有识别出任何题目，很可能是不支持的格式
    NoQuestionsFound,
    /// 指定的考试不在目录中，已回退到默认考试
    #[serde(rename_all = "camelCase")]
    CatalogMiss { requested: String, fallback: String },
    /// 有题目不属于任何科目
    UnmappedQuestions { count: u32 },
    /// 题目数量与考试配置不符
    QuestionCountMismatch { expected: u32, found: u32 },
    /// 考生选项是推断得出的
    ChosenOptionInferred { count: u32 },
}

impl Diagnostic {
    /// 是否需要醒目提示
    pub fn is_prominent(&self) -> bool {
        matches!(
            self,
            Diagnostic::NoQuestionsFound | Diagnostic::UnmappedQuestions { .. }
        )
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::CandidateInfoMissing => write!(f, "未找到考生信息"),
            Diagnostic::NoQuestionsFound => {
                write!(f, "未找到任何题目，答题卡格式可能不受支持")
            }
            Diagnostic::CatalogMiss { requested, fallback } => {
                write!(f, "未知考试 {}，已使用默认考试 {}", requested, fallback)
            }
            Diagnostic::UnmappedQuestions { count } => {
                write!(f, "{} 道题目不属于任何科目", count)
            }
            Diagnostic::QuestionCountMismatch { expected, found } => {
                write!(f, "考试应有 {} 道题目，实际解析到 {} 道", expected, found)
            }
            Diagnostic::ChosenOptionInferred { count } => {
                write!(f, "{} 道题目的考生选项由正确答案推断", count)
            }
        }
    }
}

/// 评分所用的考试
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSummary {
    pub id: String,
    pub name: String,
    pub ranges: Vec<ExamSectionRange>,
}

/// 最终成绩单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardData {
    pub candidate_info: Option<CandidateInfo>,
    pub exam: ExamSummary,
    pub format: SheetFormat,
    pub base_url: String,
    pub sections: Vec<SectionResult>,
    pub qualifying_section: Option<SectionResult>,
    pub unmapped_section: Option<SectionResult>,
    pub questions: Vec<QuestionResult>,
    #[serde(flatten)]
    pub totals: ScoreTotals,
    pub diagnostics: Vec<Diagnostic>,
}

impl ScorecardData {
    /// 组装成绩单
    pub fn assemble(
        candidate_info: Option<CandidateInfo>,
        exam: ExamSummary,
        format: SheetFormat,
        base_url: String,
        questions: Vec<QuestionResult>,
        breakdown: ScoreBreakdown,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let ScoreBreakdown {
            sections,
            qualifying,
            unmapped,
            totals,
        } = breakdown;

        Self {
            candidate_info,
            exam,
            format,
            base_url,
            sections,
            qualifying_section: qualifying,
            unmapped_section: unmapped,
            questions,
            totals,
            diagnostics,
        }
    }

    /// 某个部分（如 "A"）的全部题目
    pub fn questions_for_section(&self, part: &str) -> Vec<&QuestionResult> {
        let Some(range) = self.exam.ranges.iter().find(|r| r.part == part) else {
            return Vec::new();
        };
        self.questions
            .iter()
            .filter(|q| range.contains(q.sequential_number))
            .collect()
    }

    pub fn has_diagnostic(&self, diagnostic: &Diagnostic) -> bool {
        self.diagnostics.contains(diagnostic)
    }
}
