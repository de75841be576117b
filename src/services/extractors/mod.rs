//! 题目提取器
//!
//! 两种标记方言各有一个提取器，输出相同的 `RawQuestion` 列表；
//! 编号、科目映射和判分在这里统一完成

pub mod assessment_table;
pub mod view_cand_response;

use crate::infrastructure::SheetDocument;
use crate::models::{QuestionResult, QuestionStatus, RawQuestion, SheetFormat};
use crate::services::image_resolver::{bilingual_variants, BaseUrl};
use crate::services::section_mapper::{SectionMapper, SectionRule};

/// 题目提取策略，由格式识别结果选定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionExtractor {
    AssessmentTable,
    ViewCandidateResponse,
}

impl From<SheetFormat> for QuestionExtractor {
    fn from(format: SheetFormat) -> Self {
        match format {
            SheetFormat::AssessmentTable => QuestionExtractor::AssessmentTable,
            SheetFormat::ViewCandidateResponse => QuestionExtractor::ViewCandidateResponse,
        }
    }
}

impl QuestionExtractor {
    /// 按源文档顺序提取原始题目，附带顺序题号
    pub fn extract_raw(&self, document: &SheetDocument, base: &BaseUrl) -> Vec<(u32, RawQuestion)> {
        match self {
            QuestionExtractor::AssessmentTable => assessment_table::extract(document, base),
            QuestionExtractor::ViewCandidateResponse => view_cand_response::extract(document, base),
        }
    }

    /// 提取题目并完成科目映射与判分
    ///
    /// 顺序题号从 1 开始严格递增，与源文档中打印的科目内题号无关
    pub fn extract(
        &self,
        document: &SheetDocument,
        base: &BaseUrl,
        mapper: &SectionMapper,
    ) -> Vec<QuestionResult> {
        self.extract_raw(document, base)
            .into_iter()
            .map(|(sequential_number, raw)| {
                let rule = mapper.resolve(sequential_number);
                grade(raw, sequential_number, &rule)
            })
            .collect()
    }
}

/// 由原始题目和科目规则生成最终结果
pub fn grade(raw: RawQuestion, sequential_number: u32, rule: &SectionRule) -> QuestionResult {
    let status = QuestionStatus::derive(raw.chosen_option, raw.correct_option);
    let bilingual = raw
        .image_url
        .as_deref()
        .map(bilingual_variants)
        .unwrap_or_default();

    QuestionResult {
        sequential_number,
        section_local_number: raw.section_local_number,
        part: rule.part.clone(),
        subject: rule.subject.clone(),
        status,
        status_label: raw.status_label,
        chosen_option: raw.chosen_option,
        correct_option: raw.correct_option,
        chosen_inferred: raw.chosen_inferred,
        marks_awarded: status.marks(rule.correct_marks, rule.negative_marks),
        question_text: raw.question_text,
        image_url: raw.image_url,
        bilingual,
        options: raw.options,
    }
}
