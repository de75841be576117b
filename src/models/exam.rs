use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// 单个科目（部分）的配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SubjectConfig {
    pub name: String,
    pub part: String,
    pub total_questions: u32,
    pub max_marks: f64,
    pub correct_marks: f64,
    pub negative_marks: f64,
    #[serde(default)]
    pub is_qualifying: bool,
}

/// 一场考试的完整配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ExamConfig {
    pub id: String,
    pub name: String,
    pub category: String,
    pub total_questions: u32,
    pub max_marks: f64,
    pub subjects: Vec<SubjectConfig>,
}

/// 考试类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExamCategory {
    pub id: &'static str,
    pub label: &'static str,
}

/// 由科目列表推导出的绝对题号区间（闭区间，从 1 开始）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSectionRange {
    pub part: String,
    pub subject: String,
    pub start: u32,
    pub end: u32,
    pub correct_marks: f64,
    pub negative_marks: f64,
    pub max_marks: f64,
    pub is_qualifying: bool,
}

impl ExamSectionRange {
    /// 区间内的题目数量
    pub fn len(&self) -> u32 {
        self.end + 1 - self.start
    }

    pub fn contains(&self, sequential_number: u32) -> bool {
        (self.start..=self.end).contains(&sequential_number)
    }
}

/// 单场考试允许的题目总数上限
pub const MAX_EXAM_QUESTIONS: u32 = 1000;

impl ExamConfig {
    /// 按科目顺序累加题目数，得到每个科目的绝对题号区间
    ///
    /// 题号超出 u32 的科目及其后续科目不再生成区间
    pub fn section_ranges(&self) -> Vec<ExamSectionRange> {
        let mut ranges = Vec::new();
        let mut cursor = 1u32;
        for s in self.subjects.iter().filter(|s| s.total_questions > 0) {
            let Some(end) = cursor.checked_add(s.total_questions - 1) else {
                break;
            };
            ranges.push(ExamSectionRange {
                part: s.part.clone(),
                subject: s.name.clone(),
                start: cursor,
                end,
                correct_marks: s.correct_marks,
                negative_marks: s.negative_marks,
                max_marks: s.max_marks,
                is_qualifying: s.is_qualifying,
            });
            match end.checked_add(1) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        ranges
    }

    /// 各科目题目数之和，溢出时返回 None
    pub fn checked_subject_total(&self) -> Option<u32> {
        self.subjects
            .iter()
            .try_fold(0u32, |acc, s| acc.checked_add(s.total_questions))
    }

    /// 各科目题目数之和（溢出时饱和到 u32::MAX）
    pub fn subject_question_total(&self) -> u32 {
        self.checked_subject_total().unwrap_or(u32::MAX)
    }

    /// 校验配置是否可用（自定义目录加载时使用）
    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidExam {
            exam_id: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("考试 ID 为空".to_string()));
        }
        if self.subjects.is_empty() {
            return Err(invalid("没有科目".to_string()));
        }
        for subject in &self.subjects {
            if subject.part.trim().is_empty() {
                return Err(invalid(format!("科目 {} 缺少部分代码", subject.name)));
            }
            if subject.total_questions == 0 {
                return Err(invalid(format!("科目 {} 题目数为 0", subject.name)));
            }
            if subject.correct_marks < 0.0 || subject.negative_marks < 0.0 {
                return Err(invalid(format!("科目 {} 分值不能为负数", subject.name)));
            }
        }
        if !self
            .checked_subject_total()
            .is_some_and(|total| total <= MAX_EXAM_QUESTIONS)
        {
            return Err(invalid(format!("科目题目总数超过上限 {}", MAX_EXAM_QUESTIONS)));
        }
        let qualifying = self.subjects.iter().filter(|s| s.is_qualifying).count();
        if qualifying > 1 {
            return Err(invalid(format!("最多只能有一个资格科目，实际 {} 个", qualifying)));
        }
        Ok(())
    }
}
