//! 科目映射
//!
//! 按顺序题号查找所属科目及其计分规则

use tracing::warn;

use crate::models::ExamSectionRange;

pub const UNKNOWN_PART: &str = "?";
pub const UNKNOWN_SUBJECT: &str = "Unknown";

/// 一道题目适用的科目和计分规则
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRule {
    pub part: String,
    pub subject: String,
    pub correct_marks: f64,
    pub negative_marks: f64,
    /// 是否落在某个已知区间内
    pub mapped: bool,
}

impl SectionRule {
    /// 不属于任何科目时的规则：不计分
    pub fn unknown() -> Self {
        Self {
            part: UNKNOWN_PART.to_string(),
            subject: UNKNOWN_SUBJECT.to_string(),
            correct_marks: 0.0,
            negative_marks: 0.0,
            mapped: false,
        }
    }
}

impl From<&ExamSectionRange> for SectionRule {
    fn from(range: &ExamSectionRange) -> Self {
        Self {
            part: range.part.clone(),
            subject: range.subject.clone(),
            correct_marks: range.correct_marks,
            negative_marks: range.negative_marks,
            mapped: true,
        }
    }
}

/// 科目映射器，持有按起始题号排序的区间
#[derive(Debug, Clone)]
pub struct SectionMapper {
    ranges: Vec<ExamSectionRange>,
}

impl SectionMapper {
    pub fn new(mut ranges: Vec<ExamSectionRange>) -> Self {
        ranges.sort_by_key(|r| r.start);
        Self { ranges }
    }

    pub fn ranges(&self) -> &[ExamSectionRange] {
        &self.ranges
    }

    /// 查找包含该题号的区间
    pub fn find(&self, sequential_number: u32) -> Option<&ExamSectionRange> {
        let idx = self
            .ranges
            .partition_point(|r| r.end < sequential_number);
        self.ranges
            .get(idx)
            .filter(|r| r.contains(sequential_number))
    }

    /// 解析题目的科目；找不到时返回 Unknown 规则并记录警告
    pub fn resolve(&self, sequential_number: u32) -> SectionRule {
        match self.find(sequential_number) {
            Some(range) => SectionRule::from(range),
            None => {
                warn!(
                    "第 {} 题不在任何科目区间内，考试配置与答题卡可能不一致",
                    sequential_number
                );
                SectionRule::unknown()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(part: &str, start: u32, end: u32, cm: f64, nm: f64) -> ExamSectionRange {
        ExamSectionRange {
            part: part.to_string(),
            subject: format!("Subject {}", part),
            start,
            end,
            correct_marks: cm,
            negative_marks: nm,
            max_marks: (end + 1 - start) as f64 * cm,
            is_qualifying: false,
        }
    }

    fn mapper() -> SectionMapper {
        SectionMapper::new(vec![
            range("B", 31, 60, 3.0, 1.0),
            range("A", 1, 30, 3.0, 1.0),
            range("C", 61, 65, 2.0, 0.5),
        ])
    }

    #[test]
    fn test_resolves_boundaries() {
        let mapper = mapper();
        assert_eq!(mapper.resolve(1).part, "A");
        assert_eq!(mapper.resolve(30).part, "A");
        assert_eq!(mapper.resolve(31).part, "B");
        assert_eq!(mapper.resolve(65).part, "C");
        assert_eq!(mapper.resolve(65).negative_marks, 0.5);
    }

    #[test]
    fn test_out_of_range_is_unknown_with_zero_marks() {
        let rule = mapper().resolve(66);
        assert!(!rule.mapped);
        assert_eq!(rule.part, UNKNOWN_PART);
        assert_eq!(rule.subject, UNKNOWN_SUBJECT);
        assert_eq!((rule.correct_marks, rule.negative_marks), (0.0, 0.0));

        assert!(!mapper().resolve(0).mapped);
    }

    #[test]
    fn test_empty_mapper_maps_nothing() {
        assert!(SectionMapper::new(Vec::new()).find(1).is_none());
    }
}
