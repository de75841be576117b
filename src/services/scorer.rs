//! 计分
//!
//! 按科目区间汇总题目结果；资格科目单独统计，不计入总分

use crate::models::{
    ExamSectionRange, QuestionResult, QuestionStatus, ScoreBreakdown, ScoreTotals, SectionResult,
};
use crate::services::section_mapper::{UNKNOWN_PART, UNKNOWN_SUBJECT};

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Default, Clone, Copy)]
struct StatusCounts {
    correct: u32,
    wrong: u32,
    unattempted: u32,
    bonus: u32,
}

impl StatusCounts {
    fn tally<'a>(questions: impl Iterator<Item = &'a QuestionResult>) -> Self {
        questions.fold(Self::default(), |mut counts, q| {
            match q.status {
                QuestionStatus::Correct => counts.correct += 1,
                QuestionStatus::Wrong => counts.wrong += 1,
                QuestionStatus::Unattempted => counts.unattempted += 1,
                QuestionStatus::Bonus => counts.bonus += 1,
            }
            counts
        })
    }

    fn total(&self) -> u32 {
        self.correct + self.wrong + self.unattempted + self.bonus
    }
}

/// 科目得分：(正确 + 作废) × 每题分值 − 错误 × 扣分
pub fn section_score(correct: u32, wrong: u32, bonus: u32, correct_marks: f64, negative_marks: f64) -> f64 {
    round2(
        correct as f64 * correct_marks + bonus as f64 * correct_marks
            - wrong as f64 * negative_marks,
    )
}

fn section_result(range: &ExamSectionRange, counts: StatusCounts) -> SectionResult {
    SectionResult {
        part: range.part.clone(),
        subject: range.subject.clone(),
        total_questions: range.len(),
        correct: counts.correct,
        wrong: counts.wrong,
        skipped: counts.unattempted,
        bonus: counts.bonus,
        marks_per_correct: range.correct_marks,
        negative_per_wrong: range.negative_marks,
        max_marks: range.max_marks,
        score: section_score(
            counts.correct,
            counts.wrong,
            counts.bonus,
            range.correct_marks,
            range.negative_marks,
        ),
        is_qualifying: range.is_qualifying,
    }
}

/// 计分
///
/// 每个区间按顺序题号筛选题目并统计；不属于任何区间的题目归入 unmapped
pub fn score(questions: &[QuestionResult], ranges: &[ExamSectionRange]) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();

    for range in ranges {
        let counts = StatusCounts::tally(
            questions
                .iter()
                .filter(|q| range.contains(q.sequential_number)),
        );
        let result = section_result(range, counts);

        if range.is_qualifying {
            breakdown.qualifying = Some(result);
        } else {
            breakdown.sections.push(result);
        }
    }

    let unmapped = StatusCounts::tally(
        questions
            .iter()
            .filter(|q| !ranges.iter().any(|r| r.contains(q.sequential_number))),
    );
    if unmapped.total() > 0 {
        breakdown.unmapped = Some(SectionResult {
            part: UNKNOWN_PART.to_string(),
            subject: UNKNOWN_SUBJECT.to_string(),
            total_questions: unmapped.total(),
            correct: unmapped.correct,
            wrong: unmapped.wrong,
            skipped: unmapped.unattempted,
            bonus: unmapped.bonus,
            marks_per_correct: 0.0,
            negative_per_wrong: 0.0,
            max_marks: 0.0,
            score: 0.0,
            is_qualifying: false,
        });
    }

    breakdown.totals = totals(&breakdown.sections);
    breakdown
}

fn totals(sections: &[SectionResult]) -> ScoreTotals {
    let mut totals = sections.iter().fold(ScoreTotals::default(), |mut acc, s| {
        acc.total_correct += s.correct;
        acc.total_wrong += s.wrong;
        acc.total_skipped += s.skipped;
        acc.total_bonus += s.bonus;
        acc.total_score += s.score;
        acc.total_max_marks += s.max_marks;
        acc
    });
    totals.total_score = round2(totals.total_score);
    totals.total_max_marks = round2(totals.total_max_marks);
    totals
}
