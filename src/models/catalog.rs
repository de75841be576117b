//! 考试目录
//!
//! 内置的考试 → 科目布局静态表，以及可由 TOML 扩展的 `ExamCatalog`

use super::exam::{ExamCategory, ExamConfig, ExamSectionRange, SubjectConfig};

/// 考试类别列表
pub const EXAM_CATEGORIES: &[ExamCategory] = &[
    ExamCategory { id: "SSC", label: "SSC Exams" },
    ExamCategory { id: "RAILWAY", label: "Railway Exams" },
    ExamCategory { id: "IB", label: "Intelligence Bureau" },
    ExamCategory { id: "BANK", label: "Bank Exams" },
    ExamCategory { id: "POLICE", label: "Police Exams" },
];

/// 未指定考试时的默认考试
pub const DEFAULT_EXAM_ID: &str = "SSC_CGL_MAINS";

/// RRB 答题卡自动识别时使用的考试
pub const RRB_FALLBACK_EXAM_ID: &str = "RRB_NTPC_CBT1";

struct BuiltinExam {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    total_questions: u32,
    max_marks: f64,
    subjects: &'static [BuiltinSubject],
}

/// (名称, 部分, 题目数, 满分, 每题得分, 每题扣分, 是否资格科目)
struct BuiltinSubject(&'static str, &'static str, u32, f64, f64, f64, bool);

const BUILTIN_EXAMS: &[BuiltinExam] = &[
    // SSC
    BuiltinExam {
        id: "SSC_CGL_PRE", name: "SSC CGL Tier-I", category: "SSC", total_questions: 100, max_marks: 200.0,
        subjects: &[
            BuiltinSubject("General Intelligence & Reasoning", "A", 25, 50.0, 2.0, 0.5, false),
            BuiltinSubject("General Awareness", "B", 25, 50.0, 2.0, 0.5, false),
            BuiltinSubject("Quantitative Aptitude", "C", 25, 50.0, 2.0, 0.5, false),
            BuiltinSubject("English Comprehension", "D", 25, 50.0, 2.0, 0.5, false),
        ],
    },
    BuiltinExam {
        id: "SSC_CGL_MAINS", name: "SSC CGL Tier-II", category: "SSC", total_questions: 150, max_marks: 390.0,
        subjects: &[
            BuiltinSubject("Mathematical Abilities", "A", 30, 90.0, 3.0, 1.0, false),
            BuiltinSubject("Reasoning & General Intelligence", "B", 30, 90.0, 3.0, 1.0, false),
            BuiltinSubject("English Language & Comprehension", "C", 45, 135.0, 3.0, 1.0, false),
            BuiltinSubject("General Awareness", "D", 25, 75.0, 3.0, 0.5, false),
            BuiltinSubject("Computer Knowledge", "E", 20, 60.0, 3.0, 0.5, true),
        ],
    },
    BuiltinExam {
        id: "SSC_CHSL_PRE", name: "SSC CHSL Tier-I", category: "SSC", total_questions: 100, max_marks: 200.0,
        subjects: &[
            BuiltinSubject("General Intelligence", "A", 25, 50.0, 2.0, 0.5, false),
            BuiltinSubject("General Awareness", "B", 25, 50.0, 2.0, 0.5, false),
            BuiltinSubject("Quantitative Aptitude", "C", 25, 50.0, 2.0, 0.5, false),
            BuiltinSubject("English Language", "D", 25, 50.0, 2.0, 0.5, false),
        ],
    },
    BuiltinExam {
        id: "SSC_CHSL_MAINS", name: "SSC CHSL Tier-II", category: "SSC", total_questions: 135, max_marks: 405.0,
        subjects: &[
            BuiltinSubject("Mathematical Abilities", "A", 30, 90.0, 3.0, 1.0, false),
            BuiltinSubject("Reasoning & General Intelligence", "B", 30, 90.0, 3.0, 1.0, false),
            BuiltinSubject("English Language & Comprehension", "C", 45, 135.0, 3.0, 1.0, false),
            BuiltinSubject("General Awareness", "D", 30, 90.0, 3.0, 1.0, false),
        ],
    },
    BuiltinExam {
        id: "SSC_CPO_PRE", name: "SSC CPO Paper-I", category: "SSC", total_questions: 200, max_marks: 200.0,
        subjects: &[
            BuiltinSubject("General Intelligence & Reasoning", "A", 50, 50.0, 1.0, 0.25, false),
            BuiltinSubject("General Knowledge & Awareness", "B", 50, 50.0, 1.0, 0.25, false),
            BuiltinSubject("Quantitative Aptitude", "C", 50, 50.0, 1.0, 0.25, false),
            BuiltinSubject("English Comprehension", "D", 50, 50.0, 1.0, 0.25, false),
        ],
    },
    BuiltinExam {
        id: "SSC_CPO_MAINS", name: "SSC CPO Paper-II", category: "SSC", total_questions: 200, max_marks: 200.0,
        subjects: &[
            BuiltinSubject("English Language & Comprehension", "A", 200, 200.0, 1.0, 0.25, false),
        ],
    },
    BuiltinExam {
        id: "SSC_MTS", name: "SSC MTS", category: "SSC", total_questions: 90, max_marks: 90.0,
        subjects: &[
            BuiltinSubject("Numerical & Mathematical Ability", "A", 20, 20.0, 1.0, 0.25, false),
            BuiltinSubject("Reasoning Ability & Problem Solving", "B", 20, 20.0, 1.0, 0.25, false),
            BuiltinSubject("General Awareness", "C", 25, 25.0, 1.0, 0.25, false),
            BuiltinSubject("English Language & Comprehension", "D", 25, 25.0, 1.0, 0.25, false),
        ],
    },
    BuiltinExam {
        id: "SSC_GD_CONSTABLE", name: "SSC GD Constable", category: "SSC", total_questions: 80, max_marks: 160.0,
        subjects: &[
            BuiltinSubject("General Intelligence & Reasoning", "A", 20, 40.0, 2.0, 0.5, false),
            BuiltinSubject("General Knowledge & Awareness", "B", 20, 40.0, 2.0, 0.5, false),
            BuiltinSubject("Elementary Mathematics", "C", 20, 40.0, 2.0, 0.5, false),
            BuiltinSubject("English/Hindi", "D", 20, 40.0, 2.0, 0.5, false),
        ],
    },
    BuiltinExam {
        id: "SSC_STENO", name: "SSC Stenographer", category: "SSC", total_questions: 200, max_marks: 200.0,
        subjects: &[
            BuiltinSubject("General Intelligence & Reasoning", "A", 50, 50.0, 1.0, 0.25, false),
            BuiltinSubject("General Awareness", "B", 50, 50.0, 1.0, 0.25, false),
            BuiltinSubject("English Language & Comprehension", "C", 100, 100.0, 1.0, 0.25, false),
        ],
    },
    // Railway
    BuiltinExam {
        id: "RRB_NTPC_CBT1", name: "RRB NTPC CBT-1", category: "RAILWAY", total_questions: 100, max_marks: 100.0,
        subjects: &[
            BuiltinSubject("Mathematics", "A", 30, 30.0, 1.0, 0.333, false),
            BuiltinSubject("General Intelligence & Reasoning", "B", 30, 30.0, 1.0, 0.333, false),
            BuiltinSubject("General Awareness", "C", 40, 40.0, 1.0, 0.333, false),
        ],
    },
    BuiltinExam {
        id: "RRB_NTPC_CBT2", name: "RRB NTPC CBT-2", category: "RAILWAY", total_questions: 120, max_marks: 120.0,
        subjects: &[
            BuiltinSubject("Mathematics", "A", 35, 35.0, 1.0, 0.333, false),
            BuiltinSubject("General Intelligence & Reasoning", "B", 35, 35.0, 1.0, 0.333, false),
            BuiltinSubject("General Awareness", "C", 50, 50.0, 1.0, 0.333, false),
        ],
    },
    BuiltinExam {
        id: "RRB_GROUP_D", name: "RRB Group D", category: "RAILWAY", total_questions: 100, max_marks: 100.0,
        subjects: &[
            BuiltinSubject("Mathematics", "A", 25, 25.0, 1.0, 0.333, false),
            BuiltinSubject("General Intelligence & Reasoning", "B", 30, 30.0, 1.0, 0.333, false),
            BuiltinSubject("General Science", "C", 25, 25.0, 1.0, 0.333, false),
            BuiltinSubject("General Awareness & Current Affairs", "D", 20, 20.0, 1.0, 0.333, false),
        ],
    },
    BuiltinExam {
        id: "RRB_JE_CBT1", name: "RRB JE CBT-1", category: "RAILWAY", total_questions: 100, max_marks: 100.0,
        subjects: &[
            BuiltinSubject("Mathematics", "A", 30, 30.0, 1.0, 0.333, false),
            BuiltinSubject("General Intelligence & Reasoning", "B", 25, 25.0, 1.0, 0.333, false),
            BuiltinSubject("General Awareness", "C", 15, 15.0, 1.0, 0.333, false),
            BuiltinSubject("General Science", "D", 30, 30.0, 1.0, 0.333, false),
        ],
    },
    BuiltinExam {
        id: "RRB_ALP_CBT1", name: "RRB ALP CBT-1", category: "RAILWAY", total_questions: 75, max_marks: 75.0,
        subjects: &[
            BuiltinSubject("Mathematics", "A", 20, 20.0, 1.0, 0.333, false),
            BuiltinSubject("General Intelligence & Reasoning", "B", 25, 25.0, 1.0, 0.333, false),
            BuiltinSubject("General Science", "C", 20, 20.0, 1.0, 0.333, false),
            BuiltinSubject("General Awareness", "D", 10, 10.0, 1.0, 0.333, false),
        ],
    },
    // IB
    BuiltinExam {
        id: "IB_ACIO", name: "IB ACIO Tier-I", category: "IB", total_questions: 100, max_marks: 100.0,
        subjects: &[
            BuiltinSubject("General Awareness", "A", 25, 25.0, 1.0, 0.25, false),
            BuiltinSubject("Quantitative Aptitude", "B", 25, 25.0, 1.0, 0.25, false),
            BuiltinSubject("Logical/Analytical Ability", "C", 25, 25.0, 1.0, 0.25, false),
            BuiltinSubject("English Language", "D", 25, 25.0, 1.0, 0.25, false),
        ],
    },
    BuiltinExam {
        id: "IB_SA", name: "IB Security Assistant", category: "IB", total_questions: 100, max_marks: 100.0,
        subjects: &[
            BuiltinSubject("General Awareness", "A", 25, 25.0, 1.0, 0.25, false),
            BuiltinSubject("Quantitative Aptitude", "B", 25, 25.0, 1.0, 0.25, false),
            BuiltinSubject("Logical/Analytical Ability", "C", 25, 25.0, 1.0, 0.25, false),
            BuiltinSubject("English Language", "D", 25, 25.0, 1.0, 0.25, false),
        ],
    },
    // Bank
    BuiltinExam {
        id: "IBPS_PO_PRE", name: "IBPS PO Prelims", category: "BANK", total_questions: 100, max_marks: 100.0,
        subjects: &[
            BuiltinSubject("English Language", "A", 30, 30.0, 1.0, 0.25, false),
            BuiltinSubject("Quantitative Aptitude", "B", 35, 35.0, 1.0, 0.25, false),
            BuiltinSubject("Reasoning Ability", "C", 35, 35.0, 1.0, 0.25, false),
        ],
    },
    BuiltinExam {
        id: "IBPS_PO_MAINS", name: "IBPS PO Mains", category: "BANK", total_questions: 155, max_marks: 200.0,
        subjects: &[
            BuiltinSubject("Reasoning & Computer Aptitude", "A", 45, 60.0, 1.33, 0.25, false),
            BuiltinSubject("English Language", "B", 35, 40.0, 1.14, 0.25, false),
            BuiltinSubject("Data Analysis & Interpretation", "C", 35, 60.0, 1.71, 0.25, false),
            BuiltinSubject("General/Economy/Banking Awareness", "D", 40, 40.0, 1.0, 0.25, false),
        ],
    },
    BuiltinExam {
        id: "IBPS_CLERK_PRE", name: "IBPS Clerk Prelims", category: "BANK", total_questions: 100, max_marks: 100.0,
        subjects: &[
            BuiltinSubject("English Language", "A", 30, 30.0, 1.0, 0.25, false),
            BuiltinSubject("Numerical Ability", "B", 35, 35.0, 1.0, 0.25, false),
            BuiltinSubject("Reasoning Ability", "C", 35, 35.0, 1.0, 0.25, false),
        ],
    },
    BuiltinExam {
        id: "IBPS_CLERK_MAINS", name: "IBPS Clerk Mains", category: "BANK", total_questions: 190, max_marks: 200.0,
        subjects: &[
            BuiltinSubject("General/Financial Awareness", "A", 50, 50.0, 1.0, 0.25, false),
            BuiltinSubject("General English", "B", 40, 40.0, 1.0, 0.25, false),
            BuiltinSubject("Reasoning Ability & Computer Aptitude", "C", 50, 60.0, 1.2, 0.25, false),
            BuiltinSubject("Quantitative Aptitude", "D", 50, 50.0, 1.0, 0.25, false),
        ],
    },
    BuiltinExam {
        id: "SBI_PO_PRE", name: "SBI PO Prelims", category: "BANK", total_questions: 100, max_marks: 100.0,
        subjects: &[
            BuiltinSubject("English Language", "A", 30, 30.0, 1.0, 0.25, false),
            BuiltinSubject("Quantitative Aptitude", "B", 35, 35.0, 1.0, 0.25, false),
            BuiltinSubject("Reasoning Ability", "C", 35, 35.0, 1.0, 0.25, false),
        ],
    },
    BuiltinExam {
        id: "SBI_CLERK_PRE", name: "SBI Clerk Prelims", category: "BANK", total_questions: 100, max_marks: 100.0,
        subjects: &[
            BuiltinSubject("English Language", "A", 30, 30.0, 1.0, 0.25, false),
            BuiltinSubject("Numerical Ability", "B", 35, 35.0, 1.0, 0.25, false),
            BuiltinSubject("Reasoning Ability", "C", 35, 35.0, 1.0, 0.25, false),
        ],
    },
    // Police
    BuiltinExam {
        id: "DELHI_POLICE_CONSTABLE", name: "Delhi Police Constable", category: "POLICE", total_questions: 100, max_marks: 100.0,
        subjects: &[
            BuiltinSubject("General Knowledge/Current Affairs", "A", 25, 25.0, 1.0, 0.25, false),
            BuiltinSubject("Reasoning", "B", 25, 25.0, 1.0, 0.25, false),
            BuiltinSubject("Numerical Ability", "C", 25, 25.0, 1.0, 0.25, false),
            BuiltinSubject("Computer Awareness", "D", 25, 25.0, 1.0, 0.25, false),
        ],
    },
    BuiltinExam {
        id: "DELHI_POLICE_HEAD_CONSTABLE", name: "Delhi Police Head Constable", category: "POLICE", total_questions: 100, max_marks: 100.0,
        subjects: &[
            BuiltinSubject("General Knowledge/Current Affairs", "A", 25, 25.0, 1.0, 0.25, false),
            BuiltinSubject("Reasoning/Quantitative Aptitude", "B", 25, 25.0, 1.0, 0.25, false),
            BuiltinSubject("English Language", "C", 25, 25.0, 1.0, 0.25, false),
            BuiltinSubject("Computer Fundamentals", "D", 25, 25.0, 1.0, 0.25, false),
        ],
    },
];

impl BuiltinExam {
    fn to_config(&self) -> ExamConfig {
        ExamConfig {
            id: self.id.to_string(),
            name: self.name.to_string(),
            category: self.category.to_string(),
            total_questions: self.total_questions,
            max_marks: self.max_marks,
            subjects: self
                .subjects
                .iter()
                .map(|s| SubjectConfig {
                    name: s.0.to_string(),
                    part: s.1.to_string(),
                    total_questions: s.2,
                    max_marks: s.3,
                    correct_marks: s.4,
                    negative_marks: s.5,
                    is_qualifying: s.6,
                })
                .collect(),
        }
    }
}

/// 考试目录（只读查找表）
#[derive(Debug, Clone)]
pub struct ExamCatalog {
    exams: Vec<ExamConfig>,
}

impl Default for ExamCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ExamCatalog {
    /// 只包含内置考试的目录
    pub fn builtin() -> Self {
        Self {
            exams: BUILTIN_EXAMS.iter().map(BuiltinExam::to_config).collect(),
        }
    }

    /// 合并自定义考试，同 ID 的考试覆盖内置配置
    pub fn with_custom(mut self, custom: Vec<ExamConfig>) -> Self {
        for exam in custom {
            match self.exams.iter_mut().find(|e| e.id == exam.id) {
                Some(existing) => *existing = exam,
                None => self.exams.push(exam),
            }
        }
        self
    }

    pub fn get(&self, exam_id: &str) -> Option<&ExamConfig> {
        self.exams.iter().find(|e| e.id == exam_id)
    }

    /// 计算指定考试的题号区间，考试不存在时返回 None
    pub fn resolve_ranges(&self, exam_id: &str) -> Option<Vec<ExamSectionRange>> {
        self.get(exam_id).map(ExamConfig::section_ranges)
    }

    pub fn exams(&self) -> &[ExamConfig] {
        &self.exams
    }

    pub fn exams_by_category<'a>(&'a self, category_id: &'a str) -> impl Iterator<Item = &'a ExamConfig> + 'a {
        self.exams.iter().filter(move |e| e.category == category_id)
    }

    pub fn categories() -> &'static [ExamCategory] {
        EXAM_CATEGORIES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_exam_has_contiguous_ranges() {
        let catalog = ExamCatalog::builtin();
        for exam in catalog.exams() {
            let ranges = catalog.resolve_ranges(&exam.id).expect("内置考试必须存在");
            assert_eq!(ranges[0].start, 1, "{}", exam.id);
            for pair in ranges.windows(2) {
                assert_eq!(pair[1].start, pair[0].end + 1, "{}", exam.id);
            }
            assert_eq!(ranges.last().map(|r| r.end), Some(exam.subject_question_total()));
            assert!(exam.validate().is_ok(), "{}", exam.id);
        }
    }

    #[test]
    fn test_builtin_totals_match_subjects() {
        for exam in ExamCatalog::builtin().exams() {
            assert_eq!(exam.total_questions, exam.subject_question_total(), "{}", exam.id);
        }
    }

    #[test]
    fn test_unknown_exam_has_no_ranges() {
        assert!(ExamCatalog::builtin().resolve_ranges("NOPE").is_none());
    }

    #[test]
    fn test_cgl_mains_has_qualifying_computer_section() {
        let ranges = ExamCatalog::builtin().resolve_ranges("SSC_CGL_MAINS").unwrap_or_default();
        let computer = ranges.iter().find(|r| r.part == "E").expect("E 部分");
        assert!(computer.is_qualifying);
        assert_eq!((computer.start, computer.end), (131, 150));
    }

    #[test]
    fn test_custom_exam_replaces_builtin_with_same_id() {
        let mut custom = ExamCatalog::builtin().get("SSC_MTS").cloned().expect("SSC_MTS");
        custom.name = "MTS (revised)".to_string();
        let catalog = ExamCatalog::builtin().with_custom(vec![custom]);

        assert_eq!(catalog.get("SSC_MTS").map(|e| e.name.as_str()), Some("MTS (revised)"));
        assert_eq!(catalog.exams().len(), ExamCatalog::builtin().exams().len());
    }

    #[test]
    fn test_exams_by_category() {
        let catalog = ExamCatalog::builtin();
        assert_eq!(catalog.exams_by_category("IB").count(), 2);
        assert_eq!(catalog.exams_by_category("POLICE").count(), 2);
        assert_eq!(ExamCatalog::categories().len(), 5);
    }
}
