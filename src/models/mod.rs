pub mod catalog;
pub mod exam;
pub mod loaders;
pub mod question;
pub mod scorecard;

pub use catalog::{ExamCatalog, DEFAULT_EXAM_ID, RRB_FALLBACK_EXAM_ID};
pub use exam::{ExamCategory, ExamConfig, ExamSectionRange, SubjectConfig};
pub use loaders::{load_catalog_folder, load_catalog_file};
pub use question::{BilingualVariants, QuestionResult, QuestionStatus, RawOption, RawQuestion};
pub use scorecard::{
    CandidateInfo, Diagnostic, ExamSummary, ScoreBreakdown, ScoreTotals, ScorecardData,
    SectionResult, SheetFormat,
};
