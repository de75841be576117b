//! 业务能力层（Services）
//!
//! 每个模块只描述"我能做什么"，互不调用彼此的内部细节：
//! 格式识别、考生信息、题目提取、科目映射、计分、图片地址、答题卡获取

pub mod candidate_info;
pub mod extractors;
pub mod fetch_service;
pub mod format_detector;
pub mod image_resolver;
pub mod scorer;
pub mod section_mapper;

pub use candidate_info::extract_candidate_info;
pub use extractors::QuestionExtractor;
pub use fetch_service::{FetchOutcome, FetchService};
pub use format_detector::detect_format;
pub use image_resolver::{bilingual_variants, resolve_image_url, BaseUrl};
pub use scorer::score;
pub use section_mapper::{SectionMapper, SectionRule};
