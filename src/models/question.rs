use serde::{Deserialize, Serialize};

/// 题目判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Correct,
    Wrong,
    Unattempted,
    /// 作废题，所有考生得满分
    Bonus,
}

impl QuestionStatus {
    /// 由标准答案和考生选项推导状态
    pub fn derive(chosen_option: Option<u32>, correct_option: Option<u32>) -> Self {
        match (correct_option, chosen_option) {
            (None, _) => QuestionStatus::Bonus,
            (Some(correct), Some(chosen)) if chosen == correct => QuestionStatus::Correct,
            (Some(_), Some(_)) => QuestionStatus::Wrong,
            (Some(_), None) => QuestionStatus::Unattempted,
        }
    }

    /// 该状态对应的得分（扣分以正数给出）
    pub fn marks(self, correct_marks: f64, negative_marks: f64) -> f64 {
        match self {
            QuestionStatus::Correct | QuestionStatus::Bonus => correct_marks,
            QuestionStatus::Wrong => -negative_marks,
            QuestionStatus::Unattempted => 0.0,
        }
    }
}

impl std::fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            QuestionStatus::Correct => "correct",
            QuestionStatus::Wrong => "wrong",
            QuestionStatus::Unattempted => "unattempted",
            QuestionStatus::Bonus => "bonus",
        };
        write!(f, "{}", label)
    }
}

/// 题目中的一个选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOption {
    pub option_number: u32,
    pub image_url: Option<String>,
    pub text_content: Option<String>,
    /// 标准答案
    pub is_correct: bool,
    /// 考生所选
    pub is_chosen: bool,
}

/// 同一题目图片的中英文版本
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BilingualVariants {
    pub hindi_url: Option<String>,
    pub english_url: Option<String>,
}

/// 提取器输出的原始题目，尚未编号、未关联科目
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQuestion {
    pub section_local_number: u32,
    pub status_label: Option<String>,
    pub chosen_option: Option<u32>,
    pub correct_option: Option<u32>,
    /// 考生选项是否由"无红色标记则视为选择了正确答案"的推断得出
    pub chosen_inferred: bool,
    pub question_text: Option<String>,
    pub image_url: Option<String>,
    pub options: Vec<RawOption>,
}

/// 一道题目的最终结果，创建后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    /// 全文档内的顺序编号（从 1 开始）
    pub sequential_number: u32,
    /// 源文档中打印的科目内题号，缺失时为 0
    pub section_local_number: u32,
    pub part: String,
    pub subject: String,
    pub status: QuestionStatus,
    /// 源文档中的状态文字（如 "Answered"）
    pub status_label: Option<String>,
    pub chosen_option: Option<u32>,
    pub correct_option: Option<u32>,
    pub chosen_inferred: bool,
    pub marks_awarded: f64,
    pub question_text: Option<String>,
    pub image_url: Option<String>,
    pub bilingual: BilingualVariants,
    pub options: Vec<RawOption>,
}
