//! 考生信息提取
//!
//! 扫描所有两列的键值表格，通过标签同义词表识别字段

use phf::phf_map;
use tracing::debug;

use crate::infrastructure::SheetDocument;
use crate::models::CandidateInfo;

/// 考生信息字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateField {
    RegistrationNumber,
    RollNumber,
    CandidateName,
    Community,
    VenueName,
    ExamDate,
    ExamTime,
    Shift,
    Subject,
}

/// 标签同义词表，键为规范化后的标签
static LABEL_SYNONYMS: phf::Map<&'static str, CandidateField> = phf_map! {
    "registration number" => CandidateField::RegistrationNumber,
    "registration no" => CandidateField::RegistrationNumber,
    "reg no" => CandidateField::RegistrationNumber,
    "application number" => CandidateField::RegistrationNumber,
    "application no" => CandidateField::RegistrationNumber,
    "roll number" => CandidateField::RollNumber,
    "roll no" => CandidateField::RollNumber,
    "roll num" => CandidateField::RollNumber,
    "candidate name" => CandidateField::CandidateName,
    "candidate's name" => CandidateField::CandidateName,
    "name of the candidate" => CandidateField::CandidateName,
    "participant name" => CandidateField::CandidateName,
    "name" => CandidateField::CandidateName,
    "community" => CandidateField::Community,
    "category" => CandidateField::Community,
    "venue name" => CandidateField::VenueName,
    "test center name" => CandidateField::VenueName,
    "test centre name" => CandidateField::VenueName,
    "exam centre" => CandidateField::VenueName,
    "exam center" => CandidateField::VenueName,
    "exam date" => CandidateField::ExamDate,
    "test date" => CandidateField::ExamDate,
    "date of exam" => CandidateField::ExamDate,
    "exam time" => CandidateField::ExamTime,
    "test time" => CandidateField::ExamTime,
    "shift" => CandidateField::Shift,
    "exam shift" => CandidateField::Shift,
    "subject" => CandidateField::Subject,
    "exam name" => CandidateField::Subject,
};

/// 标签规范化：去空白、去结尾的冒号/句点、小写、折叠内部空白
fn normalize_label(label: &str) -> String {
    let trimmed = label
        .trim()
        .trim_end_matches(|c: char| c == ':' || c == '.' || c.is_whitespace());
    trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn lookup_field(label: &str) -> Option<CandidateField> {
    LABEL_SYNONYMS.get(normalize_label(label).as_str()).copied()
}

impl CandidateInfo {
    fn set(&mut self, field: CandidateField, value: String) {
        let slot = match field {
            CandidateField::RegistrationNumber => &mut self.registration_number,
            CandidateField::RollNumber => &mut self.roll_number,
            CandidateField::CandidateName => &mut self.candidate_name,
            CandidateField::Community => &mut self.community,
            CandidateField::VenueName => &mut self.venue_name,
            CandidateField::ExamDate => &mut self.exam_date,
            CandidateField::ExamTime => &mut self.exam_time,
            CandidateField::Shift => &mut self.shift,
            CandidateField::Subject => &mut self.subject,
        };
        // 同一表格中先出现的值优先
        if slot.is_empty() {
            *slot = value;
        }
    }

    fn is_identified(&self) -> bool {
        !self.roll_number.is_empty() || !self.candidate_name.is_empty()
    }
}

/// 提取考生信息
///
/// 返回第一个至少填充了准考证号或姓名的表格；找不到时返回 None（不是错误）
pub fn extract_candidate_info(document: &SheetDocument) -> Option<CandidateInfo> {
    for (table_index, table) in document.query_all("table").iter().enumerate() {
        let mut info = CandidateInfo::default();

        for row in table.query_all("tr") {
            let cells = row.cells();
            if cells.len() < 2 {
                continue;
            }
            let Some(field) = lookup_field(&cells[0].text()) else {
                continue;
            };
            let value = cells[1].text();
            if !value.is_empty() {
                info.set(field, value);
            }
        }

        if info.is_identified() {
            debug!("在第 {} 个表格中找到考生信息", table_index + 1);
            return Some(info);
        }
    }

    debug!("未找到考生信息表格");
    None
}
