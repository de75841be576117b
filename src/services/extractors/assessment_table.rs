//! AssessmentTable 格式提取器
//!
//! 文档是一串扁平的表格行：以 "Q. No: N" / "Q.N" 开头的行是题目，
//! 紧随其后以 "N." 开头的行是选项，背景色标记答案

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::infrastructure::{Node, SheetDocument};
use crate::models::{RawOption, RawQuestion};
use crate::services::image_resolver::{resolve_image_url, BaseUrl};

/// 每道题最多读取的选项数
pub const MAX_OPTIONS: usize = 5;

static QUESTION_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Q\.\s*(?:No\.?\s*[:.]?\s*)?(\d+)").unwrap());

static OPTION_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\.\s*").unwrap());

static STYLE_BACKGROUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)background(?:-color)?\s*:\s*([#A-Za-z0-9]+)").unwrap()
});

/// 选项行背景色的含义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowMark {
    /// 绿色 / 黄色：标准答案
    Correct,
    /// 红色：考生所选
    Chosen,
    None,
}

impl RowMark {
    fn from_color(color: &str) -> Self {
        match color.trim().to_lowercase().as_str() {
            "green" | "lightgreen" | "yellow" | "#00ff00" | "#008000" | "#90ee90" | "#ffff00" => {
                RowMark::Correct
            }
            "red" | "#ff0000" | "#f00" => RowMark::Chosen,
            _ => RowMark::None,
        }
    }
}

/// 提取全部题目，附带顺序题号
///
/// 没有选项行的题目被跳过，不占用题号
pub fn extract(document: &SheetDocument, base: &BaseUrl) -> Vec<(u32, RawQuestion)> {
    let rows: Vec<Node<'_>> = document
        .query_all("tr")
        .into_iter()
        .filter(|row| is_leaf_row(*row))
        .collect();

    let mut questions = Vec::new();
    let mut idx = 0;

    while idx < rows.len() {
        let Some(local_number) = question_number(rows[idx]) else {
            idx += 1;
            continue;
        };
        let question_row = rows[idx];
        idx += 1;

        let mut option_rows = Vec::new();
        while idx < rows.len() && option_rows.len() < MAX_OPTIONS {
            let Some(option_number) = option_number(rows[idx]) else {
                break;
            };
            option_rows.push((option_number, rows[idx]));
            idx += 1;
        }

        if option_rows.is_empty() {
            debug!("跳过第 {} 题：没有选项行", local_number);
            continue;
        }

        questions.push(build_question(local_number, question_row, &option_rows, base));
    }

    (1u32..).zip(questions).collect()
}

/// 不包含嵌套表格的行
fn is_leaf_row(row: Node<'_>) -> bool {
    row.cells().iter().all(|cell| cell.query_first("tr").is_none())
}

fn first_cell_text(row: Node<'_>) -> Option<String> {
    row.cells().first().map(|cell| cell.text())
}

fn question_number(row: Node<'_>) -> Option<u32> {
    let text = first_cell_text(row)?;
    QUESTION_START.captures(&text)?[1].parse().ok()
}

fn option_number(row: Node<'_>) -> Option<u32> {
    let text = first_cell_text(row)?;
    OPTION_START.captures(&text)?[1].parse().ok()
}

/// 读取行或其单元格上的背景色标记
fn row_mark(row: Node<'_>) -> RowMark {
    std::iter::once(row)
        .chain(row.cells())
        .flat_map(|node| {
            let bgcolor = node.attr("bgcolor").map(str::to_string);
            let style = node
                .attr("style")
                .and_then(|s| STYLE_BACKGROUND.captures(s))
                .map(|caps| caps[1].to_string());
            [bgcolor, style]
        })
        .flatten()
        .map(|color| RowMark::from_color(&color))
        .find(|mark| *mark != RowMark::None)
        .unwrap_or(RowMark::None)
}

fn build_question(
    local_number: u32,
    question_row: Node<'_>,
    option_rows: &[(u32, Node<'_>)],
    base: &BaseUrl,
) -> RawQuestion {
    let mut options: Vec<RawOption> = option_rows
        .iter()
        .map(|(option_number, row)| {
            let mark = row_mark(*row);
            let text = row.text();
            let rest = OPTION_START.replace(&text, "").trim().to_string();
            RawOption {
                option_number: *option_number,
                image_url: first_image(*row, base),
                text_content: (!rest.is_empty()).then_some(rest),
                is_correct: mark == RowMark::Correct,
                is_chosen: mark == RowMark::Chosen,
            }
        })
        .collect();

    // 多个绿色行时只认第一个
    let correct_option = options.iter().find(|o| o.is_correct).map(|o| o.option_number);
    for option in options.iter_mut() {
        option.is_correct = Some(option.option_number) == correct_option;
    }

    let chosen_option = options.iter().find(|o| o.is_chosen).map(|o| o.option_number);
    let (chosen_option, chosen_inferred) =
        infer_chosen_from_correct(chosen_option, correct_option);
    if chosen_inferred {
        for option in options.iter_mut() {
            option.is_chosen = Some(option.option_number) == chosen_option;
        }
    }

    let body: Vec<String> = question_row
        .cells()
        .iter()
        .skip(1)
        .map(|cell| cell.text())
        .filter(|t| !t.is_empty())
        .collect();

    RawQuestion {
        section_local_number: local_number,
        status_label: None,
        chosen_option,
        correct_option,
        chosen_inferred,
        question_text: (!body.is_empty()).then(|| body.join(" ")),
        image_url: first_image(question_row, base),
        options,
    }
}

/// 推断规则：没有红色行但存在标准答案时，视为考生选择了标准答案
///
/// 这是对渲染方式的猜测（只高亮正确选项而不单独标记所选项），
/// 尚未在所有此类文档上得到验证
fn infer_chosen_from_correct(
    chosen_option: Option<u32>,
    correct_option: Option<u32>,
) -> (Option<u32>, bool) {
    match (chosen_option, correct_option) {
        (None, Some(correct)) => (Some(correct), true),
        (chosen, _) => (chosen, false),
    }
}

fn first_image(row: Node<'_>, base: &BaseUrl) -> Option<String> {
    row.query_all("img")
        .into_iter()
        .filter_map(|img| img.attr("src"))
        .find_map(|src| resolve_image_url(src, base))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str) -> Vec<RawQuestion> {
        let doc = SheetDocument::parse(html).unwrap();
        extract(&doc, &BaseUrl::detect(html, None))
            .into_iter()
            .map(|(_, q)| q)
            .collect()
    }

    #[test]
    fn test_red_and_green_rows_give_wrong_answer() {
        let html = r#"<table>
            <tr><td>Q. No: 1</td><td>Capital of India?</td></tr>
            <tr bgcolor="red"><td>1. Mumbai</td></tr>
            <tr bgcolor="green"><td>2. Delhi</td></tr>
            <tr><td>3. Pune</td></tr>
            <tr><td>4. Agra</td></tr>
        </table>"#;
        let questions = run(html);
        assert_eq!(questions.len(), 1);

        let q = &questions[0];
        assert_eq!(q.section_local_number, 1);
        assert_eq!(q.chosen_option, Some(1));
        assert_eq!(q.correct_option, Some(2));
        assert!(!q.chosen_inferred);
        assert_eq!(q.question_text.as_deref(), Some("Capital of India?"));
        assert_eq!(q.options[1].text_content.as_deref(), Some("Delhi"));
    }

    #[test]
    fn test_only_green_row_infers_chosen() {
        let html = r#"<table>
            <tr><td>Q.2</td></tr>
            <tr><td>1. a</td></tr>
            <tr><td style="background-color: yellow">2. b</td></tr>
        </table>"#;
        let q = &run(html)[0];
        assert_eq!(q.correct_option, Some(2));
        assert_eq!(q.chosen_option, Some(2));
        assert!(q.chosen_inferred);
        assert!(q.options[1].is_chosen);
    }

    #[test]
    fn test_no_green_row_is_bonus() {
        let html = r#"<table>
            <tr><td>Q.3</td></tr>
            <tr bgcolor="red"><td>1. a</td></tr>
            <tr><td>2. b</td></tr>
        </table>"#;
        let q = &run(html)[0];
        assert_eq!(q.correct_option, None);
        assert_eq!(q.chosen_option, Some(1));
    }

    #[test]
    fn test_option_consumption_stops_at_cap_and_non_option_row() {
        let html = r#"<table>
            <tr><td>Q.1</td></tr>
            <tr><td>1. a</td></tr><tr><td>2. b</td></tr><tr><td>3. c</td></tr>
            <tr><td>4. d</td></tr><tr><td>5. e</td></tr><tr><td>6. f</td></tr>
            <tr><td>Q.2</td></tr>
            <tr bgcolor="green"><td>1. x</td></tr>
            <tr><td>Remarks</td></tr>
            <tr><td>2. y</td></tr>
        </table>"#;
        let questions = run(html);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].options.len(), MAX_OPTIONS);
        assert_eq!(questions[1].options.len(), 1);
    }

    #[test]
    fn test_question_without_options_is_skipped() {
        let html = r#"<table><tr><td>Q.1</td></tr><tr><td>Q.2</td></tr><tr><td>1. a</td></tr></table>"#;
        let questions = run(html);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].section_local_number, 2);
    }

    #[test]
    fn test_row_mark_colors() {
        assert_eq!(RowMark::from_color("LightGreen"), RowMark::Correct);
        assert_eq!(RowMark::from_color(" RED "), RowMark::Chosen);
        assert_eq!(RowMark::from_color("white"), RowMark::None);
    }
}
