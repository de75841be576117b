//! ViewCandidateResponse 格式提取器
//!
//! 每道题占一个 `td.rw` 单元格，里面嵌套题目表（`table.questionRowTbl`）
//! 和元数据表（`table.menu-tbl`）；答案通过 `rightAns` / `wrngAns` 类标记

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::infrastructure::{Node, SheetDocument};
use crate::models::{RawOption, RawQuestion};
use crate::services::image_resolver::{resolve_image_url, BaseUrl};

static LOCAL_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Q\.\s*(\d+)").unwrap());

static OPTION_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\.\s*").unwrap());

/// 提取全部题目，附带顺序题号
///
/// 缺少题目表或元数据表的单元格不是题目，不占用题号；
/// 结构完整但没有可识别选项的单元格被跳过，但仍占用题号
pub fn extract(document: &SheetDocument, base: &BaseUrl) -> Vec<(u32, RawQuestion)> {
    let mut sequential_number = 0u32;
    let mut questions = Vec::new();

    for (idx, cell) in document.query_all("td.rw").into_iter().enumerate() {
        let (Some(question_table), Some(menu_table)) = (
            cell.query_first("table.questionRowTbl"),
            cell.query_first("table.menu-tbl"),
        ) else {
            debug!("跳过第 {} 个题目单元格：结构不完整", idx + 1);
            continue;
        };

        sequential_number += 1;
        match read_question(question_table, menu_table, base) {
            Some(question) => questions.push((sequential_number, question)),
            None => debug!("第 {} 题没有可识别的选项，已跳过", sequential_number),
        }
    }

    questions
}

fn read_question(question_table: Node<'_>, menu_table: Node<'_>, base: &BaseUrl) -> Option<RawQuestion> {
    let (status_label, chosen_option) = read_menu(menu_table);
    let options = read_options(question_table, chosen_option, base);
    if options.is_empty() {
        return None;
    }

    let correct_option = options.iter().find(|o| o.is_correct).map(|o| o.option_number);
    let (image_url, question_text) = read_question_body(question_table, base);

    Some(RawQuestion {
        section_local_number: read_local_number(question_table),
        status_label,
        chosen_option,
        correct_option,
        chosen_inferred: false,
        question_text,
        image_url,
        options,
    })
}

fn read_local_number(question_table: Node<'_>) -> u32 {
    question_table
        .query_first(r#"td.bold[valign="top"]"#)
        .and_then(|td| {
            LOCAL_NUMBER
                .captures(&td.text())
                .and_then(|caps| caps[1].parse().ok())
        })
        .unwrap_or(0)
}

/// 题干：第一个左对齐的加粗单元格中的图片和文字
fn read_question_body(question_table: Node<'_>, base: &BaseUrl) -> (Option<String>, Option<String>) {
    let Some(td) = question_table
        .query_all("td.bold")
        .into_iter()
        .find(|td| is_left_aligned(*td))
    else {
        return (None, None);
    };

    let image_url = td
        .query_first("img")
        .and_then(|img| img.attr("src"))
        .and_then(|src| resolve_image_url(src, base));
    let text = td.text();

    (image_url, (!text.is_empty()).then_some(text))
}

fn is_left_aligned(td: Node<'_>) -> bool {
    td.attr("style").is_some_and(|style| {
        style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase()
            .contains("text-align:left")
    })
}

/// 读取元数据表中的状态文字和考生选项
fn read_menu(menu_table: Node<'_>) -> (Option<String>, Option<u32>) {
    let mut status_label = None;
    let mut chosen_option = None;

    for row in menu_table.query_all("tr") {
        let cells = row.cells();
        if cells.len() < 2 {
            continue;
        }
        let label = cells[0].text();
        let value = cells[1].text();

        if label.contains("Status") {
            status_label = Some(value);
        } else if label.contains("Chosen Option") {
            chosen_option = parse_chosen_option(&value);
        }
    }

    (status_label, chosen_option)
}

/// 取开头的数字；0、负数或非数字表示未作答
fn parse_chosen_option(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok().filter(|n: &u32| *n > 0)
}

fn read_options(question_table: Node<'_>, chosen_option: Option<u32>, base: &BaseUrl) -> Vec<RawOption> {
    let mut correct_seen = false;

    question_table
        .query_all("td.rightAns, td.wrngAns")
        .into_iter()
        .filter_map(|td| {
            let text = td.text();
            let caps = OPTION_PREFIX.captures(&text)?;
            let option_number: u32 = caps[1].parse().ok()?;

            // 只认第一个标记为正确的选项
            let is_correct = td.has_class("rightAns") && !correct_seen;
            correct_seen |= is_correct;

            // 带 name 属性的是选项内容图片，其余是对错图标
            let image_url = td
                .query_first("img[name]")
                .and_then(|img| img.attr("src"))
                .and_then(|src| resolve_image_url(src, base));
            let rest = text[caps[0].len()..].trim();

            Some(RawOption {
                option_number,
                image_url,
                text_content: (!rest.is_empty()).then(|| rest.to_string()),
                is_correct,
                is_chosen: chosen_option == Some(option_number),
            })
        })
        .collect()
}
