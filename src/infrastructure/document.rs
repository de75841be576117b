//! 答题卡文档 - 基础设施层
//!
//! 持有解析后的 DOM 树，只暴露"查询节点 / 读属性 / 取文本"三种能力

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

use crate::error::ParseError;

/// 多页文档拼接时使用的分隔标记
pub const PART_SEPARATOR: &str = "<!-- PART_SEPARATOR -->";

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\s*[A-Za-z!][^>]*>").unwrap());

/// 答题卡文档
///
/// 职责：
/// - 持有一份或多份（分页拼接的）HTML 文档
/// - 按文档顺序跨分页查询
/// - 不认识题目、科目
pub struct SheetDocument {
    parts: Vec<Html>,
}

impl SheetDocument {
    /// 解析原始 HTML，按分隔标记拆成多个分页
    ///
    /// 只有空输入或完全不含标签的输入才会失败
    pub fn parse(raw_html: &str) -> Result<Self, ParseError> {
        if raw_html.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }
        if !TAG_PATTERN.is_match(raw_html) {
            return Err(ParseError::NotMarkup {
                length: raw_html.len(),
            });
        }

        let parts: Vec<Html> = raw_html
            .split(PART_SEPARATOR)
            .filter(|part| !part.trim().is_empty())
            .map(Html::parse_document)
            .collect();

        debug!("文档解析完成: {} 个分页, {} 字节", parts.len(), raw_html.len());

        Ok(Self { parts })
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// 按文档顺序查询所有匹配节点（跨分页）
    pub fn query_all(&self, selector: &str) -> Vec<Node<'_>> {
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };
        self.parts
            .iter()
            .flat_map(|part| part.select(&selector).map(Node))
            .collect()
    }
}

/// 文档中的一个元素节点
#[derive(Debug, Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    /// 查询所有匹配的后代节点
    pub fn query_all(&self, selector: &str) -> Vec<Node<'a>> {
        match parse_selector(selector) {
            Some(selector) => self.0.select(&selector).map(Node).collect(),
            None => Vec::new(),
        }
    }

    /// 查询第一个匹配的后代节点
    pub fn query_first(&self, selector: &str) -> Option<Node<'a>> {
        let selector = parse_selector(selector)?;
        self.0.select(&selector).next().map(Node)
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.value().classes().any(|c| c == class)
    }

    /// 节点文本，空白折叠并去除首尾空白
    pub fn text(&self) -> String {
        let raw: String = self.0.text().collect();
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// 直接子级的单元格（td / th），不包含嵌套表格中的单元格
    pub fn cells(&self) -> Vec<Node<'a>> {
        self.0
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|e| matches!(e.value().name(), "td" | "th"))
            .map(Node)
            .collect()
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            debug!("无效的选择器 '{}': {:?}", selector, e);
            None
        }
    }
}
