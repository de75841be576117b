//! 答题卡处理上下文
//!
//! 封装"我正在处理哪一张答题卡、按哪场考试计分"这一信息

use std::fmt::Display;

/// 答题卡处理上下文
#[derive(Debug, Clone, Default)]
pub struct SheetCtx {
    /// 批量模式中的序号（仅用于日志显示，从1开始）
    pub sheet_index: usize,

    /// 来源标识：文件名或 URL
    pub label: String,

    /// 指定的考试 ID，None 表示自动识别
    pub exam_id: Option<String>,

    /// 答题卡的原始地址（用于判断图片主机）
    pub source_url: Option<String>,
}

impl SheetCtx {
    /// 创建新的答题卡上下文
    pub fn new(sheet_index: usize, label: impl Into<String>) -> Self {
        Self {
            sheet_index,
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_exam(mut self, exam_id: Option<String>) -> Self {
        self.exam_id = exam_id;
        self
    }

    pub fn with_source_url(mut self, source_url: Option<String>) -> Self {
        self.source_url = source_url;
        self
    }
}

impl Display for SheetCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[答题卡 #{} {}]", self.sheet_index, self.label)
    }
}
