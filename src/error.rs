use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档解析错误（引擎唯一会向外抛出的错误）
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 网页获取错误
    #[error("获取错误: {0}")]
    Fetch(#[from] FetchError),
    /// 考试目录错误
    #[error("考试目录错误: {0}")]
    Catalog(#[from] CatalogError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 序列化失败
    #[error("JSON序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}

/// 文档解析错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// 输入为空
    #[error("输入的 HTML 为空")]
    EmptyInput,
    /// 输入中找不到任何标签
    #[error("输入内容不是 HTML 标记 (长度: {length})")]
    NotMarkup { length: usize },
}

/// 网页获取错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL 不受支持
    #[error("不支持的 URL: {url} (只支持 digialm 链接或 .html 答题卡链接)")]
    UnsupportedUrl { url: String },
    /// 单条路线请求失败
    #[error("请求失败 ({route}): {reason}")]
    RouteFailed { route: String, reason: String },
    /// 响应内容过短
    #[error("响应内容过短 ({route}): {length} 字节")]
    BodyTooShort { route: String, length: usize },
    /// 所有路线都失败
    #[error("所有获取路线均失败: {url}")]
    AllRoutesFailed { url: String },
    /// 多页文档一页都没有取到
    #[error("未能获取任何分页: {url}")]
    NoParts { url: String },
}

/// 考试目录错误
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 目录文件夹不存在
    #[error("目录文件夹不存在: {path}")]
    DirectoryNotFound { path: String },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 考试配置无效
    #[error("考试 {exam_id} 配置无效: {reason}")]
    InvalidExam { exam_id: String, reason: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 没有指定输入来源
    #[error("必须指定 --file 或 --url 之一")]
    MissingSource,
    /// 批量目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

// ========== 从常见错误类型转换 ==========

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File {
            path: String::new(),
            source: err,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let route = err
            .url()
            .map(|u| u.host_str().unwrap_or_default().to_string())
            .unwrap_or_default();
        FetchError::RouteFailed {
            route,
            reason: err.to_string(),
        }
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
