use crate::models::catalog::DEFAULT_EXAM_ID;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 未指定或无法识别考试时使用的默认考试
    pub default_exam_id: String,
    /// 自定义考试目录（TOML）所在文件夹
    pub catalog_folder: String,
    /// 批量模式下同时分析的答题卡数量
    pub max_concurrent_sheets: usize,
    /// 单次请求超时（秒）
    pub fetch_timeout_secs: u64,
    /// 浏览器调试端口，未设置时不使用浏览器路线
    pub browser_debug_port: Option<u16>,
    /// 批量模式的 JSON 输出目录
    pub output_dir: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_exam_id: DEFAULT_EXAM_ID.to_string(),
            catalog_folder: "exam_catalog".to_string(),
            max_concurrent_sheets: 8,
            fetch_timeout_secs: 30,
            browser_debug_port: None,
            output_dir: "scorecards".to_string(),
            output_log_file: "scorecard_log.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            default_exam_id: std::env::var("DEFAULT_EXAM_ID").unwrap_or(default.default_exam_id),
            catalog_folder: std::env::var("CATALOG_FOLDER").unwrap_or(default.catalog_folder),
            max_concurrent_sheets: std::env::var("MAX_CONCURRENT_SHEETS").ok().and_then(|v| v.parse().ok()).filter(|n| *n > 0).unwrap_or(default.max_concurrent_sheets),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.fetch_timeout_secs),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).or(default.browser_debug_port),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}
