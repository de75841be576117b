//! 批量答题卡处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责资源管理和并发调度。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：加载内置与自定义考试目录，构建 `ScorecardFlow`
//! 2. **单张分析**：从文件或 URL 读取答题卡并输出成绩单
//! 3. **批量分析**：扫描文件夹中的所有 `.html` 答题卡
//! 4. **并发控制**：使用 Semaphore 限制并发数量，分批处理
//! 5. **全局统计**：汇总所有答题卡的处理结果

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, ConfigError};
use crate::models::{load_catalog_folder, ExamCatalog, ScorecardData};
use crate::orchestrator::sheet_processor;
use crate::services::FetchService;
use crate::utils::logging;
use crate::workflow::{ScorecardFlow, SheetCtx};

/// 应用主结构
pub struct App {
    config: Config,
    flow: Arc<ScorecardFlow>,
}

/// 单张答题卡的输入来源
#[derive(Debug, Clone)]
pub enum SheetInput {
    File(PathBuf),
    Url(String),
}

impl SheetInput {
    /// 由命令行参数构造，两者都缺失时报错
    pub fn from_args(file: Option<PathBuf>, url: Option<String>) -> Result<Self, ConfigError> {
        match (file, url) {
            (Some(path), _) => Ok(SheetInput::File(path)),
            (None, Some(url)) => Ok(SheetInput::Url(url)),
            (None, None) => Err(ConfigError::MissingSource),
        }
    }

    fn label(&self) -> String {
        match self {
            SheetInput::File(path) => path.display().to_string(),
            SheetInput::Url(url) => url.clone(),
        }
    }
}

/// 批量处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    /// 生成了成绩单的答题卡
    pub success: usize,
    /// 能解析但没有识别出题目的答题卡
    pub no_questions: usize,
    /// 读取、解析或写出失败的答题卡
    pub failed: usize,
    pub total: usize,
}

impl BatchStats {
    pub fn all_scored(&self) -> bool {
        self.success == self.total
    }
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let catalog = load_catalog(&config.catalog_folder).await;
        let flow = ScorecardFlow::from_config(Arc::new(catalog), &config);

        Ok(Self {
            config,
            flow: Arc::new(flow),
        })
    }

    pub fn with_flow(config: Config, flow: ScorecardFlow) -> Self {
        Self {
            config,
            flow: Arc::new(flow),
        }
    }

    pub fn flow(&self) -> &ScorecardFlow {
        &self.flow
    }

    /// 分析一张答题卡
    pub async fn analyze(&self, input: SheetInput, exam_id: Option<String>) -> Result<ScorecardData> {
        let ctx = SheetCtx::new(1, input.label()).with_exam(exam_id);

        let (raw_html, ctx) = match input {
            SheetInput::File(path) => (sheet_processor::read_sheet_file(&path).await?, ctx),
            SheetInput::Url(url) => {
                let service = FetchService::from_config(&self.config).map_err(AppError::from)?;
                let html = service.fetch_sheet(&url).await.map_err(AppError::from)?;
                (html, ctx.with_source_url(Some(url)))
            }
        };

        let data = self
            .flow
            .run(&raw_html, &ctx)
            .map_err(AppError::from)
            .with_context(|| format!("{} 解析失败", ctx))?;

        logging::log_scorecard_summary(&data);
        Ok(data)
    }

    /// 分析一张答题卡并输出 JSON（未指定路径时输出到标准输出）
    pub async fn analyze_to(
        &self,
        input: SheetInput,
        exam_id: Option<String>,
        output: Option<&Path>,
    ) -> Result<ScorecardData> {
        let data = self.analyze(input, exam_id).await?;
        match output {
            Some(path) => sheet_processor::write_scorecard(path, &data).await?,
            None => println!("{}", sheet_processor::scorecard_json(&data)?),
        }
        Ok(data)
    }

    /// 批量分析文件夹中的所有答题卡
    pub async fn run_batch(&self, dir: &Path, exam_id: Option<String>) -> Result<BatchStats> {
        logging::init_log_file(&self.config.output_log_file)?;
        logging::log_startup("批量答题卡分析模式", self.config.max_concurrent_sheets);

        let sheets = scan_sheets(dir).await?;
        if sheets.is_empty() {
            warn!("⚠️ 没有找到待分析的 .html 文件，程序结束");
            return Ok(BatchStats::default());
        }

        let output_dir = PathBuf::from(&self.config.output_dir);
        fs::create_dir_all(&output_dir)
            .await
            .with_context(|| format!("无法创建输出目录: {}", output_dir.display()))?;

        logging::log_sheets_loaded(sheets.len(), self.config.max_concurrent_sheets);
        let stats = self.process_all_sheets(sheets, exam_id, &output_dir).await?;

        logging::log_batch_summary(
            stats.success,
            stats.no_questions,
            stats.failed,
            &self.config.output_dir,
            &self.config.output_log_file,
        );
        Ok(stats)
    }

    /// 分批处理所有答题卡
    async fn process_all_sheets(
        &self,
        sheets: Vec<PathBuf>,
        exam_id: Option<String>,
        output_dir: &Path,
    ) -> Result<BatchStats> {
        let batch_size = self.config.max_concurrent_sheets.max(1);
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total = sheets.len();
        let total_batches = total.div_ceil(batch_size);
        let mut stats = BatchStats {
            total,
            ..Default::default()
        };

        for (batch_idx, batch) in sheets.chunks(batch_size).enumerate() {
            let batch_start = batch_idx * batch_size;
            logging::log_batch_start(
                batch_idx + 1,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                total,
            );

            let mut handles = Vec::new();
            for (idx, sheet_path) in batch.iter().enumerate() {
                let sheet_index = batch_start + idx + 1;
                let permit = semaphore.clone().acquire_owned().await?;

                let flow = self.flow.clone();
                let sheet_path = sheet_path.clone();
                let output_dir = output_dir.to_path_buf();
                let label = sheet_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                let ctx = SheetCtx::new(sheet_index, label).with_exam(exam_id.clone());

                let handle = tokio::spawn(async move {
                    let _permit = permit;
                    sheet_processor::process_sheet_file(&flow, &sheet_path, &ctx, &output_dir)
                        .await
                        .map_err(|e| {
                            error!("{} ❌ 处理过程中发生错误: {:#}", ctx, e);
                            e
                        })
                });
                handles.push((sheet_index, batch[idx].clone(), handle));
            }

            let (mut batch_success, mut batch_empty, mut batch_failed) = (0, 0, 0);
            for (sheet_index, sheet_path, handle) in handles {
                let outcome = match handle.await {
                    Ok(Ok(true)) => {
                        batch_success += 1;
                        "成功"
                    }
                    Ok(Ok(false)) => {
                        batch_empty += 1;
                        "未识别出题目"
                    }
                    Ok(Err(_)) => {
                        batch_failed += 1;
                        "失败"
                    }
                    Err(e) => {
                        error!("[答题卡 #{}] 任务执行失败: {}", sheet_index, e);
                        batch_failed += 1;
                        "任务异常"
                    }
                };
                if let Err(e) = logging::append_log_line(
                    &self.config.output_log_file,
                    &format!("#{} {} {}", sheet_index, sheet_path.display(), outcome),
                ) {
                    warn!("写入日志文件失败: {}", e);
                }
            }

            stats.success += batch_success;
            stats.no_questions += batch_empty;
            stats.failed += batch_failed;
            logging::log_batch_complete(
                batch_idx + 1,
                total_batches,
                batch_success,
                batch_empty,
                batch_failed,
            );
        }

        Ok(stats)
    }

    /// 考试目录的文本清单
    pub fn render_exams(&self, category: Option<&str>) -> String {
        let catalog = self.flow.catalog();
        let mut out = String::new();

        for cat in ExamCatalog::categories()
            .iter()
            .filter(|c| category.map_or(true, |wanted| c.id.eq_ignore_ascii_case(wanted)))
        {
            out.push_str(&format!("{} - {}\n", cat.id, cat.label));
            for exam in catalog.exams_by_category(cat.id) {
                out.push_str(&format!(
                    "  {:<22} {} ({} 题, {} 分)\n",
                    exam.id, exam.name, exam.total_questions, exam.max_marks
                ));
                for range in exam.section_ranges() {
                    out.push_str(&format!(
                        "      {} {:<40} Q{}-{}  +{} / -{}{}\n",
                        range.part,
                        range.subject,
                        range.start,
                        range.end,
                        range.correct_marks,
                        range.negative_marks,
                        if range.is_qualifying { "  [资格]" } else { "" }
                    ));
                }
            }
        }

        out
    }
}

/// 加载内置目录，并合并自定义目录（文件夹不存在时只用内置目录）
async fn load_catalog(folder: &str) -> ExamCatalog {
    match load_catalog_folder(folder).await {
        Ok(custom) if !custom.is_empty() => {
            info!("✓ 加载了 {} 场自定义考试", custom.len());
            ExamCatalog::builtin().with_custom(custom)
        }
        Ok(_) => ExamCatalog::builtin(),
        Err(e) => {
            info!("未加载自定义考试目录: {}", e);
            ExamCatalog::builtin()
        }
    }
}

/// 扫描文件夹中的 .html 文件（按文件名排序）
async fn scan_sheets(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AppError::from(ConfigError::DirectoryNotFound {
            path: dir.display().to_string(),
        })
        .into());
    }

    info!("\n📁 正在扫描待分析的答题卡...");
    let mut sheets = Vec::new();
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("无法读取文件夹: {}", dir.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_html = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"));
        if is_html {
            sheets.push(path);
        }
    }
    sheets.sort();
    Ok(sheets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &Path) -> Config {
        Config {
            catalog_folder: dir.join("no_catalog").display().to_string(),
            output_dir: dir.join("out").display().to_string(),
            output_log_file: dir.join("run.txt").display().to_string(),
            max_concurrent_sheets: 2,
            ..Config::default()
        }
    }

    const SHEET: &str = r#"<table><tr><td>Q.1</td></tr><tr bgcolor="green"><td>1. a</td></tr></table>"#;

    #[test]
    fn test_sheet_input_requires_a_source() {
        assert!(matches!(
            SheetInput::from_args(None, None),
            Err(ConfigError::MissingSource)
        ));
        assert!(matches!(
            SheetInput::from_args(None, Some("https://ssc.digialm.com/x".to_string())),
            Ok(SheetInput::Url(_))
        ));
    }

    #[tokio::test]
    async fn test_batch_processes_every_html_file() {
        let dir = tempfile::tempdir().unwrap();
        let sheets = dir.path().join("sheets");
        std::fs::create_dir(&sheets).unwrap();
        for name in ["a.html", "b.html", "c.html"] {
            std::fs::write(sheets.join(name), SHEET).unwrap();
        }
        std::fs::write(sheets.join("empty.html"), "<p>expired</p>").unwrap();
        std::fs::write(sheets.join("notes.txt"), "skip me").unwrap();

        let app = App::initialize(test_config(dir.path())).await.unwrap();
        let stats = app.run_batch(&sheets, None).await.unwrap();

        assert_eq!(
            stats,
            BatchStats {
                success: 3,
                no_questions: 1,
                failed: 0,
                total: 4
            }
        );
        assert!(!stats.all_scored());
        assert!(dir.path().join("out").join("a.json").exists());
        let log = std::fs::read_to_string(dir.path().join("run.txt")).unwrap();
        assert!(log.contains("empty.html 未识别出题目"));
    }

    #[tokio::test]
    async fn test_batch_on_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::initialize(test_config(dir.path())).await.unwrap();
        assert!(app.run_batch(&dir.path().join("nope"), None).await.is_err());
    }

    #[tokio::test]
    async fn test_analyze_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.html");
        std::fs::write(&path, SHEET).unwrap();

        let app = App::initialize(test_config(dir.path())).await.unwrap();
        let data = app.analyze(SheetInput::File(path), Some("SSC_MTS".to_string())).await.unwrap();
        assert_eq!(data.exam.id, "SSC_MTS");
        assert_eq!(data.questions.len(), 1);
    }

    #[test]
    fn test_render_exams_filters_category() {
        let app = App::with_flow(Config::default(), ScorecardFlow::default());
        let text = app.render_exams(Some("ib"));

        assert!(text.starts_with("IB - "));
        assert!(!text.contains("SSC_CGL_MAINS"));
    }
}
