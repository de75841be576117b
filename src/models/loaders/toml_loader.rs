use crate::error::CatalogError;
use crate::models::exam::ExamConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 自定义考试目录文件的结构
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    exams: Vec<ExamConfig>,
}

/// 从 TOML 文件加载自定义考试，任何一场考试无效则整个文件失败
pub async fn load_catalog_file(toml_file_path: &Path) -> Result<Vec<ExamConfig>> {
    let path_display = toml_file_path.display().to_string();
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", path_display))?;

    let file: CatalogFile = toml::from_str(&content).map_err(|source| CatalogError::TomlParseFailed {
        path: path_display.clone(),
        source,
    })?;

    for exam in &file.exams {
        exam.validate()?;
        if exam.total_questions != exam.subject_question_total() {
            tracing::warn!(
                "考试 {} 声明 {} 道题目，科目合计 {} 道，以科目为准",
                exam.id,
                exam.total_questions,
                exam.subject_question_total()
            );
        }
    }

    Ok(file.exams)
}

/// 从文件夹中加载所有 TOML 目录文件，解析失败的文件跳过
pub async fn load_catalog_folder(folder_path: &str) -> Result<Vec<ExamConfig>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(CatalogError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    // 保证覆盖顺序稳定
    toml_files.sort();

    let mut exams = Vec::new();
    for path in toml_files {
        tracing::info!(
            "正在加载考试目录: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_catalog_file(&path).await {
            Ok(loaded) => {
                tracing::info!("成功加载 {} 场考试", loaded.len());
                exams.extend(loaded);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(exams)
}
