use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::ExtractConfig;
use crate::table::Collision;
use crate::utils::QuestError;

/// 文档失败的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Read,
    Parse,
    Collision,
    Write,
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureStage::Read => "读取",
            FailureStage::Parse => "解析",
            FailureStage::Collision => "冲突",
            FailureStage::Write => "写出",
        };
        write!(f, "{}", name)
    }
}

/// 单个文档的失败记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub stage: FailureStage,
    pub message: String,
}

impl DocumentFailure {
    pub fn new(path: &Path, stage: FailureStage, error: QuestError) -> Self {
        Self {
            path: path.to_path_buf(),
            stage,
            message: error.to_string(),
        }
    }
}

/// 提取运行报告
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub documents_found: usize,
    /// 成功写出的文档数
    pub documents_written: usize,
    /// 翻译表行数
    pub entry_count: usize,
    pub collisions: Vec<Collision>,
    pub failures: Vec<DocumentFailure>,
    /// 原文含分隔符或换行的条目数
    pub unsafe_entries: usize,
    pub table_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

impl RunReport {
    pub fn new(config: &ExtractConfig) -> Self {
        Self {
            input_dir: config.input_dir.clone(),
            output_dir: config.output_dir.clone(),
            started_at: Local::now(),
            finished_at: None,
            documents_found: 0,
            documents_written: 0,
            entry_count: 0,
            collisions: Vec::new(),
            failures: Vec::new(),
            unsafe_entries: 0,
            table_path: None,
            json_path: None,
        }
    }

    /// 记录失败并输出警告
    pub fn record_failure(&mut self, failure: DocumentFailure) {
        tracing::warn!(
            "{}失败: {}: {}",
            failure.stage,
            failure.path.display(),
            failure.message
        );
        self.failures.push(failure);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    /// 所有文档都成功处理
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// 运行耗时（毫秒）
    pub fn elapsed_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds())
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== 提取统计信息 ===")?;
        writeln!(f, "输入目录: {}", self.input_dir.display())?;
        writeln!(f, "输出目录: {}", self.output_dir.display())?;
        writeln!(f, "发现文档数: {}", self.documents_found)?;
        writeln!(f, "写出文档数: {}", self.documents_written)?;
        writeln!(f, "失败文档数: {}", self.failures.len())?;
        writeln!(f, "翻译条目数: {}", self.entry_count)?;
        writeln!(f, "占位符冲突数: {}", self.collisions.len())?;
        if self.unsafe_entries > 0 {
            writeln!(f, "含分隔符的条目数: {}", self.unsafe_entries)?;
        }
        if let Some(path) = &self.table_path {
            writeln!(f, "翻译表: {}", path.display())?;
        }
        if let Some(path) = &self.json_path {
            writeln!(f, "JSON 翻译表: {}", path.display())?;
        }
        if let Some(ms) = self.elapsed_ms() {
            writeln!(f, "耗时: {} ms", ms)?;
        }
        for failure in &self.failures {
            writeln!(f, "  [{}] {}: {}", failure.stage, failure.path.display(), failure.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display() {
        let mut report = RunReport::new(&ExtractConfig::default());
        report.documents_found = 3;
        report.documents_written = 2;
        report.entry_count = 5;
        report.record_failure(DocumentFailure::new(
            Path::new("quests/bad.snbt"),
            FailureStage::Parse,
            QuestError::Parse {
                line: 2,
                column: 7,
                message: "意外的文件结尾".to_string(),
            },
        ));
        report.finish();

        let text = report.to_string();
        assert!(text.contains("发现文档数: 3"));
        assert!(text.contains("写出文档数: 2"));
        assert!(text.contains("失败文档数: 1"));
        assert!(text.contains("[解析] quests/bad.snbt"));
        assert!(!report.is_clean());
        assert!(report.elapsed_ms().is_some());
    }

    #[test]
    fn test_report_serializes() {
        let report = RunReport::new(&ExtractConfig::default());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["documents_found"], 0);
        assert_eq!(json["input_dir"], "quests");
        assert!(json["finished_at"].is_null());
    }
}
