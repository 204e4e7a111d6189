//! 提取流程
//!
//! 扫描输入目录 → 并行解码/替换/编码各文档 → 按发现顺序写出文档并合并翻译表 → 写出翻译表

pub mod stats;

use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::config::{CollisionPolicy, ExtractConfig};
use crate::document::{process_document, ProcessedDocument};
use crate::io::{DefaultDocumentReader, DefaultDocumentWriter, DocumentReader, DocumentWriter};
use crate::scanner::{mirror_path, scan_documents};
use crate::table::{Collision, TranslationTable};
use crate::utils::{create_backup, QuestError};

pub use stats::{DocumentFailure, FailureStage, RunReport};

/// 任务文件提取器
pub struct QuestExtractor {
    config: ExtractConfig,
    reader: Box<dyn DocumentReader>,
    writer: Box<dyn DocumentWriter>,
}

impl std::fmt::Debug for QuestExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestExtractor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QuestExtractor {
    /// 使用文件系统读写创建提取器
    pub fn new(config: ExtractConfig) -> Result<Self, QuestError> {
        Self::with_io(
            config,
            Box::new(DefaultDocumentReader),
            Box::new(DefaultDocumentWriter),
        )
    }

    /// 使用自定义读写实现创建提取器
    pub fn with_io(
        config: ExtractConfig,
        reader: Box<dyn DocumentReader>,
        writer: Box<dyn DocumentWriter>,
    ) -> Result<Self, QuestError> {
        config.validate()?;
        Ok(Self {
            config,
            reader,
            writer,
        })
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// 执行完整提取流程
    ///
    /// 单个文档的失败只记录在报告中；翻译表写出失败会直接返回错误
    pub fn run(&self) -> Result<RunReport, QuestError> {
        let documents = scan_documents(&self.config.input_dir, &self.config.extension)?;
        tracing::info!(
            "在 {} 中发现 {} 个文档",
            self.config.input_dir.display(),
            documents.len()
        );

        let (table, mut report) = self.extract(&documents);
        self.write_table(&table, &mut report)?;
        report.finish();

        Ok(report)
    }

    /// 处理给定的文档列表，返回合并后的翻译表与报告（不写出翻译表）
    pub fn extract(&self, documents: &[PathBuf]) -> (TranslationTable, RunReport) {
        let mut report = RunReport::new(&self.config);
        report.documents_found = documents.len();

        let outcomes: Vec<Result<ProcessedDocument, DocumentFailure>> = if self.config.parallel {
            documents.par_iter().map(|path| self.prepare(path)).collect()
        } else {
            documents.iter().map(|path| self.prepare(path)).collect()
        };

        let mut table = TranslationTable::new();
        for outcome in outcomes {
            match outcome {
                Ok(document) => self.commit(document, &mut table, &mut report),
                Err(failure) => report.record_failure(failure),
            }
        }

        report.entry_count = table.len();
        (table, report)
    }

    /// 读取并处理单个文档，不产生任何副作用
    fn prepare(&self, path: &Path) -> Result<ProcessedDocument, DocumentFailure> {
        tracing::info!("处理中: {}", path.display());

        let data = self
            .reader
            .read(path)
            .map_err(|e| DocumentFailure::new(path, FailureStage::Read, e))?;

        let relative = path.strip_prefix(&self.config.input_dir).unwrap_or(path);
        let document = process_document(&data, path, relative, &self.config)
            .map_err(|e| DocumentFailure::new(path, FailureStage::Parse, e))?;

        tracing::debug!(
            "{}: 文档标识 {}，编码 {}，{} 个条目",
            path.display(),
            document.document_id,
            document.encoding,
            document.table.len()
        );
        Ok(document)
    }

    /// 合并文档的翻译条目并写出替换后的文档
    fn commit(&self, document: ProcessedDocument, table: &mut TranslationTable, report: &mut RunReport) {
        let entry_count = document.table.len();
        let policy = self.config.collision_policy;

        // 文档内部的冲突
        if let Some(first) = document.collisions.first() {
            if policy == CollisionPolicy::Reject {
                let error = QuestError::PlaceholderCollision {
                    placeholder: first.placeholder.clone(),
                };
                report.record_failure(DocumentFailure::new(&document.source_path, FailureStage::Collision, error));
                return;
            }
            warn_collisions(&document.source_path, &document.collisions);
            report.collisions.extend(document.collisions);
        }

        // 与之前文档的冲突
        match table.merge(document.table, policy) {
            Ok(collisions) => {
                warn_collisions(&document.source_path, &collisions);
                report.collisions.extend(collisions);
            }
            Err(e) => {
                report.record_failure(DocumentFailure::new(&document.source_path, FailureStage::Collision, e));
                return;
            }
        }

        let output_path = mirror_path(
            &document.source_path,
            &self.config.input_dir,
            &self.config.output_dir,
        );
        if let Err(e) = self.writer.write(&output_path, &document.output) {
            report.record_failure(DocumentFailure::new(&document.source_path, FailureStage::Write, e));
            return;
        }

        tracing::info!(
            "完成: {} -> {}（{} 个条目）",
            document.relative_path.display(),
            output_path.display(),
            entry_count
        );
        report.documents_written += 1;
    }

    /// 写出翻译表（以及可选的 JSON 版本）
    fn write_table(&self, table: &TranslationTable, report: &mut RunReport) -> Result<(), QuestError> {
        let format = &self.config.table_format;

        for placeholder in table.unsafe_entries(format) {
            tracing::warn!("{} 的原文包含分隔符或换行，导出的表格列可能错位", placeholder);
            report.unsafe_entries += 1;
        }

        let table_path = self.config.table_path();
        backup_existing(&table_path)?;
        table.write_to(&table_path, format)?;
        tracing::info!("翻译表已写入: {}（{} 行）", table_path.display(), table.len());
        report.table_path = Some(table_path);

        if self.config.emit_json {
            let json_path = self.config.json_table_path();
            backup_existing(&json_path)?;
            std::fs::write(&json_path, table.to_json()?)?;
            tracing::info!("JSON 翻译表已写入: {}", json_path.display());
            report.json_path = Some(json_path);
        }

        Ok(())
    }
}

fn warn_collisions(path: &Path, collisions: &[Collision]) {
    for collision in collisions {
        tracing::warn!(
            "占位符冲突 {}（{}）：\"{}\" 被 \"{}\" 覆盖",
            collision.placeholder,
            path.display(),
            collision.previous,
            collision.current
        );
    }
}

/// 覆盖前备份已有的输出文件
fn backup_existing(path: &Path) -> Result<(), QuestError> {
    if path.exists() {
        let backup = create_backup(path)?;
        tracing::info!("已备份旧文件: {}", backup.display());
    }
    Ok(())
}
