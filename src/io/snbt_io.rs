/// SNBT 文档 IO 实现
///
/// 提供基于文件系统的默认文档读写实现
use std::path::Path;
use super::traits::{DocumentReader, DocumentWriter};
use crate::utils::QuestError;

/// 默认的文档读取器（基于 std::fs）
#[derive(Debug, Clone, Default)]
pub struct DefaultDocumentReader;

impl DocumentReader for DefaultDocumentReader {
    fn read(&self, path: &Path) -> Result<Vec<u8>, QuestError> {
        Ok(std::fs::read(path)?)
    }
}

/// 默认的文档写入器（基于 std::fs）
#[derive(Debug, Clone, Default)]
pub struct DefaultDocumentWriter;

impl DocumentWriter for DefaultDocumentWriter {
    fn write(&self, path: &Path, content: &str) -> Result<(), QuestError> {
        // 确保父目录存在
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}
