use thiserror::Error;
use std::path::{Path, PathBuf};

use crate::config::ScriptRange;
use crate::snbt::SnbtValue;

/// 自定义错误类型
#[derive(Error, Debug)]
pub enum QuestError {
    #[error("SNBT parse error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Placeholder collision: {placeholder}")]
    PlaceholderCollision { placeholder: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// 文本是否包含指定范围内的字符
pub fn contains_script(text: &str, range: ScriptRange) -> bool {
    text.chars().any(|c| range.contains(c))
}

/// 节点是否为需要提取的字符串
///
/// 只有字符串标量会被判定为可翻译，数字、布尔值和容器一律返回 false
pub fn is_translatable(value: &SnbtValue, range: ScriptRange) -> bool {
    match value {
        SnbtValue::String(text) => contains_script(text, range),
        _ => false,
    }
}

/// 创建文件备份
///
/// 备份文件与原文件同目录，扩展名前插入时间戳：`translations.2024-01-01-12-00-00.csv.bak`
pub fn create_backup(file_path: &Path) -> Result<PathBuf, QuestError> {
    if !file_path.exists() {
        return Err(QuestError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "原文件不存在"
        )));
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!("{}.{}.bak", timestamp, ext))
        .unwrap_or_else(|| format!("{}.bak", timestamp));
    let backup_path = file_path.with_extension(extension);

    std::fs::copy(file_path, &backup_path)
        .map_err(QuestError::IoError)?;

    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snbt::SnbtNumber;
    use indexmap::IndexMap;

    #[test]
    fn test_contains_script() {
        let range = ScriptRange::CJK_UNIFIED;

        assert!(contains_script("你好", range));
        assert!(contains_script("Mixed 中英文 text", range));
        assert!(contains_script("§6任务", range));

        assert!(!contains_script("", range));
        assert!(!contains_script("Iron Sword", range));
        assert!(!contains_script("minecraft:stone", range));
        // 全角标点不属于统一表意文字
        assert!(!contains_script("。，！", range));
    }

    #[test]
    fn test_is_translatable_only_strings() {
        let range = ScriptRange::CJK_UNIFIED;

        assert!(is_translatable(&SnbtValue::String("任务一".to_string()), range));
        assert!(!is_translatable(&SnbtValue::String("done".to_string()), range));
        assert!(!is_translatable(&SnbtValue::Bool(true), range));
        assert!(!is_translatable(&SnbtValue::Number(SnbtNumber::int(3)), range));
        assert!(!is_translatable(&SnbtValue::List(vec![SnbtValue::String("中".to_string())]), range));
        assert!(!is_translatable(&SnbtValue::Compound(IndexMap::new()), range));
    }

    #[test]
    fn test_placeholder_is_never_translatable() {
        let range = ScriptRange::CJK_UNIFIED;
        assert!(!contains_script("{quest.quest1.title}", range));
        assert!(!contains_script("{quest.quest1.tasks.0}", range));
    }

    #[test]
    fn test_custom_range() {
        // 平假名
        let range = ScriptRange::new('\u{3040}', '\u{309f}');
        assert!(contains_script("こんにちは", range));
        assert!(!contains_script("你好", range));
    }

    #[test]
    fn test_create_backup() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let file = temp_dir.path().join("translations.csv");
        std::fs::write(&file, "PLACEHOLDER;ZH;EN\n").unwrap();

        let backup = create_backup(&file).unwrap();
        assert!(backup.exists());
        assert!(backup.to_string_lossy().ends_with(".csv.bak"));
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "PLACEHOLDER;ZH;EN\n");

        assert!(create_backup(&temp_dir.path().join("missing.csv")).is_err());
    }
}
