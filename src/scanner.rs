use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::utils::QuestError;

/// 递归扫描输入目录，返回指定扩展名的文档路径（已排序）
///
/// 扩展名比较不区分大小写；无法读取的目录项会被记录并跳过
pub fn scan_documents(root: &Path, extension: &str) -> Result<Vec<PathBuf>, QuestError> {
    if !root.is_dir() {
        return Err(QuestError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("输入目录不存在: {}", root.display()),
        )));
    }

    let mut documents = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("跳过无法读取的目录项: {}", e);
                continue;
            }
        };

        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            documents.push(entry.into_path());
        }
    }

    documents.sort();
    tracing::debug!("在 {} 中发现 {} 个文档", root.display(), documents.len());
    Ok(documents)
}

/// 检查文件扩展名
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// 输入文件在输出目录中的对应路径
pub fn mirror_path(source: &Path, input_root: &Path, output_root: &Path) -> PathBuf {
    match source.strip_prefix(input_root) {
        Ok(relative) => output_root.join(relative),
        Err(_) => output_root.join(source.file_name().unwrap_or(source.as_os_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_documents_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("chapters")).unwrap();
        std::fs::create_dir_all(root.join("reward_tables")).unwrap();

        std::fs::write(root.join("data.snbt"), "{ }").unwrap();
        std::fs::write(root.join("chapters").join("b.snbt"), "{ }").unwrap();
        std::fs::write(root.join("chapters").join("a.SNBT"), "{ }").unwrap();
        std::fs::write(root.join("chapters").join("notes.txt"), "ignore").unwrap();
        std::fs::write(root.join("reward_tables").join("loot.snbt"), "{ }").unwrap();

        let documents = scan_documents(root, "snbt").unwrap();
        let relative: Vec<_> = documents
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("chapters/a.SNBT"),
                PathBuf::from("chapters/b.snbt"),
                PathBuf::from("data.snbt"),
                PathBuf::from("reward_tables/loot.snbt"),
            ]
        );
    }

    #[test]
    fn test_scan_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        assert!(scan_documents(&temp_dir.path().join("missing"), "snbt").is_err());
    }

    #[test]
    fn test_mirror_path() {
        let mirrored = mirror_path(
            Path::new("quests/chapters/intro.snbt"),
            Path::new("quests"),
            Path::new("out"),
        );
        assert_eq!(mirrored, PathBuf::from("out/chapters/intro.snbt"));

        let outside = mirror_path(Path::new("elsewhere/x.snbt"), Path::new("quests"), Path::new("out"));
        assert_eq!(outside, PathBuf::from("out/x.snbt"));
    }
}
