use std::path::{Path, PathBuf};

use crate::config::ExtractConfig;
use crate::snbt::{self, SnbtValue};
use crate::table::{Collision, TranslationTable};
use crate::utils::QuestError;
use crate::walker::PlaceholderRewriter;

// 支持的编码，依次尝试
const SUPPORTED_ENCODINGS: &[&str] = &["utf-8", "gb18030"];

/// 解码后的源文本
#[derive(Debug, Clone)]
pub struct SourceText {
    pub content: String,
    pub encoding: &'static str,
}

impl SourceText {
    /// 尝试多种编码解码，UTF-8 BOM 会被去除
    pub fn decode(data: &[u8]) -> Self {
        let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);

        for &encoding_name in SUPPORTED_ENCODINGS {
            if let Some(encoding) = encoding_rs::Encoding::for_label(encoding_name.as_bytes()) {
                let (decoded, had_errors) = encoding.decode_without_bom_handling(data);
                if !had_errors {
                    return SourceText {
                        content: decoded.into_owned(),
                        encoding: encoding_name,
                    };
                }
            }
        }

        // 回退到UTF-8，忽略错误
        SourceText {
            content: String::from_utf8_lossy(data).into_owned(),
            encoding: "utf-8",
        }
    }
}

/// 确定文档标识
///
/// 优先使用根复合标签中的标识字段（非空字符串或数字），否则使用文件名（不含扩展名）
pub fn resolve_document_id(document: &SnbtValue, id_field: &str, path: &Path) -> String {
    match document.get(id_field) {
        Some(SnbtValue::String(id)) if !id.is_empty() => id.clone(),
        Some(SnbtValue::Number(number)) => number.literal.clone(),
        _ => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

/// 单个文档的处理结果
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// 输入文件路径
    pub source_path: PathBuf,
    /// 相对输入根目录的路径
    pub relative_path: PathBuf,
    pub document_id: String,
    pub encoding: &'static str,
    /// 替换后的 SNBT 文本
    pub output: String,
    /// 本文档产生的翻译条目
    pub table: TranslationTable,
    /// 文档内部的占位符冲突
    pub collisions: Vec<Collision>,
}

/// 处理一个文档：解码、解析、替换、重新编码
///
/// 失败时不产生任何翻译条目
pub fn process_document(
    data: &[u8],
    source_path: &Path,
    relative_path: &Path,
    config: &ExtractConfig,
) -> Result<ProcessedDocument, QuestError> {
    let source = SourceText::decode(data);
    let tree = snbt::parse(&source.content, config.snbt_flags)?;
    let document_id = resolve_document_id(&tree, &config.id_field, source_path);

    let mut rewriter = PlaceholderRewriter::new(&config.placeholder_namespace, config.script_range);
    let rewritten = rewriter.rewrite_document(tree, &document_id);
    let output = snbt::stringify(&rewritten, config.snbt_flags);
    let (table, collisions) = rewriter.into_parts();

    Ok(ProcessedDocument {
        source_path: source_path.to_path_buf(),
        relative_path: relative_path.to_path_buf(),
        document_id,
        encoding: source.encoding,
        output,
        table,
        collisions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snbt::SnbtNumber;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_utf8_with_bom() {
        let mut data = b"\xEF\xBB\xBF".to_vec();
        data.extend_from_slice("{ title: \"任务\" }".as_bytes());

        let source = SourceText::decode(&data);
        assert_eq!(source.encoding, "utf-8");
        assert_eq!(source.content, "{ title: \"任务\" }");
    }

    #[test]
    fn test_decode_gb18030_fallback() {
        let (encoded, _, _) = encoding_rs::GB18030.encode("{ title: \"任务\" }");
        let source = SourceText::decode(&encoded);

        assert_eq!(source.encoding, "gb18030");
        assert_eq!(source.content, "{ title: \"任务\" }");
    }

    #[test]
    fn test_resolve_document_id() {
        let path = Path::new("quests/chapters/getting_started.snbt");

        let with_field: SnbtValue = vec![("filename", SnbtValue::from("intro"))].into_iter().collect();
        assert_eq!(resolve_document_id(&with_field, "filename", path), "intro");

        let empty_field: SnbtValue = vec![("filename", SnbtValue::from(""))].into_iter().collect();
        assert_eq!(resolve_document_id(&empty_field, "filename", path), "getting_started");

        let numeric: SnbtValue = vec![("id", SnbtValue::Number(SnbtNumber::int(12)))].into_iter().collect();
        assert_eq!(resolve_document_id(&numeric, "id", path), "12");

        assert_eq!(resolve_document_id(&SnbtValue::compound(), "filename", path), "getting_started");
        assert_eq!(resolve_document_id(&SnbtValue::List(vec![]), "filename", path), "getting_started");
    }

    #[test]
    fn test_process_document() {
        let text = "{\n\tfilename: \"quest1\"\n\ttitle: \"你好\"\n\ttasks: [\"任务一\", \"done\"]\n}\n";
        let config = ExtractConfig::default();

        let processed = process_document(
            text.as_bytes(),
            Path::new("quests/quest1.snbt"),
            Path::new("quest1.snbt"),
            &config,
        )
        .unwrap();

        assert_eq!(processed.document_id, "quest1");
        assert_eq!(
            processed.output,
            "{\n\tfilename: \"quest1\"\n\ttitle: \"{quest.quest1.title}\"\n\ttasks: [\n\t\t\"{quest.quest1.tasks.0}\"\n\t\t\"done\"\n\t]\n}\n"
        );
        assert_eq!(processed.table.len(), 2);
        assert!(processed.collisions.is_empty());
    }

    #[test]
    fn test_process_document_parse_failure() {
        let config = ExtractConfig::default();
        let result = process_document(
            b"{ title: \"broken",
            Path::new("quests/broken.snbt"),
            Path::new("broken.snbt"),
            &config,
        );

        assert!(matches!(result, Err(QuestError::Parse { .. })));
    }
}
