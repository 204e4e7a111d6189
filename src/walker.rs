use crate::config::{ScriptRange, DEFAULT_NAMESPACE};
use crate::key_path::{ContextPath, PathSegment};
use crate::snbt::SnbtValue;
use crate::table::{Collision, TranslationTable};
use crate::utils::is_translatable;

/// 占位符替换器
///
/// 递归遍历文档树，把可翻译字符串替换为占位符，并把 (占位符, 原文) 写入自身的翻译表。
/// 文档树按值传入、重建后返回，结构（键、顺序、列表长度）保持不变。
/// 同一文档内两个节点得到相同占位符时（例如键 `"a.b"` 与嵌套的 `a: { b: … }`），
/// 后者覆盖前者，并记录为冲突。
#[derive(Debug, Clone)]
pub struct PlaceholderRewriter {
    namespace: String,
    range: ScriptRange,
    table: TranslationTable,
    collisions: Vec<Collision>,
}

impl Default for PlaceholderRewriter {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE, ScriptRange::default())
    }
}

impl PlaceholderRewriter {
    pub fn new(namespace: impl Into<String>, range: ScriptRange) -> Self {
        Self {
            namespace: namespace.into(),
            range,
            table: TranslationTable::new(),
            collisions: Vec::new(),
        }
    }

    /// 以文档标识为根路径处理整个文档
    pub fn rewrite_document(&mut self, document: SnbtValue, document_id: &str) -> SnbtValue {
        self.rewrite(document, &ContextPath::root(document_id))
    }

    /// 处理一个节点及其所有子节点
    pub fn rewrite(&mut self, value: SnbtValue, path: &ContextPath) -> SnbtValue {
        match value {
            value @ SnbtValue::String(_) if is_translatable(&value, self.range) => self.replace(value, path),
            SnbtValue::List(items) => SnbtValue::List(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| self.rewrite(item, &path.child(PathSegment::Index(index))))
                    .collect(),
            ),
            SnbtValue::Compound(map) => SnbtValue::Compound(
                map.into_iter()
                    .map(|(key, item)| {
                        let child = path.child(PathSegment::Key(key.clone()));
                        (key, self.rewrite(item, &child))
                    })
                    .collect(),
            ),
            // 不含目标文字的字符串、数字、布尔值和类型化数组原样返回
            other => other,
        }
    }

    /// 把字符串替换为占位符并记录原文
    fn replace(&mut self, value: SnbtValue, path: &ContextPath) -> SnbtValue {
        let SnbtValue::String(text) = value else {
            return value;
        };

        let placeholder = path.placeholder(&self.namespace, self.range);
        if let Some(previous) = self.table.get(&placeholder) {
            self.collisions.push(Collision {
                placeholder: placeholder.clone(),
                previous: previous.to_string(),
                current: text.clone(),
            });
        }
        self.table.record(placeholder.clone(), text);
        SnbtValue::String(placeholder)
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    /// 文档内部的占位符冲突
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// 取出累积的翻译表与冲突记录
    pub fn into_parts(self) -> (TranslationTable, Vec<Collision>) {
        (self.table, self.collisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snbt::{parse, stringify, SnbtFlags, SnbtNumber};
    use crate::utils::contains_script;
    use pretty_assertions::assert_eq;

    fn s(text: &str) -> SnbtValue {
        SnbtValue::from(text)
    }

    /// 比较两棵树的结构：键集合与顺序、列表长度、节点类型
    fn assert_same_shape(a: &SnbtValue, b: &SnbtValue) {
        match (a, b) {
            (SnbtValue::Compound(x), SnbtValue::Compound(y)) => {
                let kx: Vec<_> = x.keys().collect();
                let ky: Vec<_> = y.keys().collect();
                assert_eq!(kx, ky);
                for (vx, vy) in x.values().zip(y.values()) {
                    assert_same_shape(vx, vy);
                }
            }
            (SnbtValue::List(x), SnbtValue::List(y)) => {
                assert_eq!(x.len(), y.len());
                for (vx, vy) in x.iter().zip(y) {
                    assert_same_shape(vx, vy);
                }
            }
            (x, y) => assert_eq!(x.kind_name(), y.kind_name()),
        }
    }

    #[test]
    fn test_quest1_scenario() {
        let document: SnbtValue = vec![
            ("filename", s("quest1")),
            ("title", s("你好")),
            ("tasks", SnbtValue::List(vec![s("任务一"), s("done")])),
        ]
        .into_iter()
        .collect();

        let mut rewriter = PlaceholderRewriter::default();
        let rewritten = rewriter.rewrite_document(document, "quest1");

        let expected: SnbtValue = vec![
            ("filename", s("quest1")),
            ("title", s("{quest.quest1.title}")),
            ("tasks", SnbtValue::List(vec![s("{quest.quest1.tasks.0}"), s("done")])),
        ]
        .into_iter()
        .collect();
        assert_eq!(rewritten, expected);

        let rows: Vec<_> = rewriter.table().iter().collect();
        assert_eq!(
            rows,
            vec![
                ("{quest.quest1.title}", "你好"),
                ("{quest.quest1.tasks.0}", "任务一"),
            ]
        );
    }

    #[test]
    fn test_empty_document() {
        let mut rewriter = PlaceholderRewriter::default();
        let rewritten = rewriter.rewrite_document(SnbtValue::compound(), "empty");

        assert_eq!(rewritten, SnbtValue::compound());
        assert!(rewriter.table().is_empty());
    }

    #[test]
    fn test_non_string_scalars_untouched() {
        let document: SnbtValue = vec![
            ("x", SnbtValue::Number(SnbtNumber::int(5))),
            ("hidden", SnbtValue::Bool(true)),
            ("empty_list", SnbtValue::List(vec![])),
            ("empty_compound", SnbtValue::compound()),
            ("english", s("Hello")),
        ]
        .into_iter()
        .collect();

        let mut rewriter = PlaceholderRewriter::default();
        let rewritten = rewriter.rewrite_document(document.clone(), "doc");

        assert_eq!(rewritten, document);
        assert!(rewriter.table().is_empty());
    }

    #[test]
    fn test_nested_structures() {
        let text = r#"{
            quests: [
                { title: "第一个", tasks: [{ title: "收集" }, { title: "Kill" }] }
                { description: ["", "说明", ["深", "deep"]] }
            ]
        }"#;
        let document = parse(text, SnbtFlags::default()).unwrap();

        let mut rewriter = PlaceholderRewriter::default();
        let rewritten = rewriter.rewrite_document(document.clone(), "ch");

        assert_same_shape(&document, &rewritten);

        let rows: Vec<_> = rewriter.table().iter().collect();
        assert_eq!(
            rows,
            vec![
                ("{quest.ch.quests.0.title}", "第一个"),
                ("{quest.ch.quests.0.tasks.0.title}", "收集"),
                ("{quest.ch.quests.1.description.1}", "说明"),
                ("{quest.ch.quests.1.description.2.0}", "深"),
            ]
        );

        let quests = rewritten.get("quests").and_then(|v| v.as_list()).unwrap();
        let kill = quests[0].get("tasks").and_then(|v| v.as_list()).unwrap()[1]
            .get("title")
            .and_then(|v| v.as_str());
        assert_eq!(kill, Some("Kill"));
    }

    #[test]
    fn test_every_placeholder_matches_table() {
        let text = r#"{ a: "甲", b: ["乙", 1, { c: "丙" }], d: "none" }"#;
        let document = parse(text, SnbtFlags::default()).unwrap();

        let mut rewriter = PlaceholderRewriter::default();
        let rewritten = rewriter.rewrite_document(document, "doc");

        let mut placeholders = Vec::new();
        collect_strings(&rewritten, &mut placeholders);

        let produced: Vec<_> = placeholders.iter().filter(|p| p.starts_with("{quest.")).collect();
        assert_eq!(produced.len(), rewriter.table().len());
        for placeholder in produced {
            assert!(rewriter.table().contains(placeholder));
            assert!(!contains_script(placeholder, ScriptRange::CJK_UNIFIED));
        }
    }

    fn collect_strings(value: &SnbtValue, out: &mut Vec<String>) {
        match value {
            SnbtValue::String(text) => out.push(text.clone()),
            SnbtValue::List(items) => items.iter().for_each(|item| collect_strings(item, out)),
            SnbtValue::Compound(map) => map.values().for_each(|item| collect_strings(item, out)),
            _ => {}
        }
    }

    #[test]
    fn test_rewritten_output_is_not_extracted_again() {
        let text = r#"{ title: "标题", description: ["一", "二"] }"#;
        let document = parse(text, SnbtFlags::default()).unwrap();

        let mut first = PlaceholderRewriter::default();
        let rewritten = first.rewrite_document(document, "doc");
        assert_eq!(first.table().len(), 3);

        let reparsed = parse(&stringify(&rewritten, SnbtFlags::default()), SnbtFlags::default()).unwrap();
        let mut second = PlaceholderRewriter::default();
        let again = second.rewrite_document(reparsed, "doc");

        assert!(second.table().is_empty());
        assert_eq!(again, rewritten);
    }

    #[test]
    fn test_custom_namespace_and_range() {
        let document: SnbtValue = vec![("name", s("こんにちは")), ("cn", s("你好"))].into_iter().collect();

        let mut rewriter = PlaceholderRewriter::new("ftb", ScriptRange::new('\u{3040}', '\u{309f}'));
        let rewritten = rewriter.rewrite_document(document, "jp");

        assert_eq!(rewritten.get("name").and_then(|v| v.as_str()), Some("{ftb.jp.name}"));
        assert_eq!(rewritten.get("cn").and_then(|v| v.as_str()), Some("你好"));
        let (table, collisions) = rewriter.into_parts();
        assert_eq!(table.len(), 1);
        assert!(collisions.is_empty());
    }

    #[test]
    fn test_non_compound_root() {
        let mut rewriter = PlaceholderRewriter::default();
        let rewritten = rewriter.rewrite_document(SnbtValue::List(vec![s("根")]), "root");

        assert_eq!(rewritten, SnbtValue::List(vec![s("{quest.root.0}")]));
    }

    #[test]
    fn test_escaped_and_literal_keys_both_extracted() {
        let document = parse(r#"{ "一": "甲", u4E00: "乙" }"#, SnbtFlags::default()).unwrap();

        let mut rewriter = PlaceholderRewriter::default();
        let rewritten = rewriter.rewrite_document(document, "d");

        assert_eq!(rewritten.get("一").and_then(|v| v.as_str()), Some("{quest.d.u4E00}"));
        assert_eq!(rewritten.get("u4E00").and_then(|v| v.as_str()), Some("{quest.d.u00754E00}"));
        let rows: Vec<_> = rewriter.table().iter().collect();
        assert_eq!(rows, vec![("{quest.d.u4E00}", "甲"), ("{quest.d.u00754E00}", "乙")]);
        assert!(rewriter.collisions().is_empty());
    }

    #[test]
    fn test_collision_within_document_is_recorded() {
        let document = parse(r#"{ "a.b": "甲", a: { b: "乙" } }"#, SnbtFlags::default()).unwrap();

        let mut rewriter = PlaceholderRewriter::default();
        rewriter.rewrite_document(document, "d");

        assert_eq!(rewriter.table().len(), 1);
        assert_eq!(rewriter.table().get("{quest.d.a.b}"), Some("乙"));
        assert_eq!(
            rewriter.collisions(),
            &[Collision {
                placeholder: "{quest.d.a.b}".to_string(),
                previous: "甲".to_string(),
                current: "乙".to_string(),
            }]
        );
    }
}
