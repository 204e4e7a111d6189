use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{CollisionPolicy, TableFormat};
use crate::utils::QuestError;

/// 翻译表中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    pub placeholder: String,
    /// 原文
    pub source: String,
    /// 译文，导出时总是为空
    pub target: String,
}

/// 占位符冲突记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub placeholder: String,
    /// 被覆盖的原文
    pub previous: String,
    /// 新写入的原文
    pub current: String,
}

/// 翻译表累加器
///
/// 按首次插入顺序保存占位符到原文的映射；同一占位符再次写入时覆盖原文但保留位置。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    entries: IndexMap<String, String>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一条记录，返回被覆盖的原文
    pub fn record(&mut self, placeholder: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.entries.insert(placeholder.into(), text.into())
    }

    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.entries.get(placeholder).map(|s| s.as_str())
    }

    pub fn contains(&self, placeholder: &str) -> bool {
        self.entries.contains_key(placeholder)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按插入顺序遍历 (占位符, 原文)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 查找与另一张表重复的占位符
    pub fn find_collisions(&self, other: &TranslationTable) -> Vec<Collision> {
        other
            .iter()
            .filter_map(|(placeholder, current)| {
                self.get(placeholder).map(|previous| Collision {
                    placeholder: placeholder.to_string(),
                    previous: previous.to_string(),
                    current: current.to_string(),
                })
            })
            .collect()
    }

    /// 合并另一张表
    ///
    /// `Reject` 策略下存在任何冲突都不会写入，整张表被拒绝
    pub fn merge(
        &mut self,
        other: TranslationTable,
        policy: CollisionPolicy,
    ) -> Result<Vec<Collision>, QuestError> {
        let collisions = self.find_collisions(&other);

        if policy == CollisionPolicy::Reject {
            if let Some(collision) = collisions.first() {
                return Err(QuestError::PlaceholderCollision {
                    placeholder: collision.placeholder.clone(),
                });
            }
        }

        for (placeholder, text) in other.entries {
            self.entries.insert(placeholder, text);
        }

        Ok(collisions)
    }

    /// 导出为分隔文本
    ///
    /// 原文中的分隔符和换行不做转义
    pub fn emit(&self, format: &TableFormat) -> String {
        let mut output = format.header();
        output.push('\n');

        for (placeholder, text) in &self.entries {
            output.push_str(placeholder);
            output.push_str(&format.delimiter);
            output.push_str(text);
            output.push_str(&format.delimiter);
            output.push('\n');
        }

        output
    }

    /// 写入分隔文本文件
    pub fn write_to(&self, path: &Path, format: &TableFormat) -> Result<(), QuestError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.emit(format))?;
        Ok(())
    }

    pub fn entries(&self) -> Vec<TranslationEntry> {
        self.iter()
            .map(|(placeholder, source)| TranslationEntry {
                placeholder: placeholder.to_string(),
                source: source.to_string(),
                target: String::new(),
            })
            .collect()
    }

    /// 导出为 JSON 数组
    pub fn to_json(&self) -> Result<String, QuestError> {
        Ok(serde_json::to_string_pretty(&self.entries())?)
    }

    /// 原文中含有分隔符或换行、导出后会破坏列结构的占位符
    pub fn unsafe_entries<'a>(&'a self, format: &'a TableFormat) -> impl Iterator<Item = &'a str> + 'a {
        self.iter()
            .filter(move |(_, text)| {
                text.contains(format.delimiter.as_str()) || text.contains('\n') || text.contains('\r')
            })
            .map(|(placeholder, _)| placeholder)
    }
}

impl FromIterator<(String, String)> for TranslationTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut table = TranslationTable::new();
        for (placeholder, text) in iter {
            table.record(placeholder, text);
        }
        table
    }
}
