use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::snbt::SnbtFlags;
use crate::utils::{contains_script, QuestError};

/// 默认的文档标识字段
pub const DEFAULT_ID_FIELD: &str = "filename";
/// 默认的占位符命名空间
pub const DEFAULT_NAMESPACE: &str = "quest";
/// 默认的翻译表文件名
pub const DEFAULT_TABLE_NAME: &str = "translations.csv";

/// 文字范围（闭区间）
///
/// 默认为中日韩统一表意文字基本区 U+4E00..=U+9FFF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRange {
    pub start: char,
    pub end: char,
}

impl ScriptRange {
    pub const CJK_UNIFIED: ScriptRange = ScriptRange {
        start: '\u{4e00}',
        end: '\u{9fff}',
    };

    pub const fn new(start: char, end: char) -> Self {
        Self { start, end }
    }

    /// 字符是否落在范围内
    pub fn contains(&self, c: char) -> bool {
        self.start <= c && c <= self.end
    }
}

impl Default for ScriptRange {
    fn default() -> Self {
        Self::CJK_UNIFIED
    }
}

/// 占位符冲突处理策略
///
/// 两个文档拥有相同的文档标识时会产生相同的占位符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// 后写入者覆盖（记录警告）
    #[default]
    Overwrite,
    /// 拒绝整个冲突文档
    Reject,
}

/// 翻译表输出格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFormat {
    /// 字段分隔符
    pub delimiter: String,
    /// 第一列表头
    pub placeholder_header: String,
    /// 源语言列表头
    pub source_lang: String,
    /// 目标语言列表头
    pub target_lang: String,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            delimiter: ";".to_string(),
            placeholder_header: "PLACEHOLDER".to_string(),
            source_lang: "ZH".to_string(),
            target_lang: "EN".to_string(),
        }
    }
}

impl TableFormat {
    /// 表头行（不含换行符）
    pub fn header(&self) -> String {
        [
            self.placeholder_header.as_str(),
            self.source_lang.as_str(),
            self.target_lang.as_str(),
        ]
        .join(&self.delimiter)
    }
}

/// 提取配置
///
/// 所有字段都有默认值，JSON 配置文件中只需写出需要覆盖的字段：
///
/// ```json
/// { "input_dir": "quests", "output_dir": "out", "collision_policy": "reject" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// 输入根目录
    pub input_dir: PathBuf,
    /// 输出根目录
    pub output_dir: PathBuf,
    /// 文档扩展名（不区分大小写）
    pub extension: String,
    /// 文档标识字段，缺失时回退到文件名
    pub id_field: String,
    /// 占位符命名空间，生成 `{<namespace>.<path>}`
    pub placeholder_namespace: String,
    /// 需要提取的文字范围
    pub script_range: ScriptRange,
    /// 翻译表文件名（位于输出根目录）
    pub table_name: String,
    pub table_format: TableFormat,
    /// 同时输出 JSON 格式的翻译表
    pub emit_json: bool,
    pub collision_policy: CollisionPolicy,
    /// 并行解析文档
    pub parallel: bool,
    /// SNBT 编解码选项
    pub snbt_flags: SnbtFlags,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("quests"),
            output_dir: PathBuf::from("out"),
            extension: "snbt".to_string(),
            id_field: DEFAULT_ID_FIELD.to_string(),
            placeholder_namespace: DEFAULT_NAMESPACE.to_string(),
            script_range: ScriptRange::default(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            table_format: TableFormat::default(),
            emit_json: false,
            collision_policy: CollisionPolicy::default(),
            parallel: true,
            snbt_flags: SnbtFlags::default(),
        }
    }
}

impl ExtractConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file(path: &Path) -> Result<Self, QuestError> {
        let content = std::fs::read_to_string(path)?;
        let config: ExtractConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 翻译表输出路径
    pub fn table_path(&self) -> PathBuf {
        self.output_dir.join(&self.table_name)
    }

    /// JSON 翻译表输出路径
    ///
    /// 翻译表本身以 `.json` 结尾时在文件名后追加 `.json`，两者不会写到同一文件
    pub fn json_table_path(&self) -> PathBuf {
        let table_path = self.table_path();
        let json_path = table_path.with_extension("json");
        if json_path != table_path {
            return json_path;
        }
        let mut name = table_path.into_os_string();
        name.push(".json");
        PathBuf::from(name)
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> Result<(), QuestError> {
        if self.table_format.delimiter.is_empty() {
            return Err(QuestError::Config("分隔符不能为空".to_string()));
        }
        if self.script_range.start > self.script_range.end {
            return Err(QuestError::Config(format!(
                "文字范围无效: U+{:04X} > U+{:04X}",
                self.script_range.start as u32, self.script_range.end as u32
            )));
        }
        if self.id_field.is_empty() {
            return Err(QuestError::Config("文档标识字段不能为空".to_string()));
        }
        if self.placeholder_namespace.is_empty() {
            return Err(QuestError::Config("占位符命名空间不能为空".to_string()));
        }
        // 占位符中的 ASCII 字符必须落在范围之外，否则输出会被再次提取
        if (self.script_range.start as u32) < 0x80 {
            return Err(QuestError::Config("文字范围不能包含 ASCII 字符".to_string()));
        }
        if contains_script(&self.placeholder_namespace, self.script_range) {
            return Err(QuestError::Config(format!(
                "占位符命名空间 {:?} 含有需要提取的文字",
                self.placeholder_namespace
            )));
        }
        if self.table_name.is_empty() {
            return Err(QuestError::Config("翻译表文件名不能为空".to_string()));
        }
        // 输入与输出目录互相包含时，重复运行会把上次的输出当作输入
        let input = normalize_path(&self.input_dir)?;
        let output = normalize_path(&self.output_dir)?;
        if output.starts_with(&input) || input.starts_with(&output) {
            return Err(QuestError::Config(format!(
                "输出目录 {:?} 与输入目录 {:?} 不能相同或互相包含",
                self.output_dir, self.input_dir
            )));
        }
        Ok(())
    }
}

/// 转为绝对路径并折叠 `.` 与 `..`，不访问文件系统
fn normalize_path(path: &Path) -> Result<PathBuf, QuestError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}
