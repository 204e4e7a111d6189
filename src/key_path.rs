use std::fmt;

use crate::config::ScriptRange;

/// 路径片段：复合标签的键或列表下标
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    /// 渲染为占位符中的文本
    ///
    /// 片段中落在提取范围内的字符写成 `u<4 位十六进制>`（超出 BMP 时为 `U<6 位十六进制>`），
    /// 保证占位符本身永远不会被再次提取。紧跟大写十六进制数字的字面 `u`/`U` 也按同样方式转义，
    /// 因此不同的键总是得到不同的文本。
    pub fn render(&self, range: ScriptRange) -> String {
        match self {
            PathSegment::Key(key) => {
                let mut rendered = String::with_capacity(key.len());
                let mut chars = key.chars().peekable();
                while let Some(c) = chars.next() {
                    let before_hex = chars
                        .peek()
                        .is_some_and(|&next| is_upper_hex(next) && !range.contains(next));
                    if range.contains(c) || (matches!(c, 'u' | 'U') && before_hex) {
                        push_escaped(&mut rendered, c);
                    } else {
                        rendered.push(c);
                    }
                }
                rendered
            }
            PathSegment::Index(index) => index.to_string(),
        }
    }
}

fn is_upper_hex(c: char) -> bool {
    c.is_ascii_digit() || ('A'..='F').contains(&c)
}

fn push_escaped(out: &mut String, c: char) {
    let code = c as u32;
    if code <= 0xFFFF {
        out.push_str(&format!("u{:04X}", code));
    } else {
        out.push_str(&format!("U{:06X}", code));
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// 上下文路径
///
/// 以文档标识为根，逐层记录键与下标。扩展路径时总是返回新的路径，
/// 兄弟分支之间互不可见。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextPath {
    segments: Vec<PathSegment>,
}

impl ContextPath {
    /// 以文档标识创建根路径
    pub fn root(document_id: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Key(document_id.into())],
        }
    }

    /// 追加一个片段，返回新的路径
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// 以 `.` 连接所有片段
    pub fn joined(&self, range: ScriptRange) -> String {
        self.segments
            .iter()
            .map(|segment| segment.render(range))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// 生成占位符 `{<namespace>.<path>}`
    pub fn placeholder(&self, namespace: &str, range: ScriptRange) -> String {
        format!("{{{}.{}}}", namespace, self.joined(range))
    }
}

impl fmt::Display for ContextPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
