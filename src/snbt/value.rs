use indexmap::IndexMap;
use std::fmt;

/// 数字后缀
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberSuffix {
    Byte,
    Short,
    Long,
    Float,
    Double,
}

impl NumberSuffix {
    /// 从后缀字符解析（大小写不敏感）
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'b' => Some(NumberSuffix::Byte),
            's' => Some(NumberSuffix::Short),
            'l' => Some(NumberSuffix::Long),
            'f' => Some(NumberSuffix::Float),
            'd' => Some(NumberSuffix::Double),
            _ => None,
        }
    }

    /// 输出时使用的后缀字符
    pub fn to_char(&self) -> char {
        match self {
            NumberSuffix::Byte => 'b',
            NumberSuffix::Short => 's',
            NumberSuffix::Long => 'L',
            NumberSuffix::Float => 'f',
            NumberSuffix::Double => 'd',
        }
    }
}

/// 数字标量
///
/// 保留原始字面量，避免浮点格式化改变未修改的数值
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnbtNumber {
    /// 数字字面量（不含后缀），如 `-1`、`0.5`、`1e3`
    pub literal: String,
    pub suffix: Option<NumberSuffix>,
}

impl SnbtNumber {
    pub fn new(literal: impl Into<String>, suffix: Option<NumberSuffix>) -> Self {
        Self {
            literal: literal.into(),
            suffix,
        }
    }

    /// 无后缀整数
    pub fn int(value: i64) -> Self {
        Self::new(value.to_string(), None)
    }

    /// 带后缀的数字
    pub fn with_suffix(literal: impl Into<String>, suffix: NumberSuffix) -> Self {
        Self::new(literal, Some(suffix))
    }

    /// 字面量是否为合法数字（不含后缀）
    pub fn is_valid_literal(text: &str) -> bool {
        let body = text.strip_prefix(&['+', '-'][..]).unwrap_or(text);
        let (mantissa, exponent) = match body.find(&['e', 'E'][..]) {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };

        let mut parts = mantissa.splitn(2, '.');
        let integer = parts.next().unwrap_or("");
        let fraction = parts.next();
        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());

        let mantissa_ok = match fraction {
            Some(fraction) => {
                (!integer.is_empty() || !fraction.is_empty())
                    && all_digits(integer)
                    && all_digits(fraction)
            }
            None => !integer.is_empty() && all_digits(integer),
        };

        let exponent_ok = match exponent {
            Some(exp) => {
                let digits = exp.strip_prefix(&['+', '-'][..]).unwrap_or(exp);
                !digits.is_empty() && all_digits(digits)
            }
            None => true,
        };

        mantissa_ok && exponent_ok
    }

    /// 按 SNBT 规则解析一个完整的数字记号（可带后缀）
    pub fn parse_token(token: &str) -> Option<Self> {
        if Self::is_valid_literal(token) {
            return Some(Self::new(token, None));
        }

        let last = token.chars().last()?;
        let suffix = NumberSuffix::from_char(last)?;
        let literal = &token[..token.len() - last.len_utf8()];
        if Self::is_valid_literal(literal) {
            Some(Self::new(literal, Some(suffix)))
        } else {
            None
        }
    }
}

impl fmt::Display for SnbtNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.literal)?;
        if let Some(suffix) = self.suffix {
            write!(f, "{}", suffix.to_char())?;
        }
        Ok(())
    }
}

/// 类型化数组的元素类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayType {
    Byte,
    Int,
    Long,
}

impl ArrayType {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'B' => Some(ArrayType::Byte),
            'I' => Some(ArrayType::Int),
            'L' => Some(ArrayType::Long),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            ArrayType::Byte => 'B',
            ArrayType::Int => 'I',
            ArrayType::Long => 'L',
        }
    }
}

/// SNBT 文档树节点
#[derive(Debug, Clone, PartialEq)]
pub enum SnbtValue {
    String(String),
    Number(SnbtNumber),
    Bool(bool),
    List(Vec<SnbtValue>),
    /// `[B; ...]`、`[I; ...]`、`[L; ...]`
    TypedArray(ArrayType, Vec<SnbtNumber>),
    /// 键值对，保持插入顺序
    Compound(IndexMap<String, SnbtValue>),
}

impl SnbtValue {
    /// 空复合标签
    pub fn compound() -> Self {
        SnbtValue::Compound(IndexMap::new())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SnbtValue::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&IndexMap<String, SnbtValue>> {
        match self {
            SnbtValue::Compound(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SnbtValue]> {
        match self {
            SnbtValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// 复合标签中按键取值
    pub fn get(&self, key: &str) -> Option<&SnbtValue> {
        self.as_compound().and_then(|map| map.get(key))
    }

    /// 是否为数字或布尔值
    pub fn is_primitive(&self) -> bool {
        matches!(self, SnbtValue::Number(_) | SnbtValue::Bool(_))
    }

    /// 节点类型名称
    pub fn kind_name(&self) -> &'static str {
        match self {
            SnbtValue::String(_) => "string",
            SnbtValue::Number(_) => "number",
            SnbtValue::Bool(_) => "bool",
            SnbtValue::List(_) => "list",
            SnbtValue::TypedArray(..) => "typed_array",
            SnbtValue::Compound(_) => "compound",
        }
    }
}

impl From<&str> for SnbtValue {
    fn from(text: &str) -> Self {
        SnbtValue::String(text.to_string())
    }
}

impl From<String> for SnbtValue {
    fn from(text: String) -> Self {
        SnbtValue::String(text)
    }
}

impl From<bool> for SnbtValue {
    fn from(value: bool) -> Self {
        SnbtValue::Bool(value)
    }
}

impl From<SnbtNumber> for SnbtValue {
    fn from(value: SnbtNumber) -> Self {
        SnbtValue::Number(value)
    }
}

impl From<Vec<SnbtValue>> for SnbtValue {
    fn from(items: Vec<SnbtValue>) -> Self {
        SnbtValue::List(items)
    }
}

impl From<IndexMap<String, SnbtValue>> for SnbtValue {
    fn from(map: IndexMap<String, SnbtValue>) -> Self {
        SnbtValue::Compound(map)
    }
}

impl<K: Into<String>> FromIterator<(K, SnbtValue)> for SnbtValue {
    fn from_iter<I: IntoIterator<Item = (K, SnbtValue)>>(iter: I) -> Self {
        SnbtValue::Compound(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
