use indexmap::IndexMap;

use super::value::{ArrayType, NumberSuffix, SnbtNumber, SnbtValue};
use super::SnbtFlags;
use crate::utils::QuestError;

/// 解析 SNBT 文本
///
/// 根节点之后只允许出现空白字符
pub fn parse(text: &str, flags: SnbtFlags) -> Result<SnbtValue, QuestError> {
    let mut parser = Parser::new(text, flags);
    parser.skip_whitespace();
    let value = parser.parse_value()?;
    parser.skip_whitespace();

    if parser.peek().is_some() {
        return Err(parser.error("根节点之后存在多余内容"));
    }

    Ok(value)
}

/// 未加引号的记号允许的字符
fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    flags: SnbtFlags,
}

impl Parser {
    fn new(text: &str, flags: SnbtFlags) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            flags,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    /// 在当前位置生成带行列号的错误
    fn error(&self, message: impl Into<String>) -> QuestError {
        let consumed = &self.chars[..self.pos.min(self.chars.len())];
        let line = consumed.iter().filter(|&&c| c == '\n').count() + 1;
        let column = consumed.iter().rev().take_while(|&&c| c != '\n').count() + 1;

        QuestError::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), QuestError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.error(format!("期望 '{}'，实际为 '{}'", expected, c))),
            None => Err(self.error(format!("期望 '{}'，但文本已结束", expected))),
        }
    }

    fn parse_value(&mut self) -> Result<SnbtValue, QuestError> {
        match self.peek() {
            Some('{') => self.parse_compound(),
            Some('[') => self.parse_list(),
            Some('"') | Some('\'') => Ok(SnbtValue::String(self.parse_quoted()?)),
            Some(c) if is_bare_char(c) => {
                let token = self.parse_bare();
                Ok(self.classify_bare(token))
            }
            Some(c) => Err(self.error(format!("意外的字符 '{}'", c))),
            None => Err(self.error("期望一个值，但文本已结束")),
        }
    }

    /// 将未加引号的记号归类为布尔值、数字或字符串
    fn classify_bare(&self, token: String) -> SnbtValue {
        match token.as_str() {
            "true" | "false" => {
                let value = token == "true";
                if self.flags.contains(SnbtFlags::USE_BOOLEAN) {
                    SnbtValue::Bool(value)
                } else {
                    SnbtValue::Number(SnbtNumber::with_suffix(
                        if value { "1" } else { "0" },
                        NumberSuffix::Byte,
                    ))
                }
            }
            _ => match SnbtNumber::parse_token(&token) {
                Some(number) => SnbtValue::Number(number),
                None => SnbtValue::String(token),
            },
        }
    }

    fn parse_bare(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_bare_char(c)) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn parse_quoted(&mut self) -> Result<String, QuestError> {
        let quote = match self.next() {
            Some(q) => q,
            None => return Err(self.error("期望字符串")),
        };
        let mut result = String::new();

        loop {
            match self.next() {
                Some('\\') => match self.next() {
                    Some('n') => result.push('\n'),
                    Some('t') => result.push('\t'),
                    Some('r') => result.push('\r'),
                    Some(c @ ('\\' | '"' | '\'')) => result.push(c),
                    // 未知转义原样保留
                    Some(c) => {
                        result.push('\\');
                        result.push(c);
                    }
                    None => return Err(self.error("字符串未结束")),
                },
                Some(c) if c == quote => return Ok(result),
                Some(c) => result.push(c),
                None => return Err(self.error("字符串未结束")),
            }
        }
    }

    fn parse_key(&mut self) -> Result<String, QuestError> {
        match self.peek() {
            Some('"') | Some('\'') => self.parse_quoted(),
            Some(c) if is_bare_char(c) => Ok(self.parse_bare()),
            Some(c) => Err(self.error(format!("无效的键起始字符 '{}'", c))),
            None => Err(self.error("期望键，但文本已结束")),
        }
    }

    /// 处理条目之间的分隔符，容器结束符留给调用方消费
    fn parse_separator(&mut self, close: char) -> Result<(), QuestError> {
        self.skip_whitespace();
        match self.peek() {
            Some(',') => {
                self.pos += 1;
                Ok(())
            }
            Some(c) if c == close => Ok(()),
            Some(_) if self.flags.contains(SnbtFlags::SKIP_COMMA) => Ok(()),
            Some(c) => Err(self.error(format!("期望 ',' 或 '{}'，实际为 '{}'", close, c))),
            None => Err(self.error(format!("容器未结束，缺少 '{}'", close))),
        }
    }

    fn parse_compound(&mut self) -> Result<SnbtValue, QuestError> {
        self.expect('{')?;
        let mut map = IndexMap::new();

        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(SnbtValue::Compound(map));
            }

            let key = self.parse_key()?;
            self.skip_whitespace();
            self.expect(':')?;
            self.skip_whitespace();
            let value = self.parse_value()?;
            map.insert(key, value);

            self.parse_separator('}')?;
        }
    }

    fn parse_list(&mut self) -> Result<SnbtValue, QuestError> {
        self.expect('[')?;

        if let (Some(c), Some(';')) = (self.peek(), self.peek_at(1)) {
            if let Some(array_type) = ArrayType::from_char(c) {
                self.pos += 2;
                return self.parse_typed_array(array_type);
            }
        }

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(']') {
                self.pos += 1;
                return Ok(SnbtValue::List(items));
            }

            items.push(self.parse_value()?);
            self.parse_separator(']')?;
        }
    }

    fn parse_typed_array(&mut self, array_type: ArrayType) -> Result<SnbtValue, QuestError> {
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            if self.peek() == Some(']') {
                self.pos += 1;
                return Ok(SnbtValue::TypedArray(array_type, items));
            }

            let token = self.parse_bare();
            match SnbtNumber::parse_token(&token) {
                Some(number) => items.push(number),
                None if token.is_empty() => {
                    return Err(self.error("类型化数组中期望数字"));
                }
                None => {
                    return Err(self.error(format!("类型化数组中的无效数字 '{}'", token)));
                }
            }

            self.parse_separator(']')?;
        }
    }
}
