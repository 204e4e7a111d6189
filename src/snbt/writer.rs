use std::fmt::Write;

use super::value::{SnbtNumber, SnbtValue};
use super::SnbtFlags;

/// 将文档树写出为 SNBT 文本
///
/// `PRETTY` 模式下使用制表符缩进，并以换行结尾
pub fn stringify(value: &SnbtValue, flags: SnbtFlags) -> String {
    let mut writer = Writer {
        out: String::new(),
        flags,
    };
    writer.write_value(value, 0);

    if flags.contains(SnbtFlags::PRETTY) {
        writer.out.push('\n');
    }
    writer.out
}

/// 键是否可以不加引号写出
fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}

struct Writer {
    out: String,
    flags: SnbtFlags,
}

impl Writer {
    fn pretty(&self) -> bool {
        self.flags.contains(SnbtFlags::PRETTY)
    }

    /// 单行模式下元素之间的分隔符
    fn item_separator(&self) -> &'static str {
        if self.pretty() {
            ", "
        } else {
            ","
        }
    }

    /// 多行模式下条目之间的分隔符
    fn line_separator(&self, is_last: bool) -> &'static str {
        if is_last || self.flags.contains(SnbtFlags::SKIP_COMMA) {
            ""
        } else {
            ","
        }
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push('\t');
        }
    }

    fn write_value(&mut self, value: &SnbtValue, depth: usize) {
        match value {
            SnbtValue::String(text) => self.write_string(text),
            SnbtValue::Number(number) => self.write_number(number),
            SnbtValue::Bool(flag) => {
                if self.flags.contains(SnbtFlags::USE_BOOLEAN) {
                    self.out.push_str(if *flag { "true" } else { "false" });
                } else {
                    self.out.push_str(if *flag { "1b" } else { "0b" });
                }
            }
            SnbtValue::List(items) => self.write_list(items, depth),
            SnbtValue::TypedArray(array_type, items) => {
                self.out.push('[');
                self.out.push(array_type.to_char());
                self.out.push(';');
                if self.pretty() && !items.is_empty() {
                    self.out.push(' ');
                }
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        let separator = self.item_separator();
                        self.out.push_str(separator);
                    }
                    self.write_number(item);
                }
                self.out.push(']');
            }
            SnbtValue::Compound(map) => {
                if map.is_empty() {
                    let empty = if self.pretty() { "{ }" } else { "{}" };
                    self.out.push_str(empty);
                    return;
                }

                if !self.pretty() {
                    self.out.push('{');
                    for (i, (key, item)) in map.iter().enumerate() {
                        if i > 0 {
                            self.out.push(',');
                        }
                        self.write_key(key);
                        self.out.push(':');
                        self.write_value(item, depth);
                    }
                    self.out.push('}');
                    return;
                }

                self.out.push_str("{\n");
                let last = map.len() - 1;
                for (i, (key, item)) in map.iter().enumerate() {
                    self.indent(depth + 1);
                    self.write_key(key);
                    self.out.push_str(": ");
                    self.write_value(item, depth + 1);
                    let separator = self.line_separator(i == last);
                    self.out.push_str(separator);
                    self.out.push('\n');
                }
                self.indent(depth);
                self.out.push('}');
            }
        }
    }

    fn write_list(&mut self, items: &[SnbtValue], depth: usize) {
        if items.is_empty() {
            let empty = if self.pretty() { "[ ]" } else { "[]" };
            self.out.push_str(empty);
            return;
        }

        // 纯数字/布尔列表写在同一行
        if !self.pretty() || items.iter().all(SnbtValue::is_primitive) {
            self.out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    let separator = self.item_separator();
                    self.out.push_str(separator);
                }
                self.write_value(item, depth);
            }
            self.out.push(']');
            return;
        }

        self.out.push_str("[\n");
        let last = items.len() - 1;
        for (i, item) in items.iter().enumerate() {
            self.indent(depth + 1);
            self.write_value(item, depth + 1);
            let separator = self.line_separator(i == last);
            self.out.push_str(separator);
            self.out.push('\n');
        }
        self.indent(depth);
        self.out.push(']');
    }

    fn write_number(&mut self, number: &SnbtNumber) {
        if self.flags.contains(SnbtFlags::TYPE_POSTFIX) {
            let _ = write!(self.out, "{}", number);
        } else {
            self.out.push_str(&number.literal);
        }
    }

    fn write_key(&mut self, key: &str) {
        if is_bare_key(key) {
            self.out.push_str(key);
        } else {
            self.write_string(key);
        }
    }

    fn write_string(&mut self, text: &str) {
        self.out.push('"');
        for c in text.chars() {
            match c {
                '\\' => self.out.push_str("\\\\"),
                '"' => self.out.push_str("\\\""),
                '\n' => self.out.push_str("\\n"),
                '\t' => self.out.push_str("\\t"),
                '\r' => self.out.push_str("\\r"),
                _ => self.out.push(c),
            }
        }
        self.out.push('"');
    }
}
