//! SNBT 文本编解码模块
//!
//! 负责 FTB Quests 使用的 SNBT（字符串化 NBT）格式与 [`SnbtValue`] 文档树之间的转换：
//! - **parser**: 文本 → 文档树
//! - **writer**: 文档树 → 规范化文本

mod parser;
mod value;
mod writer;


pub use parser::parse;
pub use value::{ArrayType, NumberSuffix, SnbtNumber, SnbtValue};
pub use writer::stringify;

bitflags::bitflags! {
    /// SNBT 编解码选项
    #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
    pub struct SnbtFlags: u8 {
        /// 条目之间允许（写出时使用）换行代替逗号
        const SKIP_COMMA = 0x01;
        /// `true`/`false` 解析为布尔值，写出时保持字面量
        const USE_BOOLEAN = 0x02;
        /// 写出数字时保留类型后缀
        const TYPE_POSTFIX = 0x04;
        /// 多行缩进输出
        const PRETTY = 0x08;
    }
}

impl Default for SnbtFlags {
    /// FTB Quests 文件使用的格式
    fn default() -> Self {
        SnbtFlags::all()
    }
}
