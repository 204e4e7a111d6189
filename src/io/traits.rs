/// IO 抽象层 - trait 定义
///
/// 文档的读取与写入接口。实现需要可跨线程共享，以便并行读取。

use std::path::Path;
use crate::utils::QuestError;

/// 文档读取 trait
///
/// # 职责
/// - 从存储中读取文档的原始字节
/// - 不负责解码和解析，仅负责 IO
pub trait DocumentReader: Send + Sync {
    /// 读取文档的原始字节
    ///
    /// # 参数
    /// * `path` - 文档路径
    fn read(&self, path: &Path) -> Result<Vec<u8>, QuestError>;
}

/// 文档写入 trait
///
/// # 职责
/// - 将已编码的文本写入存储
/// - 需要时创建父目录
pub trait DocumentWriter: Send + Sync {
    /// 写入文档
    ///
    /// # 参数
    /// * `path` - 目标路径
    /// * `content` - 文档文本（UTF-8）
    fn write(&self, path: &Path, content: &str) -> Result<(), QuestError>;
}
