/// IO 抽象层模块
///
/// 该模块提供了文档读写的抽象接口，提取流程只依赖 trait，
/// 便于在测试中注入内存实现或模拟写入失败。
///
/// # 架构设计
///
/// - **traits**: 定义 DocumentReader/DocumentWriter trait 接口
/// - **snbt_io**: 基于文件系统的默认实现
///
/// # 使用示例
///
/// ```rust,ignore
/// use quest_extractor::io::{DefaultDocumentReader, DocumentReader};
///
/// let reader = DefaultDocumentReader;
/// let data = reader.read(Path::new("quests/chapters/intro.snbt"))?;
/// ```
pub mod traits;
pub mod snbt_io;

// === 导出 trait 定义 ===
pub use traits::{DocumentReader, DocumentWriter};

// === 导出默认实现 ===
pub use snbt_io::{DefaultDocumentReader, DefaultDocumentWriter};
