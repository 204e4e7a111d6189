pub mod config;
pub mod document;
pub mod extractor;
pub mod io;
pub mod key_path;
pub mod scanner;
pub mod snbt;
pub mod table;
pub mod utils;
pub mod walker;

// 重新导出主要结构
pub use config::{CollisionPolicy, ExtractConfig, ScriptRange, TableFormat};
pub use document::{process_document, ProcessedDocument, SourceText};
pub use extractor::{DocumentFailure, FailureStage, QuestExtractor, RunReport};
pub use key_path::{ContextPath, PathSegment};
pub use snbt::{SnbtFlags, SnbtValue};
pub use table::{Collision, TranslationEntry, TranslationTable};
pub use utils::{contains_script, QuestError};
pub use walker::PlaceholderRewriter;
