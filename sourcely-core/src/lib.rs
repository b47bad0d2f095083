pub mod code;
pub mod context;
pub mod error;
pub mod i18n;
pub mod lang;
pub mod storage;
pub mod utils;
pub mod yaml;

pub use code::Code;
pub use context::LanguageContext;
pub use error::Error;
pub use i18n::Translator;
pub use lang::{DEFAULT_LANG, Lang};
pub use storage::{ClientStorage, FileStorage, MemoryStorage, StorageError};

// 重导出给 i18n_assets! 宏使用
pub use ctor;
