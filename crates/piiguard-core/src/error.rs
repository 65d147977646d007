//! 错误类型（对外暴露）
//!
//! - `RegistryError`：规则表构建期错误，仅在启动时出现，扫描期不会产生。
//! - `SourceError`：文本来源不可用。与“未发现敏感信息”严格区分，调用方据此提示
//!   “无法检查该文档”，而不是暗示文档是干净的。
use std::path::PathBuf;
use thiserror::Error;

/// 规则表构建错误
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("rule `{category}` has a malformed pattern")]
    MalformedRule {
        category: String,
        #[source]
        source: regex::Error,
    },

    #[error("category `{0}` is defined more than once")]
    DuplicateCategory(String),

    #[error("rule with empty category name")]
    EmptyCategory,

    #[error("failed to read rule file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rule file")]
    Parse(#[from] toml::de::Error),
}

/// 文本来源不可用（SourceUnavailable）
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not read {origin}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{origin} is {size} bytes, over the {max} byte limit")]
    TooLarge { origin: String, size: u64, max: u64 },

    #[error("{origin} does not look like text")]
    Binary { origin: String },
}

impl SourceError {
    /// 出错来源的描述（路径或 `<stdin>` 等）
    pub fn origin(&self) -> &str {
        match self {
            SourceError::Io { origin, .. } => origin,
            SourceError::TooLarge { origin, .. } => origin,
            SourceError::Binary { origin } => origin,
        }
    }
}
