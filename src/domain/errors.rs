//! Domain Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("不支持的语言: {0}")]
    Unsupported(String),
}
