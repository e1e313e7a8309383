//! # vparcheck - unbound-parameter lint for Verilog instantiations
//!
//! Statically finds module instantiations that leave declared parameters
//! unbound, working purely on a token stream (no syntax tree). The trade is
//! deliberate: it can miss parameters declared out of line and can be fooled
//! by indirect overrides, in exchange for being fast and simple across large
//! source trees.
//!
//! vparcheck provides:
//! - A restartable hand-rolled lexer for the relevant Verilog subset
//! - A module registry that reconciles incompatible redefinitions instead of
//!   failing on them
//! - A two-pass binding checker: definitions first, then every
//!   instantiation against the frozen registry

pub mod analyze;
pub mod checker;
pub mod config;
pub mod filelist;
pub mod group;
pub mod lexer;
pub mod registry;
pub mod report;
pub mod token;

// Re-exports for convenient access
pub use analyze::{analyze, AnalyzeOptions};
pub use checker::BindingChecker;
pub use lexer::Lexer;
pub use registry::{ModuleEntry, ModuleRegistry, ParamSlot};
pub use report::{Diagnostic, Finding, Report};
pub use token::{Keyword, Punct, Token, TokenKind};

/// Result type alias for vparcheck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for vparcheck operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read file list {path}: {source}")]
    Filelist {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("invalid exclude pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("directory walk failed: {0}")]
    Walk(#[from] ignore::Error),
}
