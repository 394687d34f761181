//! # confcheck-syntax: Config File Syntax Validation
//!
//! Confirms that every config file in a directory parses under the format
//! its extension declares. By default the `*.json` and `*.yml` files directly
//! inside the directory are checked; subdirectories are not descended into.
//!
//! - [`discover`]: non-recursive, sorted file discovery by extension.
//! - [`SyntaxValidator::validate_dir`]: parses each discovered file and
//!   stops at the first failure.
//!
//! ## Crate Policy
//!
//! - Depends only on `confcheck-core` internally.
//! - Never mutates the files it checks.
//! - Parser capabilities are resolved when the validator is built, so a
//!   missing YAML parser fails before any file is read.

pub mod discover;
pub mod validate;

pub use discover::{discover, DEFAULT_EXTENSIONS};
pub use validate::{CheckedFile, SyntaxReport, SyntaxValidator};
