//! # confcheck-core: Foundational Types for confcheck
//!
//! Every other crate in the workspace depends on `confcheck-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One document model.** JSON and YAML files both parse into a
//!    [`ConfigDocument`] holding a `serde_json::Value` tree, so semantic
//!    checks never care which syntax a file was written in.
//!
//! 2. **Parsers are injected capabilities.** Parsing goes through the
//!    [`DocumentParser`] trait and a [`ParserRegistry`]. A missing YAML parser
//!    is a construction-time [`CheckError::Configuration`], never a deferred
//!    import failure halfway through a run.
//!
//! 3. **One error hierarchy.** [`CheckError`] covers parse failures, missing
//!    capabilities, missing entries, and invariant violations. All are fatal.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `confcheck-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod parser;

pub use document::{load_document, load_document_as, ConfigDocument, DocumentFormat};
pub use error::CheckError;
pub use parser::{DocumentParser, JsonParser, ParserRegistry};

#[cfg(feature = "yaml")]
pub use parser::YamlParser;
