//! Syntax layer for the declaration dialect.
//!
//! [`scanner::ScannerState`] turns source text into tokens,
//! [`parser::parse_source_file`] builds an arena AST out of them, and
//! [`arena::SyntaxArena`] owns the nodes. Parsing never fails; syntax
//! errors surface as [`declc_common::Diagnostic`] values alongside a
//! best-effort tree.

pub mod arena;
pub mod kind;
pub mod node;
pub mod parser;
pub mod scanner;

pub use arena::SyntaxArena;
pub use kind::SyntaxKind;
pub use node::{ModifierFlags, Node, NodeIndex, NodeList};
pub use parser::{ParseResult, ParserState, parse_source_file};
pub use scanner::{ScanError, ScannerState};
