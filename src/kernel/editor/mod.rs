//! Editor domain: documents, indentation and highlighting, no terminal IO.

pub mod document;
pub mod indent;
pub mod syntax;

pub use document::{Document, DocumentId};
pub use indent::{line_shift, needed_indent, reindent_line, LineShift};
pub use syntax::{HighlightKind, HighlightSpan, SyntaxDocument};
