pub mod board;
pub mod schema;
pub mod sexp;

// Re-export for convenience
pub use board::{BoardFileError, BoardParser};
pub use schema::*;
pub use sexp::{SExp, SExpReader, Span, SyntaxError};
