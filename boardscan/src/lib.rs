//! Boardscan - KiCad PCB board file parser
//!
//! This library ingests `.kicad_pcb` files into a fully cross-referenced
//! [`Board`] model: layer stack, nets, footprints with their properties,
//! outline lines, pads and 3-D model reference, copper tracks and
//! copper-pour zones. Layer and net references are resolved against the
//! entities declared earlier in the file; anything unresolvable is kept as
//! an explicit unresolved marker.
//!
//! Parsing is best-effort: malformed groups are skipped, fields
//! that fail to parse fall back to defaults, and diagnostics go out
//! through `tracing`. The only fatal error is failing to read the input
//! file. Callers that need strict validation inspect the returned model.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! let board = boardscan::load_board(Path::new("design.kicad_pcb")).unwrap();
//!
//! for net in &board.nets {
//!     println!("net {}: {}", net.ordinal, net.name);
//! }
//! for footprint in &board.footprints {
//!     println!("{} with {} pads", footprint.library_link, footprint.pads.len());
//! }
//! ```
//!
//! # Features
//!
//! - **Layer stack**: logical layer table plus physical stackup data,
//!   including synthetic dielectric spacers
//! - **Cross references**: pad/track/zone layers and nets resolved while
//!   parsing, declare-before-use
//! - **Robust input handling**: unbalanced groups, unterminated strings
//!   and over-deep nesting degrade locally, never fatally

pub mod parser;

// Re-export main types
pub use parser::board::{BoardFileError, BoardParser};
pub use parser::schema::{
    Arc, Board, Footprint, FootprintProperty, General, Header, Layer, LayerId, LayerRef,
    LayerType, Model3d, Net, NetId, NetRef, OutlineLine, Pad, PadShape, PadType, Page, Placement,
    Point, SectionIndex, SectionState, Segment, Setup, Size2D, StackupInfo, Track, Via, Xyz, Zone,
};
pub use parser::sexp::{SExp, SExpReader, Span, SyntaxError};

/// Parse board file contents (convenience wrapper). Never fails; see
/// [`BoardParser::parse_str`].
pub fn parse_board(input: &str) -> Board {
    BoardParser::parse_str(input)
}

/// Read and parse a board file (convenience wrapper). I/O failure is the
/// only error.
pub fn load_board(path: &std::path::Path) -> Result<Board, BoardFileError> {
    BoardParser::parse_file(path)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Board, BoardFileError, BoardParser, Footprint, Layer, LayerRef, Net, NetRef, Pad, Track,
        Zone,
    };
}
