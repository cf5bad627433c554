//! # KSP-LS Core
//!
//! Symbol extraction for Kontakt Script Processor (KSP) source, in a separate
//! library so that the scanners can be used and tested without a language
//! server attached.
//!
//! - [`collect`] finds variable, callback, and function declarations.
//! - [`scan`] finds the token under a cursor.
//! - [`symbol`] is the data model both produce and consume.
//! - [`text`] abstracts over where lines come from.

pub mod collect;
pub mod scan;
pub mod symbol;
pub mod text;

pub use self::{
	collect::{collect, lookup},
	scan::{end_at, start_at, symbol_at},
	symbol::{SymbolAttributes, SymbolKind, SymbolRecord},
	text::{Document, LineCol, LineRange, TextSource},
};
