//! Conversions between this crate's character columns and LSP's UTF-16 ones.

use ksp_ls::{
	text::{char_to_utf16, utf16_to_char},
	Document, LineCol, LineRange, TextSource,
};

#[must_use]
pub(crate) fn make_position(doc: &Document, lc: LineCol) -> lsp_types::Position {
	let line = doc.line_text(lc.line as usize);

	lsp_types::Position {
		line: lc.line,
		character: char_to_utf16(line, lc.col),
	}
}

#[must_use]
pub(crate) fn make_range(doc: &Document, range: LineRange) -> lsp_types::Range {
	lsp_types::Range {
		start: make_position(doc, range.start),
		end: make_position(doc, range.end),
	}
}

/// Clamps columns past the end of the line.
#[must_use]
pub(crate) fn line_col(doc: &Document, pos: lsp_types::Position) -> LineCol {
	let line = doc.line_text(pos.line as usize);
	LineCol::new(pos.line, utf16_to_char(line, pos.character))
}
