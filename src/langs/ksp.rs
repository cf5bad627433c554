//! Request handling for the Kontakt Script Processor language.

pub(crate) mod completion;
pub(crate) mod docsymbols;
pub(crate) mod goto;
pub(crate) mod hover;
pub(crate) mod native;

use ksp_ls::{scan, Document, LineCol, LineRange};

/// The token touching a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CursorToken {
	/// Includes surrounding quotes if the cursor is inside a string literal.
	pub(crate) text: String,
	/// Exclusive of quotes.
	pub(crate) range: LineRange,
}

/// Returns `None` if there is no token at `pos`.
///
/// A cursor sitting just past the end of a token (e.g. before an opening
/// parenthesis) is treated as being on that token.
#[must_use]
pub(crate) fn token_at(doc: &Document, pos: LineCol) -> Option<CursorToken> {
	let line = doc.line(pos.line as usize)?;
	let chars = line.chars().collect::<Vec<_>>();
	let mut col = pos.col as usize;

	let on_token = |i: usize| chars.get(i).is_some_and(|c| !scan::is_boundary(*c));

	if !on_token(col) {
		if col > 0 && on_token(col - 1) {
			col -= 1;
		} else {
			return None;
		}
	}

	let mut start = scan::start_at(line, col);
	let mut end = scan::end_at(line, col);

	// The scanners fall back to the cursor itself when they run into either
	// end of the line rather than a boundary.
	if start == col && col > 0 && on_token(col - 1) {
		start = 0;
	}

	if end == col && on_token(col + 1) {
		end = chars.len() - 1;
	}

	let text = scan::symbol_at(line, col);

	if text.is_empty() {
		return None;
	}

	Some(CursorToken {
		text,
		range: LineRange::new(
			LineCol::new(pos.line, start as u32),
			LineCol::new(pos.line, end as u32 + 1),
		),
	})
}

/// Whether `text` is something a symbol lookup could resolve.
#[must_use]
pub(crate) fn is_identifier(text: &str) -> bool {
	!text.starts_with('"')
		&& text
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '_' || "$~@%?!".contains(c))
}

#[cfg(test)]
mod test {
	use super::*;

	#[must_use]
	fn token(line: &str, col: u32) -> Option<(String, u32, u32)> {
		let doc = Document::new(line);
		token_at(&doc, LineCol::new(0, col)).map(|t| (t.text, t.range.start.col, t.range.end.col))
	}

	#[test]
	fn inside_tokens() {
		assert_eq!(
			token("  play_note($EVENT_NOTE, 100, 0, -1)", 4),
			Some(("play_note".to_string(), 2, 11))
		);

		assert_eq!(
			token("  play_note($EVENT_NOTE, 100, 0, -1)", 14),
			Some(("$EVENT_NOTE".to_string(), 12, 23))
		);
	}

	#[test]
	fn token_at_line_edges() {
		// No boundary before or after; the whole line is the token.
		assert_eq!(token("exit", 2), Some(("exit".to_string(), 0, 4)));
		assert_eq!(token("exit", 4), Some(("exit".to_string(), 0, 4)));
	}

	#[test]
	fn no_token() {
		assert_eq!(token("a  +  b", 3), None);
		assert_eq!(token("", 0), None);
		assert!(Document::new("x").line(3).is_none());
		assert_eq!(token_at(&Document::new("x"), LineCol::new(3, 0)), None);
	}

	#[test]
	fn identifiers() {
		assert!(is_identifier("$EVENT_NOTE"));
		assert!(is_identifier("play_note"));
		assert!(!is_identifier("\"hi\""));
		assert!(!is_identifier("a.b"));
	}
}
