//! Line-oriented views over source text.
//!
//! Every column in this crate is a character (Unicode scalar value) offset
//! into a single line. Conversion to and from the UTF-16 columns that LSP
//! clients speak happens at the edges via [`utf16_to_char`] and
//! [`char_to_utf16`].

/// Random access to the lines of a document.
pub trait TextSource {
	#[must_use]
	fn line_count(&self) -> usize;

	/// Returns the text of line `line` without its terminator, or an empty
	/// string if `line` is out of range.
	#[must_use]
	fn line_text(&self, line: usize) -> &str;
}

impl<S: AsRef<str>> TextSource for [S] {
	fn line_count(&self) -> usize {
		self.len()
	}

	fn line_text(&self, line: usize) -> &str {
		self.get(line).map_or("", |s| s.as_ref())
	}
}

impl<S: AsRef<str>> TextSource for Vec<S> {
	fn line_count(&self) -> usize {
		self.len()
	}

	fn line_text(&self, line: usize) -> &str {
		self.as_slice().line_text(line)
	}
}

/// `(line, column)` information. Both zero-based; `col` counts characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
	pub line: u32,
	pub col: u32,
}

impl LineCol {
	#[must_use]
	pub fn new(line: u32, col: u32) -> Self {
		Self { line, col }
	}
}

/// `start` comes before `end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LineRange {
	pub start: LineCol,
	pub end: LineCol,
}

impl LineRange {
	#[must_use]
	pub fn new(start: LineCol, end: LineCol) -> Self {
		Self { start, end }
	}
}

/// An owned text snapshot with precomputed line starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
	text: String,
	/// Byte offset of the beginning of each line except the first.
	newlines: Box<[usize]>,
}

impl Document {
	#[must_use]
	pub fn new(text: impl Into<String>) -> Self {
		let text = text.into();

		let newlines = text
			.bytes()
			.enumerate()
			.filter_map(|(i, b)| (b == b'\n').then_some(i + 1))
			.collect::<Vec<_>>()
			.into_boxed_slice();

		Self { text, newlines }
	}

	#[must_use]
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Like [`TextSource::line_text`], but distinguishes a missing line.
	#[must_use]
	pub fn line(&self, line: usize) -> Option<&str> {
		let start = match line.checked_sub(1) {
			None => 0,
			Some(prev) => *self.newlines.get(prev)?,
		};

		let end = match self.newlines.get(line) {
			Some(next) => next - 1,
			None => self.text.len(),
		};

		let ret = &self.text[start..end];
		Some(ret.strip_suffix('\r').unwrap_or(ret))
	}
}

impl TextSource for Document {
	fn line_count(&self) -> usize {
		self.newlines.len() + 1
	}

	fn line_text(&self, line: usize) -> &str {
		self.line(line).unwrap_or("")
	}
}

/// Converts a UTF-16 column into a character column on `line`.
/// Columns past the end of the line are clamped to the line's length.
#[must_use]
pub fn utf16_to_char(line: &str, col: u32) -> u32 {
	let mut units = 0;

	for (i, c) in line.chars().enumerate() {
		if units >= col {
			return i as u32;
		}

		units += c.len_utf16() as u32;
	}

	line.chars().count() as u32
}

/// Converts a character column on `line` into a UTF-16 column.
#[must_use]
pub fn char_to_utf16(line: &str, col: u32) -> u32 {
	line.chars()
		.take(col as usize)
		.map(|c| c.len_utf16() as u32)
		.sum()
}

/// The length of `line` in characters.
#[must_use]
pub fn char_len(line: &str) -> u32 {
	line.chars().count() as u32
}
