//! Finding the token under a cursor.
//!
//! All positions are character offsets into a single line.

/// Whether `c` ends an identifier during scanning.
#[must_use]
pub fn is_boundary(c: char) -> bool {
	c.is_whitespace()
		|| matches!(
			c,
			'(' | ')' | '{' | '}' | ':' | '[' | ']' | ',' | '+' | '-' | '/' | '*' | '<' | '>' | '^'
				| '"'
		)
}

/// Returns the first offset of the token containing `position`.
///
/// If no boundary precedes `position` on the line, `position` itself is
/// returned rather than zero.
#[must_use]
pub fn start_at(line: &str, position: usize) -> usize {
	let chars = line.chars().collect::<Vec<_>>();

	chars[..position.min(chars.len())]
		.iter()
		.rposition(|c| is_boundary(*c))
		.map_or(position, |i| i + 1)
}

/// Returns the last offset (inclusive) of the token containing `position`.
///
/// If no boundary follows `position` on the line, `position` itself is
/// returned rather than the line's last offset.
#[must_use]
pub fn end_at(line: &str, position: usize) -> usize {
	let chars = line.chars().collect::<Vec<_>>();

	for i in position.saturating_add(1)..chars.len() {
		if is_boundary(chars[i]) {
			return i - 1;
		}
	}

	position
}

/// Reconstructs the text of the token under `position`.
///
/// A quote that stops the scan in either direction is kept, so the inside of a
/// string literal comes back with its quotes attached.
#[must_use]
pub fn symbol_at(line: &str, position: usize) -> String {
	let chars = line.chars().collect::<Vec<_>>();
	let position = position.min(chars.len());

	let mut forward = String::new();

	for &c in &chars[position..] {
		if is_boundary(c) {
			if c == '"' {
				forward.push(c);
			}

			break;
		}

		forward.push(c);
	}

	let mut backward = String::new();

	for &c in chars[..position].iter().rev() {
		if is_boundary(c) {
			if c == '"' {
				backward.push(c);
			}

			break;
		}

		backward.push(c);
	}

	let mut ret = backward.chars().rev().collect::<String>();
	ret.push_str(&forward);
	ret.trim().to_string()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn bounds_inside_token() {
		const LINE: &str = "a + bcd - e";

		for pos in 4..=6 {
			let start = start_at(LINE, pos);
			let end = end_at(LINE, pos);
			assert_eq!((start, end), (4, 6), "cursor at {pos}");

			let token = LINE.chars().skip(start).take(end - start + 1).collect::<String>();
			assert_eq!(token, "bcd");
		}
	}

	#[test]
	fn bounds_without_boundary() {
		// Nothing before or after: both scans fall back to the cursor itself.
		assert_eq!(start_at("abc", 2), 2);
		assert_eq!(end_at("abc", 0), 0);
		assert_eq!(start_at("", 0), 0);
		assert_eq!(end_at("", 5), 5);
	}

	#[test]
	fn bounds_far_past_line_end() {
		assert_eq!(start_at("abc", usize::MAX), usize::MAX);
		assert_eq!(end_at("abc", usize::MAX), usize::MAX);
		assert_eq!(start_at("a b", 1_000_000), 2);
	}

	#[test]
	fn boundary_set() {
		for c in [
			' ', '\t', '(', ')', '{', '}', ':', '[', ']', ',', '+', '-', '/', '*', '<', '>', '^',
			'"',
		] {
			assert!(is_boundary(c), "{c:?} should be a boundary");
		}

		for c in ['|', '.', '_', '=', '&', '$', '%', '~', '@', '?', '!', 'a', '0'] {
			assert!(!is_boundary(c), "{c:?} should not be a boundary");
		}
	}

	#[test]
	fn bounds_with_operators() {
		const LINE: &str = "$x := ($count*2)";
		// `$count` spans 7..=12.
		assert_eq!(start_at(LINE, 9), 7);
		assert_eq!(end_at(LINE, 9), 12);
	}

	#[test]
	fn symbol_plain() {
		assert_eq!(symbol_at("  play_note($note, 100, 0, -1)", 5), "play_note");
		assert_eq!(symbol_at("declare %vol[4]", 9), "%vol");
	}

	#[test]
	fn symbol_quoted() {
		const LINE: &str = "message(\"hi\")";
		let ret = symbol_at(LINE, 9);
		assert_eq!(ret, "\"hi\"");
	}

	#[test]
	fn symbol_on_boundary() {
		assert_eq!(symbol_at("message(x)", 7), "message");
		assert_eq!(symbol_at("a  b", 2), "");
		assert_eq!(symbol_at("abc", 10), "abc");
	}
}
