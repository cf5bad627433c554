//! Line-by-line declaration scanning.
//!
//! Each line is tried against three grammars in a fixed order (variable
//! declaration, callback, user function) and the first match wins. Nothing
//! spans lines, and comments are not stripped.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::{
	symbol::{split_sigil, SymbolAttributes, SymbolKind, SymbolRecord, UI_CALLBACK_PREFIX},
	text::{self, LineCol, LineRange, TextSource},
};

/// Keys are sigiled UI control names; values are their `ui_*` keywords.
type UiControls = FxHashMap<String, String>;

/// Scans lines `0..end_line` of `source` (or every line, if `end_line` is `None`
/// or past the end) and returns every recognized declaration in line order.
#[must_use]
pub fn collect<S: TextSource + ?Sized>(source: &S, end_line: Option<usize>) -> Vec<SymbolRecord> {
	let count = end_line.map_or(source.line_count(), |e| e.min(source.line_count()));
	let mut ui_controls = UiControls::default();
	let mut ret = vec![];

	for i in 0..count {
		let text = source.line_text(i);
		let line = i as u32;

		if let Some(sym) = variable(text, line, &mut ui_controls) {
			ret.push(sym);
			continue;
		}

		if let Some(sym) = callback(text, line, &ui_controls) {
			ret.push(sym);
			continue;
		}

		if let Some(sym) = function(text, line) {
			ret.push(sym);
			continue;
		}
	}

	debug!("Collected {} symbols from {count} lines.", ret.len());
	ret
}

/// Finds the first record in `symbols` that `ident` refers to.
///
/// A sigiled identifier (`$count`) only matches a variable of that sigil's type.
/// A bare identifier prefers callbacks and user functions over variables.
#[must_use]
pub fn lookup<'s>(symbols: &'s [SymbolRecord], ident: &str) -> Option<&'s SymbolRecord> {
	if let Some((kind, name)) = split_sigil(ident) {
		return symbols
			.iter()
			.find(|sym| sym.kind() == kind && sym.name == name);
	}

	symbols
		.iter()
		.find(|sym| !sym.is_variable() && sym.name == ident)
		.or_else(|| {
			symbols
				.iter()
				.find(|sym| sym.is_variable() && sym.name == ident)
		})
}

// Grammars ////////////////////////////////////////////////////////////////////

fn variable(text: &str, line: u32, ui_controls: &mut UiControls) -> Option<SymbolRecord> {
	static RGX: OnceLock<Regex> = OnceLock::new();

	let rgx = RGX.get_or_init(|| {
		Regex::new(
			r"^\s*(declare)\s+(ui_[a-zA-Z0-9_]+|const|polyphonic)?\s*([$%~?@!][a-zA-Z0-9_]+)",
		)
		.unwrap()
	});

	let caps = rgx.captures(text)?;
	let qualifier = caps.get(2).map_or("", |m| m.as_str());
	let sigiled = caps.get(3)?.as_str();

	let is_const = qualifier == "const";
	let is_polyphonic = qualifier == "polyphonic";
	let is_ui = qualifier.starts_with("ui_");

	let mut chars = sigiled.chars();
	let sigil = chars.next()?;
	let name = chars.as_str();
	let kind = SymbolKind::from_sigil(sigil);

	let mut type_name = kind.type_name().to_string();

	let label = if is_const {
		"Constant Variable"
	} else if is_polyphonic {
		"Polyphonic Variable"
	} else if is_ui {
		type_name = qualifier.to_string();
		let _ = ui_controls.insert(sigiled.to_string(), type_name.clone());
		"UI Variable"
	} else {
		"Variable"
	};

	trace!("Variable declaration on line {line}: `{sigiled}` ({label}).");

	Some(make_record(
		text,
		line,
		&caps,
		sigiled,
		format!("{label} ({type_name})"),
		SymbolAttributes {
			name: name.to_string(),
			kind,
			type_name,
			is_const,
			is_polyphonic,
			is_ui,
			..Default::default()
		},
	))
}

fn callback(text: &str, line: u32, ui_controls: &UiControls) -> Option<SymbolRecord> {
	static RGX: OnceLock<Regex> = OnceLock::new();

	let rgx = RGX.get_or_init(|| {
		Regex::new(r"^\s*(on)\s+([a-zA-Z0-9_]+)(\s*\(\s*[^)]+\s*\))?").unwrap()
	});

	let caps = rgx.captures(text)?;
	let name = caps.get(2)?.as_str();
	let args = caps.get(3).map(|m| m.as_str());

	let mut attrs = SymbolAttributes {
		name: name.to_string(),
		kind: SymbolKind::Callback,
		..Default::default()
	};

	let label = match args {
		Some(args) if name.starts_with("ui_") => {
			let control = args.replacen('(', "", 1).replacen(')', "", 1);
			let control = control.trim();

			attrs.is_ui = true;
			attrs.ui_control_name = control.chars().skip(1).collect();

			if let Some(ui_type) = ui_controls.get(control) {
				attrs.ui_control_type = ui_type.clone();
			}

			format!("{UI_CALLBACK_PREFIX}{control}")
		}
		_ => "Callback".to_string(),
	};

	trace!("Callback declaration on line {line}: `{name}` ({label}).");

	Some(make_record(text, line, &caps, name, label, attrs))
}

fn function(text: &str, line: u32) -> Option<SymbolRecord> {
	static RGX: OnceLock<Regex> = OnceLock::new();

	let rgx = RGX.get_or_init(|| Regex::new(r"^\s*(function)\s+([a-zA-Z0-9_]+)").unwrap());

	let caps = rgx.captures(text)?;
	let name = caps.get(2)?.as_str();

	trace!("Function declaration on line {line}: `{name}`.");

	Some(make_record(
		text,
		line,
		&caps,
		name,
		"Function".to_string(),
		SymbolAttributes {
			name: name.to_string(),
			kind: SymbolKind::UserFunction,
			..Default::default()
		},
	))
}

/// Capture group 1 of `caps` must be the introducing keyword.
/// `ident` is located by its first occurrence anywhere on the line.
fn make_record(
	text: &str,
	line: u32,
	caps: &Captures,
	ident: &str,
	label: String,
	mut attrs: SymbolAttributes,
) -> SymbolRecord {
	let col = char_col(text, text.find(ident).unwrap_or(0));
	let kw_col = caps.get(1).map_or(0, |kw| char_col(text, kw.start()));
	let eol = LineCol::new(line, text::char_len(text));

	attrs.description = label.clone();
	attrs.line = line;
	attrs.col = col;

	SymbolRecord {
		name: attrs.name.clone(),
		container: label,
		location: LineCol::new(line, col),
		range: LineRange::new(LineCol::new(line, kw_col), eol),
		selection_range: LineRange::new(LineCol::new(line, col), eol),
		attrs,
	}
}

#[must_use]
fn char_col(text: &str, byte_offs: usize) -> u32 {
	text[..byte_offs].chars().count() as u32
}
