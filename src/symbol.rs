//! The symbol data model: kinds, the sigil table, and per-symbol records.

use std::ops::RangeInclusive;

use crate::text::{LineCol, LineRange};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolKind {
	#[default]
	Unknown,
	VariableInteger,
	VariableReal,
	VariableString,
	VariableIntegerArray,
	VariableRealArray,
	VariableStringArray,
	Callback,
	UserFunction,
}

/// Sigil, kind, and display name for every variable type.
/// All sigil lookups in either direction go through this table.
const SIGILS: &[(char, SymbolKind, &str)] = &[
	('$', SymbolKind::VariableInteger, "Integer"),
	('~', SymbolKind::VariableReal, "Real"),
	('@', SymbolKind::VariableString, "String"),
	('%', SymbolKind::VariableIntegerArray, "Integer Array"),
	('?', SymbolKind::VariableRealArray, "Real Array"),
	('!', SymbolKind::VariableStringArray, "String Array"),
];

const UNKNOWN_TYPE_NAME: &str = "Unknown";

impl SymbolKind {
	const VARIABLES: RangeInclusive<Self> = Self::VariableInteger..=Self::VariableStringArray;
	const ARRAYS: RangeInclusive<Self> = Self::VariableIntegerArray..=Self::VariableStringArray;

	/// Returns [`SymbolKind::Unknown`] for anything other than one of the six sigils.
	#[must_use]
	pub fn from_sigil(sigil: char) -> Self {
		SIGILS
			.iter()
			.find_map(|&(c, kind, _)| (c == sigil).then_some(kind))
			.unwrap_or_default()
	}

	/// `None` for every non-variable kind.
	#[must_use]
	pub fn sigil(self) -> Option<char> {
		SIGILS
			.iter()
			.find_map(|&(c, kind, _)| (kind == self).then_some(c))
	}

	/// The human-readable variable type, e.g. `"Integer Array"`.
	#[must_use]
	pub fn type_name(self) -> &'static str {
		SIGILS
			.iter()
			.find_map(|&(_, kind, name)| (kind == self).then_some(name))
			.unwrap_or(UNKNOWN_TYPE_NAME)
	}

	#[must_use]
	pub fn is_variable(self) -> bool {
		Self::VARIABLES.contains(&self)
	}

	#[must_use]
	pub fn is_array(self) -> bool {
		Self::ARRAYS.contains(&self)
	}

	#[must_use]
	pub fn is_callback(self) -> bool {
		self == Self::Callback
	}

	#[must_use]
	pub fn is_user_function(self) -> bool {
		self == Self::UserFunction
	}
}

/// Display name for the variable type introduced by `sigil`, or `"Unknown"`.
#[must_use]
pub fn type_name_from_sigil(sigil: char) -> &'static str {
	SymbolKind::from_sigil(sigil).type_name()
}

/// Whether `name` starts with a variable sigil.
#[must_use]
pub fn is_variable_name(name: &str) -> bool {
	name.chars()
		.next()
		.is_some_and(|c| SymbolKind::from_sigil(c).is_variable())
}

/// Splits a leading variable sigil off `name`, if there is one.
#[must_use]
pub fn split_sigil(name: &str) -> Option<(SymbolKind, &str)> {
	let mut chars = name.chars();
	let kind = SymbolKind::from_sigil(chars.next()?);
	kind.is_variable().then_some((kind, chars.as_str()))
}

/// The semantic payload of one declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolAttributes {
	/// Without the leading sigil for variables.
	pub name: String,
	pub kind: SymbolKind,
	/// A sigil's display name, or the `ui_*` keyword for UI variables.
	pub type_name: String,
	pub is_const: bool,
	pub is_polyphonic: bool,
	pub is_ui: bool,
	/// For UI callbacks only: the bound control, sigil stripped.
	pub ui_control_name: String,
	/// For UI callbacks only: the control's `ui_*` keyword, if the control was
	/// declared before the callback. Otherwise empty.
	pub ui_control_type: String,
	/// Category label, the same as [`SymbolRecord::container`].
	pub description: String,
	/// Zero-based.
	pub line: u32,
	/// Zero-based character offset.
	pub col: u32,
}

impl SymbolAttributes {
	/// The name as it is written at a use site, e.g. `%vol` for an integer array.
	#[must_use]
	pub fn sigiled_name(&self) -> String {
		match self.kind.sigil() {
			Some(sigil) => format!("{sigil}{}", self.name),
			None => self.name.clone(),
		}
	}

	/// A one-line rendition of the declaration, suitable for tooltips.
	#[must_use]
	pub fn declaration(&self) -> String {
		match self.kind {
			SymbolKind::Callback => {
				if self.is_ui && !self.ui_control_name.is_empty() {
					format!("on {}({})", self.name, self.ui_control_text())
				} else {
					format!("on {}", self.name)
				}
			}
			SymbolKind::UserFunction => format!("function {}", self.name),
			SymbolKind::Unknown => self.name.clone(),
			_ => {
				let qualifier = if self.is_const {
					"const "
				} else if self.is_polyphonic {
					"polyphonic "
				} else {
					""
				};

				if self.is_ui {
					format!("declare {} {}", self.type_name, self.sigiled_name())
				} else {
					format!("declare {qualifier}{}", self.sigiled_name())
				}
			}
		}
	}

	/// The bound control as written in the source, taken from the category
	/// label. Falls back to the stripped name if the label has no control.
	#[must_use]
	fn ui_control_text(&self) -> &str {
		self.description
			.strip_prefix(UI_CALLBACK_PREFIX)
			.filter(|control| !control.is_empty())
			.unwrap_or(self.ui_control_name.as_str())
	}
}

pub(crate) const UI_CALLBACK_PREFIX: &str = "UI Callback for ";

/// One collected declaration, as handed to outline and navigation features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
	/// Sigil stripped for variables.
	pub name: String,
	/// Category label, e.g. `Constant Variable (Real)` or `UI Callback for %vol`.
	pub container: String,
	/// Where the identifier starts.
	pub location: LineCol,
	/// From the introducing keyword to the end of the line.
	pub range: LineRange,
	/// From the identifier to the end of the line.
	pub selection_range: LineRange,
	pub attrs: SymbolAttributes,
}

impl SymbolRecord {
	#[must_use]
	pub fn kind(&self) -> SymbolKind {
		self.attrs.kind
	}

	#[must_use]
	pub fn is_variable(&self) -> bool {
		self.attrs.kind.is_variable()
	}

	#[must_use]
	pub fn is_callback(&self) -> bool {
		self.attrs.kind.is_callback()
	}

	#[must_use]
	pub fn is_user_function(&self) -> bool {
		self.attrs.kind.is_user_function()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn sigil_bijection() {
		for sigil in ['$', '~', '@', '%', '?', '!'] {
			let kind = SymbolKind::from_sigil(sigil);
			assert!(kind.is_variable(), "`{sigil}` should be a variable sigil");
			assert_eq!(kind.sigil(), Some(sigil));
			assert_eq!(kind.type_name(), type_name_from_sigil(sigil));
		}

		assert_eq!(SymbolKind::from_sigil('#'), SymbolKind::Unknown);
		assert_eq!(type_name_from_sigil('#'), "Unknown");
		assert_eq!(SymbolKind::Unknown.sigil(), None);
		assert_eq!(SymbolKind::Callback.sigil(), None);
		assert_eq!(SymbolKind::UserFunction.sigil(), None);
	}

	#[test]
	fn classification() {
		const ALL: &[SymbolKind] = &[
			SymbolKind::Unknown,
			SymbolKind::VariableInteger,
			SymbolKind::VariableReal,
			SymbolKind::VariableString,
			SymbolKind::VariableIntegerArray,
			SymbolKind::VariableRealArray,
			SymbolKind::VariableStringArray,
			SymbolKind::Callback,
			SymbolKind::UserFunction,
		];

		for &kind in ALL {
			let count = [kind.is_variable(), kind.is_callback(), kind.is_user_function()]
				.into_iter()
				.filter(|b| *b)
				.count();

			if kind == SymbolKind::Unknown {
				assert_eq!(count, 0);
			} else {
				assert_eq!(count, 1, "{kind:?} must fall into exactly one class");
			}
		}

		assert!(SymbolKind::VariableRealArray.is_array());
		assert!(!SymbolKind::VariableString.is_array());
	}

	#[test]
	fn names() {
		assert!(is_variable_name("%vol"));
		assert!(!is_variable_name("vol"));
		assert!(!is_variable_name(""));
		assert_eq!(
			split_sigil("?curve"),
			Some((SymbolKind::VariableRealArray, "curve"))
		);
		assert_eq!(split_sigil("play_note"), None);
	}

	#[test]
	fn declarations() {
		let konst = SymbolAttributes {
			name: "bar".to_string(),
			kind: SymbolKind::VariableReal,
			type_name: "Real".to_string(),
			is_const: true,
			..Default::default()
		};

		assert_eq!(konst.sigiled_name(), "~bar");
		assert_eq!(konst.declaration(), "declare const ~bar");

		let knob = SymbolAttributes {
			name: "vol".to_string(),
			kind: SymbolKind::VariableIntegerArray,
			type_name: "ui_knob".to_string(),
			is_ui: true,
			..Default::default()
		};

		assert_eq!(knob.declaration(), "declare ui_knob %vol");

		let callback = SymbolAttributes {
			name: "ui_control".to_string(),
			kind: SymbolKind::Callback,
			is_ui: true,
			ui_control_name: "vol".to_string(),
			description: "UI Callback for %vol".to_string(),
			..Default::default()
		};

		assert_eq!(callback.sigiled_name(), "ui_control");
		assert_eq!(callback.declaration(), "on ui_control(%vol)");

		// A control written without a sigil loses its first character in
		// `ui_control_name`, but is rendered as written.
		let unsigiled = SymbolAttributes {
			name: "ui_control".to_string(),
			kind: SymbolKind::Callback,
			is_ui: true,
			ui_control_name: "ol".to_string(),
			description: "UI Callback for vol".to_string(),
			..Default::default()
		};

		assert_eq!(unsigiled.declaration(), "on ui_control(vol)");
	}
}
