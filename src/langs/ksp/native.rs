//! Builtin commands, variables, and UI control keywords.
//!
//! The tables are generated at build time from `data/ksp/builtins.toml`.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

#[derive(Debug)]
pub(crate) struct RawNative {
	/// Sigil included for variables.
	pub(crate) name: &'static str,
	pub(crate) decl: &'static str,
	pub(crate) doc: &'static str,
	pub(crate) group: &'static str,
}

include!(concat!(env!("OUT_DIR"), "/native/ksp.rs"));

#[must_use]
pub(crate) fn commands() -> &'static [RawNative] {
	COMMANDS
}

#[must_use]
pub(crate) fn variables() -> &'static [RawNative] {
	VARIABLES
}

/// Commands are checked first, then variables, then UI control keywords.
#[must_use]
pub(crate) fn lookup(name: &str) -> Option<&'static RawNative> {
	static INDEX: OnceLock<FxHashMap<&'static str, &'static RawNative>> = OnceLock::new();

	let index = INDEX.get_or_init(|| {
		let mut index = FxHashMap::default();

		for native in COMMANDS.iter().chain(VARIABLES).chain(UI_CONTROLS) {
			let _ = index.entry(native.name).or_insert(native);
		}

		index
	});

	index.get(name).copied()
}
