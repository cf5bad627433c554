//! Handling for `textDocument/hover` requests.

use ksp_ls::SymbolRecord;
use lsp_types::{Hover, HoverContents, HoverParams, LanguageString, MarkedString};

use crate::{request, util, Core, UnitResult};

use super::native::{self, RawNative};

pub(crate) fn req_hover(ctx: request::Context, params: HoverParams) -> UnitResult {
	let doc = &ctx.src.doc;
	let pos = util::line_col(doc, params.text_document_position_params.position);

	let Some(token) = super::token_at(doc, pos) else {
		return Core::respond_null(ctx.conn, ctx.id);
	};

	if !super::is_identifier(&token.text) {
		return Core::respond_null(ctx.conn, ctx.id);
	}

	let builtin = ctx
		.core
		.config
		.hover_builtins
		.then(|| native::lookup(&token.text))
		.flatten();

	let contents = if let Some(native) = builtin {
		hover_native(native)
	} else {
		let symbols = ksp_ls::collect(doc, None);

		let Some(sym) = ksp_ls::lookup(&symbols, &token.text) else {
			return Core::respond_null(ctx.conn, ctx.id);
		};

		hover_symbol(sym)
	};

	Core::respond(
		ctx.conn,
		ctx.id,
		Hover {
			contents,
			range: Some(util::make_range(doc, token.range)),
		},
	)
}

#[must_use]
fn hover_native(native: &RawNative) -> HoverContents {
	let mut contents = vec![MarkedString::LanguageString(LanguageString {
		language: "ksp".to_string(),
		value: native.decl.to_string(),
	})];

	if !native.doc.is_empty() {
		contents.push(MarkedString::String(native.doc.to_string()));
	}

	HoverContents::Array(contents)
}

#[must_use]
fn hover_symbol(sym: &SymbolRecord) -> HoverContents {
	let mut contents = vec![
		MarkedString::LanguageString(LanguageString {
			language: "ksp".to_string(),
			value: sym.attrs.declaration(),
		}),
		MarkedString::String(sym.container.clone()),
	];

	if !sym.attrs.ui_control_type.is_empty() {
		contents.push(MarkedString::String(format!(
			"Control type: `{}`",
			sym.attrs.ui_control_type
		)));
	}

	HoverContents::Array(contents)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn native_contents() {
		let HoverContents::Array(contents) = hover_native(native::lookup("play_note").unwrap())
		else {
			panic!("expected an array of marked strings");
		};

		assert_eq!(contents.len(), 2);

		let MarkedString::LanguageString(code) = &contents[0] else {
			panic!("expected a code block first");
		};

		assert_eq!(code.language, "ksp");
		assert!(code.value.starts_with("play_note("));
	}

	#[test]
	fn symbol_contents() {
		let doc = ksp_ls::Document::new("declare ui_knob $vol (0, 100, 1)\non ui_control($vol)");
		let symbols = ksp_ls::collect(&doc, None);

		let HoverContents::Array(contents) = hover_symbol(&symbols[1]) else {
			panic!("expected an array of marked strings");
		};

		assert_eq!(
			contents,
			[
				MarkedString::LanguageString(LanguageString {
					language: "ksp".to_string(),
					value: "on ui_control($vol)".to_string(),
				}),
				MarkedString::String("UI Callback for $vol".to_string()),
				MarkedString::String("Control type: `ui_knob`".to_string()),
			]
		);
	}
}
