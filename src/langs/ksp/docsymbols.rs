use ksp_ls::{Document, SymbolRecord};
use lsp_types::{DocumentSymbol, DocumentSymbolResponse, SymbolKind};

use crate::{request, util, Core, UnitResult};

pub(crate) fn req_doc_symbols(ctx: request::Context) -> UnitResult {
	let doc = &ctx.src.doc;

	let docsyms = ksp_ls::collect(doc, None)
		.iter()
		.map(|sym| doc_symbol(doc, sym))
		.collect::<Vec<_>>();

	Core::respond(ctx.conn, ctx.id, DocumentSymbolResponse::Nested(docsyms))
}

#[must_use]
fn doc_symbol(doc: &Document, sym: &SymbolRecord) -> DocumentSymbol {
	let kind = if sym.attrs.is_const {
		SymbolKind::CONSTANT
	} else if sym.is_variable() {
		SymbolKind::VARIABLE
	} else {
		SymbolKind::FUNCTION
	};

	let detail = if sym.attrs.ui_control_type.is_empty() {
		sym.container.clone()
	} else {
		format!("{} ({})", sym.container, sym.attrs.ui_control_type)
	};

	#[allow(deprecated)]
	DocumentSymbol {
		name: sym.attrs.sigiled_name(),
		detail: Some(detail),
		kind,
		tags: None,
		deprecated: None,
		range: util::make_range(doc, sym.range),
		selection_range: util::make_range(doc, sym.selection_range),
		children: None,
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn kinds_and_details() {
		let doc = Document::new(indoc::indoc! {"
			declare const $MAX := 10
			declare ui_button $go
			on ui_control($go)
			end on
			function reset
			end function
		"});

		let docsyms = ksp_ls::collect(&doc, None)
			.iter()
			.map(|sym| doc_symbol(&doc, sym))
			.collect::<Vec<_>>();

		let summary = docsyms
			.iter()
			.map(|d| (d.name.as_str(), d.kind, d.detail.as_deref().unwrap_or_default()))
			.collect::<Vec<_>>();

		assert_eq!(
			summary,
			[
				("$MAX", SymbolKind::CONSTANT, "Constant Variable (Integer)"),
				("$go", SymbolKind::VARIABLE, "UI Variable (ui_button)"),
				(
					"ui_control",
					SymbolKind::FUNCTION,
					"UI Callback for $go (ui_button)"
				),
				("reset", SymbolKind::FUNCTION, "Function"),
			]
		);

		assert_eq!(docsyms[1].selection_range.start.character, 18);
		assert_eq!(docsyms[1].range.start.character, 0);
		assert_eq!(docsyms[1].range.end.character, 21);
	}
}
