//! Handling for `textDocument/completion` requests.

use ksp_ls::{Document, SymbolRecord};
use lsp_types::{
	CompletionItem, CompletionItemKind, CompletionItemLabelDetails, CompletionParams,
	CompletionResponse, Documentation,
};

use crate::{request, util, Core, FxIndexMap, UnitResult};

use super::native::{self, RawNative};

pub(crate) fn req_completion(ctx: request::Context, params: CompletionParams) -> UnitResult {
	let doc = &ctx.src.doc;
	let pos = util::line_col(doc, params.text_document_position.position);
	let items = completions(doc, pos.line as usize, ctx.core.config.complete_builtins);
	Core::respond(ctx.conn, ctx.id, CompletionResponse::Array(items))
}

/// Declarations on lines before `line` come first, in document order.
/// Later entries with an already-seen label are dropped.
#[must_use]
fn completions(doc: &Document, line: usize, builtins: bool) -> Vec<CompletionItem> {
	let mut items = FxIndexMap::default();

	for sym in ksp_ls::collect(doc, Some(line)) {
		// Callbacks can't be referred to by name.
		if sym.is_callback() {
			continue;
		}

		let item = item_symbol(&sym);
		let _ = items.entry(item.label.clone()).or_insert(item);
	}

	if builtins {
		let natives = native::commands()
			.iter()
			.map(|n| (n, CompletionItemKind::FUNCTION))
			.chain(
				native::variables()
					.iter()
					.map(|n| (n, CompletionItemKind::VARIABLE)),
			);

		for (native, kind) in natives {
			let _ = items
				.entry(native.name.to_string())
				.or_insert_with(|| item_native(native, kind));
		}
	}

	items.into_values().collect()
}

#[must_use]
fn item_symbol(sym: &SymbolRecord) -> CompletionItem {
	let kind = if sym.attrs.is_const {
		CompletionItemKind::CONSTANT
	} else if sym.is_variable() {
		CompletionItemKind::VARIABLE
	} else {
		CompletionItemKind::FUNCTION
	};

	CompletionItem {
		label: sym.attrs.sigiled_name(),
		kind: Some(kind),
		detail: Some(sym.container.clone()),
		..Default::default()
	}
}

#[must_use]
fn item_native(native: &RawNative, kind: CompletionItemKind) -> CompletionItem {
	CompletionItem {
		label: native.name.to_string(),
		label_details: Some(CompletionItemLabelDetails {
			detail: None,
			description: Some(native.group.to_string()),
		}),
		kind: Some(kind),
		detail: Some(native.decl.to_string()),
		documentation: (!native.doc.is_empty())
			.then(|| Documentation::String(native.doc.to_string())),
		..Default::default()
	}
}

#[cfg(test)]
mod test {
	use indoc::indoc;

	use super::*;

	const SOURCE: &str = indoc! {"
		on init
			declare $count
			declare const ~RATE := 0.5
		end on
		function tick
			inc($count)
		end function
		declare $late
	"};

	#[test]
	fn locals_before_cursor() {
		let doc = Document::new(SOURCE);
		let items = completions(&doc, 6, false);

		let labels = items
			.iter()
			.map(|i| (i.label.as_str(), i.kind))
			.collect::<Vec<_>>();

		assert_eq!(
			labels,
			[
				("$count", Some(CompletionItemKind::VARIABLE)),
				("~RATE", Some(CompletionItemKind::CONSTANT)),
				("tick", Some(CompletionItemKind::FUNCTION)),
			]
		);
	}

	#[test]
	fn builtins_follow_locals() {
		let doc = Document::new(SOURCE);
		let items = completions(&doc, 2, true);

		assert_eq!(items[0].label, "$count");

		let play_note = items.iter().find(|i| i.label == "play_note").unwrap();
		assert_eq!(play_note.kind, Some(CompletionItemKind::FUNCTION));
		assert!(play_note
			.detail
			.as_deref()
			.is_some_and(|d| d.starts_with("play_note(")));

		let event_note = items.iter().find(|i| i.label == "$EVENT_NOTE").unwrap();
		assert_eq!(event_note.kind, Some(CompletionItemKind::VARIABLE));

		assert!(items.iter().all(|i| !i.label.starts_with("ui_")));
	}

	#[test]
	fn duplicates_keep_the_first() {
		let doc = Document::new("declare $x\ndeclare $x := 2\ndeclare %EVENT_PAR[4]");
		let items = completions(&doc, 3, true);

		assert_eq!(items.iter().filter(|i| i.label == "$x").count(), 1);

		let shadowed = items.iter().find(|i| i.label == "%EVENT_PAR").unwrap();
		assert_eq!(shadowed.detail.as_deref(), Some("Variable (Integer Array)"));
	}
}
