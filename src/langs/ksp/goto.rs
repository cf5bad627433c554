//! Handling for `textDocument/definition` requests.

use ksp_ls::{text::char_len, LineCol, LineRange, SymbolRecord};
use lsp_types::{GotoDefinitionResponse, Location, Position};

use crate::{request, util, Core, UnitResult};

pub(crate) fn req_goto(ctx: request::Context, position: Position) -> UnitResult {
	let doc = &ctx.src.doc;
	let pos = util::line_col(doc, position);

	let Some(token) = super::token_at(doc, pos) else {
		return Core::respond_null(ctx.conn, ctx.id);
	};

	if !super::is_identifier(&token.text) {
		return Core::respond_null(ctx.conn, ctx.id);
	}

	let symbols = ksp_ls::collect(doc, None);

	let Some(sym) = ksp_ls::lookup(&symbols, &token.text) else {
		tracing::debug!("No declaration found for `{}`.", token.text);
		return Core::respond_null(ctx.conn, ctx.id);
	};

	Core::respond(
		ctx.conn,
		ctx.id,
		GotoDefinitionResponse::Scalar(Location {
			uri: ctx.uri.clone(),
			range: util::make_range(doc, ident_range(sym)),
		}),
	)
}

/// Spans only the declared identifier, sigil included.
#[must_use]
fn ident_range(sym: &SymbolRecord) -> LineRange {
	let start = sym.location;
	let len = char_len(&sym.attrs.sigiled_name());
	LineRange::new(start, LineCol::new(start.line, start.col + len))
}
