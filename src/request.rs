//! Routines acting on [`Core`] for handling client requests.

use std::ops::ControlFlow;

use lsp_server::{Connection, ErrorCode, ExtractError, Request, RequestId};
use lsp_types::{
	request::{Completion, DocumentSymbolRequest, GotoDefinition, HoverRequest},
	Url,
};

use crate::{
	langs::{ksp, LangId},
	Core, Error, Source, UnitResult,
};

/// Everything a language's request handler needs.
pub(crate) struct Context<'c> {
	pub(crate) core: &'c Core,
	pub(crate) conn: &'c Connection,
	pub(crate) id: RequestId,
	pub(crate) uri: &'c Url,
	pub(crate) src: &'c Source,
}

pub(super) fn handle(
	core: &Core,
	conn: &Connection,
	mut req: Request,
) -> ControlFlow<UnitResult, Request> {
	req = try_request::<HoverRequest, _>(req, |id, params| {
		let uri = params.text_document_position_params.text_document.uri.clone();

		let Some(ctx) = context(core, conn, id.clone(), &uri) else {
			return Core::respond_null(conn, id);
		};

		match ctx.src.lang {
			LangId::Ksp => ksp::hover::req_hover(ctx, params),
			LangId::Unknown => Core::respond_null(conn, id),
		}
	})?;

	req = try_request::<DocumentSymbolRequest, _>(req, |id, params| {
		let Some(ctx) = context(core, conn, id.clone(), &params.text_document.uri) else {
			return Core::respond_null(conn, id);
		};

		match ctx.src.lang {
			LangId::Ksp => ksp::docsymbols::req_doc_symbols(ctx),
			LangId::Unknown => Core::respond_null(conn, id),
		}
	})?;

	req = try_request::<GotoDefinition, _>(req, |id, params| {
		let uri = &params.text_document_position_params.text_document.uri;

		let Some(ctx) = context(core, conn, id.clone(), uri) else {
			return Core::respond_null(conn, id);
		};

		match ctx.src.lang {
			LangId::Ksp => {
				ksp::goto::req_goto(ctx, params.text_document_position_params.position)
			}
			LangId::Unknown => Core::respond_null(conn, id),
		}
	})?;

	req = try_request::<Completion, _>(req, |id, params| {
		let uri = params.text_document_position.text_document.uri.clone();

		let Some(ctx) = context(core, conn, id.clone(), &uri) else {
			return Core::respond_null(conn, id);
		};

		match ctx.src.lang {
			LangId::Ksp => ksp::completion::req_completion(ctx, params),
			LangId::Unknown => Core::respond_null(conn, id),
		}
	})?;

	ControlFlow::Continue(req)
}

/// `None` if the client never opened `uri`.
#[must_use]
fn context<'c>(
	core: &'c Core,
	conn: &'c Connection,
	id: RequestId,
	uri: &'c Url,
) -> Option<Context<'c>> {
	let Some(src) = core.source(uri) else {
		tracing::debug!("Request for a document that is not open: {uri}");
		return None;
	};

	Some(Context {
		core,
		conn,
		id,
		uri,
		src,
	})
}

#[must_use]
fn try_request<R, F>(req: Request, callback: F) -> ControlFlow<UnitResult, Request>
where
	R: lsp_types::request::Request,
	F: FnOnce(RequestId, R::Params) -> UnitResult,
{
	let id = req.id.clone();

	match req.extract::<R::Params>(R::METHOD) {
		Ok((reqid, params)) => ControlFlow::Break(callback(reqid, params)),
		Err(ExtractError::MethodMismatch(req)) => ControlFlow::Continue(req),
		Err(ExtractError::JsonError { method, error }) => ControlFlow::Break(Err(Error::Process {
			source: Some(Box::new(error)),
			ctx: format!("malformed `{method}` parameters"),
		}
		.map_to_response(id, ErrorCode::InvalidParams))),
	}
}
