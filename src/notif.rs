use std::ops::ControlFlow;

use ksp_ls::Document;
use lsp_server::{Connection, ExtractError, Notification};
use lsp_types::notification::{
	DidChangeConfiguration, DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument,
};
use tracing::{debug, warn};

use crate::{langs::LangId, Core, Error, Source, UnitResult};

pub(super) fn handle(
	core: &mut Core,
	conn: &Connection,
	mut notif: Notification,
) -> ControlFlow<UnitResult, Notification> {
	notif = try_notif::<DidOpenTextDocument, _>(notif, |params| {
		let item = params.text_document;
		let lang = LangId::detect(&item.language_id, &item.uri);
		debug!("Opened {} as {lang:?} (version {}).", item.uri, item.version);

		let _ = core.sources.insert(
			item.uri,
			Source {
				doc: Document::new(item.text),
				lang,
				version: item.version,
			},
		);

		Ok(())
	})?;

	notif = try_notif::<DidChangeTextDocument, _>(notif, |params| {
		let uri = params.text_document.uri;
		let version = params.text_document.version;

		let Some(src) = core.sources.get_mut(&uri) else {
			// Changes to a document the client never opened; nothing to update.
			warn!("Change notification for a document that is not open: {uri}");
			return Ok(());
		};

		if version < src.version {
			warn!(
				"Ignoring stale change to {uri} (version {version} < {}).",
				src.version
			);
			return Ok(());
		}

		// Only full-document synchronization is advertised, so the last
		// rangeless change holds the entire new text.
		let Some(change) = params
			.content_changes
			.into_iter()
			.rev()
			.find(|change| change.range.is_none())
		else {
			return Err(Error::Process {
				source: None,
				ctx: format!("expected a full-document change for {uri}"),
			});
		};

		src.doc = Document::new(change.text);
		src.version = version;
		Ok(())
	})?;

	notif = try_notif::<DidCloseTextDocument, _>(notif, |params| {
		let _ = core.sources.remove(&params.text_document.uri);
		Ok(())
	})?;

	notif = try_notif::<DidChangeConfiguration, _>(notif, |params| {
		// Clients using the pull model send `null` settings as a nudge.
		if params.settings.is_null() && core.pull_config {
			return core.request_config(conn);
		}

		core.apply_config(conn, params.settings)
	})?;

	ControlFlow::Continue(notif)
}

#[must_use]
fn try_notif<N, F>(notif: Notification, callback: F) -> ControlFlow<UnitResult, Notification>
where
	N: lsp_types::notification::Notification,
	F: FnOnce(N::Params) -> UnitResult,
{
	match notif.extract::<N::Params>(N::METHOD) {
		Ok(params) => ControlFlow::Break(callback(params)),
		Err(ExtractError::MethodMismatch(notif)) => ControlFlow::Continue(notif),
		Err(ExtractError::JsonError { method, error }) => ControlFlow::Break(Err(Error::Process {
			source: Some(Box::new(error)),
			ctx: format!("malformed `{method}` parameters"),
		})),
	}
}
