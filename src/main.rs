//! # KSP-LS
//!
//! A language server for the Kontakt Script Processor (KSP).

// Common //////////////////////////////////////////////////////////////////////

mod error;
mod notif;
mod request;
mod setup;
mod util;


// Languages ///////////////////////////////////////////////////////////////////

mod langs;

use std::{hash::BuildHasherDefault, ops::ControlFlow};

use indexmap::IndexMap;
use ksp_ls::Document;
use lsp_server::{Connection, ErrorCode, Message, Notification, Request, RequestId, Response};
use lsp_types::{
	notification::ShowMessage, request::WorkspaceConfiguration, ConfigurationItem,
	ConfigurationParams, InitializeParams, MessageType, ShowMessageParams, Url,
};
use rustc_hash::{FxHashMap, FxHasher};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use self::langs::LangId;

pub(crate) use self::error::Error;

pub(crate) type ErrorBox = Box<dyn std::error::Error + Send + Sync>;
pub(crate) type UnitResult = Result<(), Error>;
pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

fn main() -> UnitResult {
	setup::logging();

	info!("Initializing...");
	let (conn, threads) = Connection::stdio();
	let params = conn.initialize(serde_json::to_value(setup::capabilities())?)?;
	let params = serde_json::from_value::<InitializeParams>(params)?;

	let mut core = Core::new(params);
	core.request_config(&conn)?;
	core.main_loop(&conn)?;

	drop(conn);
	threads.join()?;
	info!("Shutdown complete.");
	Ok(())
}

/// User settings, read from the `ksp` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct Config {
	/// Whether hovers consult the builtin command and variable tables.
	pub(crate) hover_builtins: bool,
	/// Whether completion offers builtin commands and variables.
	pub(crate) complete_builtins: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			hover_builtins: true,
			complete_builtins: true,
		}
	}
}

impl Config {
	const SECTION: &'static str = "ksp";

	/// Accepts either the section itself or an object containing it.
	/// `null` yields the defaults.
	pub(crate) fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
		let value = match value {
			serde_json::Value::Object(mut obj) if obj.contains_key(Self::SECTION) => {
				obj.remove(Self::SECTION).unwrap_or_default()
			}
			other => other,
		};

		if value.is_null() {
			return Ok(Self::default());
		}

		serde_json::from_value::<Self>(value)
	}
}

/// An open document.
#[derive(Debug)]
pub(crate) struct Source {
	pub(crate) doc: Document,
	pub(crate) lang: LangId,
	pub(crate) version: i32,
}

#[derive(Debug)]
pub(crate) struct Core {
	pub(crate) sources: FxHashMap<Url, Source>,
	pub(crate) config: Config,
	pub(crate) comms: CommSystem,
	/// Whether the client can answer `workspace/configuration` requests.
	pub(crate) pull_config: bool,
}

impl Core {
	#[must_use]
	fn new(params: InitializeParams) -> Self {
		let pull_config = params
			.capabilities
			.workspace
			.as_ref()
			.and_then(|ws| ws.configuration)
			.unwrap_or(false);

		let config = match params.initialization_options.map(Config::from_value) {
			Some(Ok(c)) => c,
			Some(Err(err)) => {
				error!("Failed to decode initialization options: {err}");
				Config::default()
			}
			None => Config::default(),
		};

		debug!("Initial config: {config:#?}");

		Self {
			sources: FxHashMap::default(),
			config,
			comms: CommSystem::default(),
			pull_config,
		}
	}

	fn request_config(&mut self, conn: &Connection) -> UnitResult {
		if !self.pull_config {
			return Ok(());
		}

		self.comms.send(
			conn,
			<WorkspaceConfiguration as lsp_types::request::Request>::METHOD,
			ConfigurationParams {
				items: vec![ConfigurationItem {
					scope_uri: None,
					section: Some(Config::SECTION.to_string()),
				}],
			},
			|core, conn, resp| {
				let Some(value) = resp.result else {
					return Ok(());
				};

				let configs = serde_json::from_value::<CfgReqResult>(value)?;

				match configs.into_iter().next() {
					Some(first) => core.apply_config(conn, first),
					None => Ok(()),
				}
			},
		)
	}

	/// Keeps the current config if `value` is malformed, and tells the user so.
	pub(crate) fn apply_config(&mut self, conn: &Connection, value: serde_json::Value) -> UnitResult {
		match Config::from_value(value) {
			Ok(config) => {
				debug!("Config changed: {config:#?}");
				self.config = config;
				Ok(())
			}
			Err(err) => {
				error!("Failed to decode user config: {err}");
				Self::info_message(conn, format!("Ignoring malformed KSP settings: {err}"))
			}
		}
	}

	fn main_loop(&mut self, conn: &Connection) -> UnitResult {
		for msg in conn.receiver.iter() {
			match msg {
				Message::Request(req) => {
					if conn.handle_shutdown(&req)? {
						info!("Server shutting down...");
						return Ok(());
					}

					self.on_request(conn, req)?;
				}
				Message::Response(resp) => {
					let Some(callback) = self.comms.on_receive(&resp) else {
						warn!("Received a response to an unknown request: {:?}", resp.id);
						continue;
					};

					if let Err(err) = callback(self, conn, resp) {
						error!("{err}");
					}
				}
				Message::Notification(notif) => self.on_notif(conn, notif)?,
			}
		}

		Ok(())
	}

	/// Only fails if the connection is unusable.
	fn on_request(&mut self, conn: &Connection, req: Request) -> UnitResult {
		let id = req.id.clone();

		let result = match request::handle(self, conn, req) {
			ControlFlow::Break(Err(err @ Error::Process { .. })) => {
				Err(err.map_to_response(id, ErrorCode::InternalError))
			}
			ControlFlow::Break(result) => result,
			ControlFlow::Continue(req) => {
				debug!("Unhandled request: {}", req.method);

				Err(Error::Process {
					source: None,
					ctx: format!("unsupported request: `{}`", req.method),
				}
				.map_to_response(req.id, ErrorCode::MethodNotFound))
			}
		};

		Self::report(conn, result)
	}

	/// Only fails if the connection is unusable.
	fn on_notif(&mut self, conn: &Connection, notif: Notification) -> UnitResult {
		let result = match notif::handle(self, conn, notif) {
			ControlFlow::Break(result) => result,
			ControlFlow::Continue(notif) => {
				debug!("Unhandled notification: {}", notif.method);
				Ok(())
			}
		};

		Self::report(conn, result)
	}

	fn report(conn: &Connection, result: UnitResult) -> UnitResult {
		match result {
			Ok(()) => Ok(()),
			Err(Error::Response(resp)) => {
				if let Some(err) = &resp.error {
					warn!("Request {:?} failed: {}", resp.id, err.message);
				}

				conn.sender.send(Message::Response(resp))?;
				Ok(())
			}
			Err(err @ Error::Send(_)) => Err(err),
			Err(err) => {
				error!("{err}");
				Ok(())
			}
		}
	}

	#[must_use]
	pub(crate) fn source(&self, uri: &Url) -> Option<&Source> {
		self.sources.get(uri)
	}

	pub(crate) fn respond_null(conn: &Connection, id: RequestId) -> UnitResult {
		conn.sender.send(Message::Response(Response {
			id,
			result: Some(serde_json::Value::Null),
			error: None,
		}))?;

		Ok(())
	}

	pub(crate) fn respond<T: Serialize>(conn: &Connection, id: RequestId, result: T) -> UnitResult {
		conn.sender.send(Message::Response(Response {
			id,
			result: Some(serde_json::to_value(result)?),
			error: None,
		}))?;

		Ok(())
	}

	pub(crate) fn info_message(conn: &Connection, text: impl Into<String>) -> UnitResult {
		conn.sender.send(Message::Notification(Notification {
			method: <ShowMessage as lsp_types::notification::Notification>::METHOD.to_string(),
			params: serde_json::to_value(ShowMessageParams {
				typ: MessageType::INFO,
				message: text.into(),
			})?,
		}))?;

		Ok(())
	}
}

#[derive(Debug, Default)]
pub(crate) struct CommSystem {
	next_id: i32,
	egress: FxHashMap<RequestId, ResponseCallback>,
}

impl CommSystem {
	fn send<T: Serialize>(
		&mut self,
		conn: &Connection,
		method: &'static str,
		params: T,
		callback: ResponseCallback,
	) -> UnitResult {
		let id = RequestId::from(self.next_id);
		self.next_id = self.next_id.checked_add(1).unwrap_or(0);

		conn.sender.send(Message::Request(Request {
			id: id.clone(),
			method: method.to_string(),
			params: serde_json::to_value(params)?,
		}))?;

		let _ = self.egress.insert(id, callback);

		Ok(())
	}

	#[must_use]
	fn on_receive(&mut self, resp: &Response) -> Option<ResponseCallback> {
		self.egress.remove(&resp.id)
	}
}

type ResponseCallback = fn(&mut Core, &Connection, Response) -> UnitResult;
type CfgReqResult = <WorkspaceConfiguration as lsp_types::request::Request>::Result;
