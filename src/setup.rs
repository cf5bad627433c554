use lsp_types::{
	CompletionOptions, HoverProviderCapability, OneOf, ServerCapabilities,
	TextDocumentSyncCapability, TextDocumentSyncKind, TextDocumentSyncOptions,
};
use tracing_subscriber::{
	filter::LevelFilter, fmt::writer::BoxMakeWriter, prelude::__tracing_subscriber_SubscriberExt,
	util::SubscriberInitExt, Layer,
};

/// Logs go to stderr; stdout belongs to the protocol.
pub(crate) fn logging() {
	/// Like [`tracing_subscriber::fmt::time::Uptime`] but with
	/// hour/minute/second formatting for better clarity.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	struct Uptime(std::time::Instant);

	impl Default for Uptime {
		fn default() -> Self {
			Self(std::time::Instant::now())
		}
	}

	impl tracing_subscriber::fmt::time::FormatTime for Uptime {
		fn format_time(
			&self,
			w: &mut tracing_subscriber::fmt::format::Writer<'_>,
		) -> std::fmt::Result {
			let elapsed = self.0.elapsed();
			let secs = elapsed.as_secs() % 60;
			let mins = (elapsed.as_secs() / 60) % 60;
			let hours = elapsed.as_secs() / 3600;
			write!(w, "{hours:02}:{mins:02}:{secs:02}")
		}
	}

	let level = if cfg!(debug_assertions) {
		LevelFilter::DEBUG
	} else {
		LevelFilter::INFO
	};

	let timer = Uptime::default();
	eprintln!("Attempting log initialization.");
	let layer_stderr = tracing_subscriber::fmt::Layer::default()
		.with_timer(timer)
		.with_ansi(false)
		.with_writer(BoxMakeWriter::new(std::io::stderr))
		.with_filter(level);
	let collector = tracing_subscriber::registry().with(layer_stderr);

	// Tests may try to install it more than once.
	let _ = collector.try_init();
}

/// Variable sigils; typing one of these requests completion.
const TRIGGER_CHARS: &[&str] = &["$", "~", "@", "%", "?", "!"];

#[must_use]
pub(crate) fn capabilities() -> ServerCapabilities {
	ServerCapabilities {
		text_document_sync: Some(TextDocumentSyncCapability::Options(
			TextDocumentSyncOptions {
				open_close: Some(true),
				change: Some(TextDocumentSyncKind::FULL),
				will_save: None,
				will_save_wait_until: None,
				save: None,
			},
		)),
		completion_provider: Some(CompletionOptions {
			trigger_characters: Some(TRIGGER_CHARS.iter().map(|c| c.to_string()).collect()),
			..Default::default()
		}),
		definition_provider: Some(OneOf::Left(true)),
		document_symbol_provider: Some(OneOf::Left(true)),
		hover_provider: Some(HoverProviderCapability::Simple(true)),
		..Default::default()
	}
}
