//! Every language supported by KSP-LS gets a module subtree under this module.

pub(crate) mod ksp;

use lsp_types::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LangId {
	Unknown,

	Ksp,
}

impl LangId {
	/// Trusts the client's language ID first, then the file extension.
	#[must_use]
	pub(crate) fn detect(language_id: &str, uri: &Url) -> Self {
		if language_id.eq_ignore_ascii_case("ksp") {
			return Self::Ksp;
		}

		let is_ksp_file = uri
			.path_segments()
			.and_then(|mut segs| segs.next_back())
			.and_then(|file_name| file_name.rsplit_once('.'))
			.is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("ksp"));

		if is_ksp_file {
			Self::Ksp
		} else {
			Self::Unknown
		}
	}
}
