use std::{
	fs::File,
	io::{BufWriter, Write},
	path::Path,
	sync::OnceLock,
};

use regex::Regex;

fn main() -> UnitResult {
	let start_time = std::time::Instant::now();
	let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")?;
	let data_dir = Path::new(&manifest_dir).join("data");
	println!("cargo:rerun-if-changed={}", data_dir.display());

	let out_dir = std::env::var("OUT_DIR")?;
	let out_native_dir = Path::new(&out_dir).join("native");
	std::fs::create_dir_all(&out_native_dir)?;

	ksp(&data_dir.join("ksp"), &out_native_dir)?;

	eprintln!(
		"Native symbol definitions generated in {}ms.",
		start_time.elapsed().as_millis()
	);

	Ok(())
}

// KSP /////////////////////////////////////////////////////////////////////////

fn ksp(data_dir: &Path, out_native_dir: &Path) -> UnitResult {
	let top_table = {
		let txt_builtins = std::fs::read_to_string(data_dir.join("builtins.toml"))?;
		txt_builtins.parse::<toml::Table>()?
	};

	let out_ksp_file = out_native_dir.join("ksp.rs");
	let mut bw = BufWriter::new(File::create(out_ksp_file)?);
	write_file_start(&mut bw)?;

	for (key, array_name) in [
		("commands", "COMMANDS"),
		("variables", "VARIABLES"),
		("ui-controls", "UI_CONTROLS"),
	] {
		write_array_start(&mut bw, array_name, "RawNative")?;

		let Some(cat) = top_table.get(key).and_then(|v| v.as_table()) else {
			return Err(format!("`{key}` is missing from builtins.toml").into());
		};

		category(cat, &mut bw, |bw, group, name, decl, doc| {
			write_ksp_datum(bw, group, name, decl, doc)
		})?;

		write_array_end(&mut bw)?;
	}

	bw.flush()?;
	Ok(())
}

fn write_ksp_datum(
	bw: &mut BufWriter<File>,
	group: &str,
	name: &str,
	decl: &str,
	doc: &str,
) -> UnitResult {
	write!(
		bw,
		r##"	RawNative {{
		name: r#"{name}"#,
		decl: r#"{decl}"#,
		doc: r#"{doc}"#,
		group: r#"{group}"#,
	}},
"##
	)?;

	Ok(())
}

// Helpers /////////////////////////////////////////////////////////////////////

type UnitResult = Result<(), Box<dyn std::error::Error>>;
type TomlTable = toml::map::Map<String, toml::Value>;

/// A category is a section titled something like "commands" or "variables".
/// Each contains a table titled "groups" whose values are arrays of entries.
///
/// `F`'s string slice parameters are `group`, `name`, `decl`, `doc`.
fn category<F>(category: &TomlTable, bw: &mut BufWriter<File>, mut callback: F) -> UnitResult
where
	F: FnMut(&mut BufWriter<File>, &str, &str, &str, &str) -> UnitResult,
{
	let Some(groups) = category.get("groups").and_then(|v| v.as_table()) else {
		return Ok(());
	};

	for (group, entries) in groups {
		let Some(entries) = entries.as_array() else {
			return Err(format!("group `{group}` is not an array of tables").into());
		};

		for obj in entries.iter().filter_map(|value| value.as_table()) {
			let doc = sanitize_doc(obj);

			let Some(raw_decl) = obj.get("decl").and_then(|v| v.as_str()) else {
				return Err(format!("an entry in group `{group}` has no `decl`").into());
			};

			let (decl, name) = extract_decl_and_name(raw_decl)?;
			callback(bw, group, name, &decl, doc)?;
		}
	}

	Ok(())
}

/// Trims surrounding whitespace from an entry's `doc`, if it has one.
#[must_use]
fn sanitize_doc(table: &TomlTable) -> &str {
	table
		.get("doc")
		.and_then(|d| d.as_str())
		.map(str::trim)
		.unwrap_or("")
}

/// `decl` names the builtin in braces, e.g. `{play_note}(<note-number>)`.
/// Returns the declaration without the braces, and the name.
fn extract_decl_and_name(decl: &str) -> Result<(String, &str), Box<dyn std::error::Error>> {
	static RGX_NAME: OnceLock<Regex> = OnceLock::new();
	let rgx_name = RGX_NAME.get_or_init(|| Regex::new(r"\{([$%~?@!]?[A-Za-z0-9_]+)\}").unwrap());

	let Some(cap) = rgx_name.captures(decl) else {
		return Err(format!("failed to extract name from declaration: `{decl}`").into());
	};

	let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
		unreachable!()
	};

	let mut ret = String::with_capacity(decl.len());
	ret.push_str(&decl[..whole.start()]);
	ret.push_str(name.as_str());
	ret.push_str(&decl[whole.end()..]);

	Ok((ret, name.as_str()))
}

// Common string writing functions /////////////////////////////////////////////

fn write_array_start(
	bw: &mut BufWriter<File>,
	name: &'static str,
	elem_t: &'static str,
) -> UnitResult {
	writeln!(bw, "\nconst {name}: &[{elem_t}] = &[")?;
	Ok(())
}

fn write_array_end(bw: &mut BufWriter<File>) -> UnitResult {
	writeln!(bw, "];")?;
	Ok(())
}

fn write_file_start(bw: &mut BufWriter<File>) -> UnitResult {
	writeln!(bw, r"// This file is auto-generated by a build script.")?;

	Ok(())
}
