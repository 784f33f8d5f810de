//! `namer`: rename the selected layers of a document file on disk.
//!
//! ```text
//! namer <input> [--config FILE] [--output FILE] [--select-all]
//!               [--legacy-count] [--text-names N]
//! ```
//!
//! The format follows the file extension: `.layers` outline text, `.json`
//! or `.msgpack` host snapshots. Set `RUST_LOG=debug` to see every rename.

use namer_core::emitter::emit_outline;
use namer_core::outline::parse_outline;
use namer_core::rename::CountMode;
use namer_core::session::{MemoryHost, PluginConfig, run_plugin_with_report};
use namer_core::{Document, snapshot};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "usage: namer <input> [--config FILE] [--output FILE] [--select-all] \
                     [--legacy-count] [--text-names N]";

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match Options::parse(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(&options) {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}

// ─── Arguments ───────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq)]
struct Options {
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    select_all: bool,
    legacy_count: bool,
    text_names: Option<usize>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut options = Options::default();
        let mut input = None;
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => options.config = Some(PathBuf::from(value(&mut iter, arg)?)),
                "--output" | "-o" => options.output = Some(PathBuf::from(value(&mut iter, arg)?)),
                "--select-all" => options.select_all = true,
                "--legacy-count" => options.legacy_count = true,
                "--text-names" => {
                    let n = value(&mut iter, arg)?;
                    options.text_names = Some(
                        n.parse()
                            .map_err(|e| format!("--text-names expects a number, got `{n}`: {e}"))?,
                    );
                }
                flag if flag.starts_with("--") => return Err(format!("unknown option `{flag}`")),
                path if input.is_none() => input = Some(PathBuf::from(path)),
                extra => return Err(format!("unexpected argument `{extra}`")),
            }
        }

        options.input = input.ok_or_else(|| "missing input file".to_string())?;
        Ok(options)
    }

    /// Load the config file, then apply command-line overrides.
    fn plugin_config(&self) -> Result<PluginConfig, String> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
                serde_json::from_str(&text)
                    .map_err(|e| format!("bad config {}: {e}", path.display()))?
            }
            None => PluginConfig::default(),
        };
        if self.legacy_count {
            config.rename.count_mode = CountMode::Matched;
        }
        if let Some(n) = self.text_names {
            config.rename.text_names = Some(n);
        }
        Ok(config)
    }
}

fn value<'a>(iter: &mut std::slice::Iter<'a, String>, flag: &str) -> Result<&'a str, String> {
    iter.next()
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} needs a value"))
}

// ─── Files ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum Format {
    Outline,
    Json,
    MessagePack,
}

impl Format {
    fn of(path: &Path) -> Result<Self, String> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("layers") => Ok(Format::Outline),
            Some("json") => Ok(Format::Json),
            Some("msgpack") => Ok(Format::MessagePack),
            _ => Err(format!(
                "{}: unknown format, expected .layers, .json or .msgpack",
                path.display()
            )),
        }
    }
}

fn load(path: &Path) -> Result<Document, String> {
    let read_err = |e: std::io::Error| format!("cannot read {}: {e}", path.display());
    let doc = match Format::of(path)? {
        Format::Outline => parse_outline(&fs::read_to_string(path).map_err(read_err)?),
        Format::Json => snapshot::from_json(&fs::read_to_string(path).map_err(read_err)?),
        Format::MessagePack => snapshot::from_msgpack(&fs::read(path).map_err(read_err)?),
    };
    doc.map_err(|e| format!("{}: {e}", path.display()))
}

fn save(path: &Path, doc: &Document) -> Result<(), String> {
    let bytes = match Format::of(path)? {
        Format::Outline => emit_outline(doc).into_bytes(),
        Format::Json => snapshot::to_json(doc)?.into_bytes(),
        Format::MessagePack => snapshot::to_msgpack(doc)?,
    };
    fs::write(path, bytes).map_err(|e| format!("cannot write {}: {e}", path.display()))
}

// ─── Run ─────────────────────────────────────────────────────────────────

/// Rename, save, and return the notification message.
fn run(options: &Options) -> Result<String, String> {
    let config = options.plugin_config()?;
    let mut doc = load(&options.input)?;
    if options.select_all {
        doc.select_all();
    }

    let mut host = MemoryHost::new(doc);
    let (outcome, report) = run_plugin_with_report(&mut host, &config);

    // Unchanged documents are not rewritten in place.
    let output = options.output.as_deref().unwrap_or(&options.input);
    if outcome.count().is_some() && (!report.is_empty() || output != options.input.as_path()) {
        save(output, &host.document)?;
        log::info!("wrote {}", output.display());
    }

    Ok(host.notifications.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn scratch(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("namer-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    const PAGE: &str = r#"page @0:1 "Page 1"
frame @c:1 "Desktop" w=1680 {
  line @c:2 "Line 3"
  text @c:3 "Text" chars="Pricing"
}
"#;

    #[test]
    fn parses_all_options() {
        let options = Options::parse(&args(&[
            "page.layers",
            "--config",
            "namer.json",
            "-o",
            "out.json",
            "--select-all",
            "--legacy-count",
            "--text-names",
            "20",
        ]))
        .unwrap();
        assert_eq!(
            options,
            Options {
                input: PathBuf::from("page.layers"),
                output: Some(PathBuf::from("out.json")),
                config: Some(PathBuf::from("namer.json")),
                select_all: true,
                legacy_count: true,
                text_names: Some(20),
            }
        );
    }

    #[test]
    fn rejects_bad_arguments() {
        assert_eq!(Options::parse(&[]).unwrap_err(), "missing input file");
        assert_eq!(
            Options::parse(&args(&["a.layers", "--bogus"])).unwrap_err(),
            "unknown option `--bogus`"
        );
        assert_eq!(
            Options::parse(&args(&["a.layers", "--output"])).unwrap_err(),
            "--output needs a value"
        );
        assert!(
            Options::parse(&args(&["a.layers", "--text-names", "many"]))
                .unwrap_err()
                .starts_with("--text-names expects a number")
        );
    }

    #[test]
    fn renames_outline_into_json_snapshot() {
        let input = scratch("select-all.layers");
        let output = scratch("select-all.json");
        fs::write(&input, PAGE).unwrap();

        let options = Options {
            input: input.clone(),
            output: Some(output.clone()),
            select_all: true,
            text_names: Some(50),
            ..Options::default()
        };
        assert_eq!(run(&options).unwrap(), "✨ Done, 3 Layers Renamed ✨");

        let doc = snapshot::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(doc.name_of("c:1"), Some("Screen"));
        assert_eq!(doc.name_of("c:2"), Some("Line"));
        assert_eq!(doc.name_of("c:3"), Some("Pricing"));
        // The input file is left alone when an output is given.
        assert_eq!(fs::read_to_string(&input).unwrap(), PAGE);
    }

    #[test]
    fn nothing_selected_leaves_file_untouched() {
        let input = scratch("no-selection.layers");
        fs::write(&input, PAGE).unwrap();

        let options = Options {
            input: input.clone(),
            ..Options::default()
        };
        assert_eq!(
            run(&options).unwrap(),
            "🙈 Oops! Please select at least one frame to get started 🎨"
        );
        assert_eq!(fs::read_to_string(&input).unwrap(), PAGE);
    }

    #[test]
    fn legacy_count_does_not_rewrite_named_file() {
        let input = scratch("already-named.layers");
        let named = "# named by hand\nframe @n:1 \"Screen\" w=1680 {\n  line @n:2 \"Line\"\n}\nselect @n:1\n";
        fs::write(&input, named).unwrap();

        let options = Options {
            input: input.clone(),
            legacy_count: true,
            ..Options::default()
        };
        assert_eq!(run(&options).unwrap(), "✨ Done, 2 Layers Renamed ✨");
        assert_eq!(fs::read_to_string(&input).unwrap(), named);
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let options = Options {
            input: PathBuf::from("page.svg"),
            ..Options::default()
        };
        assert!(run(&options).unwrap_err().contains("unknown format"));
    }
}
