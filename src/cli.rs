//! Minimal CLI: (json | sql) → reflow | minify | check | stats
use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// reformat SQL or JSON and report structure statistics
#[derive(Parser, Debug)]
#[command(name = "fmtkit")]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// pretty-print or minify JSON and report structure statistics
    Json(JsonTarget),
    /// reflow or minify SQL and report query statistics
    Sql(SqlTarget),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct OutputSettings {
    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct JsonTarget {
    #[command(flatten)]
    input_settings: InputSettings,

    /// emit compact output instead of pretty-printing
    #[arg(long, default_value_t = false)]
    minify: bool,

    /// validate only; exits non-zero when any input fails to decode
    #[arg(long, default_value_t = false)]
    check: bool,

    /// print structure statistics instead of the reformatted text
    #[arg(long, default_value_t = false)]
    stats: bool,

    #[command(flatten)]
    output_settings: OutputSettings,
}

#[derive(Args, Debug)]
struct SqlTarget {
    #[command(flatten)]
    input_settings: InputSettings,

    /// emit compact output instead of reflowing
    #[arg(long, default_value_t = false)]
    minify: bool,

    /// run the advisory checks only; exits non-zero when any input has issues
    #[arg(long, default_value_t = false)]
    check: bool,

    /// print query statistics instead of the reformatted text
    #[arg(long, default_value_t = false)]
    stats: bool,

    #[command(flatten)]
    output_settings: OutputSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Json(target) => target.run(),
            Command::Sql(target) => target.run(),
        }
    }
}

impl JsonTarget {
    fn run(&self) -> anyhow::Result<()> {
        let sources = self.input_settings.load_sources()?;

        if self.check {
            let mut failures = 0usize;
            for (label, text) in &sources {
                match crate::json::validate(text) {
                    Ok(()) => println!("{} {label}", "ok".green()),
                    Err(error) => {
                        failures += 1;
                        let position = error
                            .offset
                            .map(|o| format!(" (byte {o})"))
                            .unwrap_or_default();
                        println!("{} {label}: {error}{position}", "error".red());
                    }
                }
            }
            if failures > 0 {
                anyhow::bail!("{failures} of {} inputs failed validation", sources.len());
            }
            return Ok(());
        }

        let mut chunks = Vec::new();
        for (label, text) in &sources {
            let chunk = if self.stats {
                let stats = crate::json::analyze(text)
                    .with_context(|| format!("failed to analyze {label}"))?;
                serde_json::to_string_pretty(&stats).expect("stats always serialize")
            } else if self.minify {
                crate::json::minify(text).with_context(|| format!("failed to minify {label}"))?
            } else {
                crate::json::reflow(text).with_context(|| format!("failed to reflow {label}"))?
            };
            chunks.push(chunk);
        }
        self.output_settings.write(&chunks.join("\n"))
    }
}

impl SqlTarget {
    fn run(&self) -> anyhow::Result<()> {
        let sources = self.input_settings.load_sources()?;

        if self.check {
            let mut failures = 0usize;
            for (label, text) in &sources {
                let result = crate::sql::validate(text);
                if result.valid {
                    println!("{} {label}", "ok".green());
                } else {
                    failures += 1;
                    println!("{} {label}", "issues".yellow());
                    for issue in &result.issues {
                        println!("  - {issue}");
                    }
                }
            }
            if failures > 0 {
                anyhow::bail!("{failures} of {} inputs reported issues", sources.len());
            }
            return Ok(());
        }

        let mut chunks = Vec::new();
        for (_label, text) in &sources {
            let chunk = if self.stats {
                let stats = crate::sql::analyze_stats(text);
                serde_json::to_string_pretty(&stats).expect("stats always serialize")
            } else if self.minify {
                crate::sql::minify(text)
            } else {
                crate::sql::reflow(text)
            };
            chunks.push(chunk);
        }
        self.output_settings.write(&chunks.join("\n"))
    }
}

impl InputSettings {
    fn load_sources(&self) -> anyhow::Result<Vec<(String, String)>> {
        let mut sources = Vec::new();
        for raw in &self.input {
            if raw == "-" {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read stdin")?;
                sources.push(("<stdin>".to_string(), text));
                continue;
            }
            for path in resolve_file_path_pattern(raw)? {
                let label = path.display().to_string();
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {label}"))?;
                sources.push((label, text));
            }
        }
        Ok(sources)
    }
}

impl OutputSettings {
    fn write(&self, content: &str) -> anyhow::Result<()> {
        match &self.out {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                }
                std::fs::write(path, content)
                    .with_context(|| format!("failed to write {}", path.display()))
            }
            None => {
                println!("{content}");
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_pattern(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    if !has_glob_chars(pattern) {
        // Treat as a literal path
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let mut matched = Vec::new();
    for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
        matched.push(entry.with_context(|| format!("failed to expand glob pattern: {pattern}"))?);
    }
    if matched.is_empty() {
        // Pattern was explicitly a glob but matched nothing -> surface as an error
        anyhow::bail!("glob pattern matched no files: {pattern}");
    }
    Ok(matched)
}
