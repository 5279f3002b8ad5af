use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Result, bail};
use ccf::{Config, DEFAULT_EXTS, run_with_config};
use clap::{ArgAction, Parser};

/// ccf - code comment filter.
///
/// Strip `/* */` and `//` comments from source files while keeping the code's
/// layout, so files can be compared, diffed or analyzed without their
/// comments. Comment markers are found by plain text search: markers inside
/// string literals are treated as comments too.
#[derive(Parser, Debug)]
#[command(
    name = "ccf",
    author,
    version,
    about = "Strip /* */ and // comments from source files",
    long_about = r#"Strip /* */ and // comments from source files, keeping layout.

By default it:
  • respects .gitignore / .ignore / git exclude files
  • filters C-style sources (rs, c, h, cpp, hpp, cc, js, ts, java, go, cs, swift, kt)
  • leaves text with an unclosed /* untouched by block removal
  • prints each file behind a path header

Typical usage:
  ccf -t java src
  ccf --check -t ts,js
  ccf - < Main.java
"#
)]
struct Args {
    /// File extensions / types to filter (e.g. java, rs).
    ///
    /// Can be repeated or comma-separated. Defaults to the C-style set.
    #[arg(
        short = 't',
        long = "type",
        alias = "ext",
        value_name = "EXT",
        action = ArgAction::Append,
        value_delimiter = ','
    )]
    exts: Vec<String>,

    /// Paths to scan (files or directories). Defaults to current directory.
    ///
    /// `-` reads stdin and writes the filtered text to stdout, no header.
    #[arg(value_name = "PATH", default_value = ".")]
    paths: Vec<PathBuf>,

    /// Follow symbolic links during traversal.
    #[arg(long = "follow-symlinks")]
    follow_symlinks: bool,

    /// Disable reading .gitignore / .ignore / git exclude files.
    #[arg(long = "no-gitignore")]
    no_gitignore: bool,

    /// Additional glob patterns to exclude (files or directories).
    ///
    /// Patterns are evaluated relative to each PATH root, e.g.:
    ///
    ///   ccf --exclude 'generated/**'
    #[arg(
        long = "exclude",
        short = 'E',
        value_name = "GLOB",
        action = ArgAction::Append,
        value_delimiter = ','
    )]
    excludes: Vec<String>,

    /// Maximum file size to filter, in bytes (skip larger files).
    #[arg(long = "max-bytes", value_name = "N")]
    max_bytes: Option<u64>,

    /// Output as a JSON array of objects
    /// { "path", "file_name", "had_comments", "content" }.
    #[arg(long = "json")]
    json: bool,

    /// Print an explicit END marker after each file.
    #[arg(long = "end-marker")]
    end_marker: bool,

    /// Only print files in which comments were found.
    #[arg(long = "only-commented")]
    only_commented: bool,

    /// Print only the paths of files that contain comments.
    ///
    /// Exits with status 1 when at least one file had comments.
    #[arg(long = "check", conflicts_with = "json")]
    check: bool,

    /// Report each file and a final summary on stderr.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() {
    match run() {
        Ok(true) => std::process::exit(1),
        Ok(false) => {}
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(1);
        }
    }
}

/// Returns true when `--check` found commented files.
fn run() -> Result<bool> {
    let args = Args::parse();

    let mut ext_set = HashSet::new();
    if args.exts.is_empty() {
        ext_set.extend(DEFAULT_EXTS.iter().map(|e| e.to_string()));
    }

    // Normalise extensions to lowercase, no leading dot.
    for e in &args.exts {
        let norm = e.trim().trim_start_matches('.').to_ascii_lowercase();
        if !norm.is_empty() {
            ext_set.insert(norm);
        }
    }

    if ext_set.is_empty() {
        bail!("No valid extensions provided (after normalisation).");
    }

    let check = args.check;
    let cfg = Config {
        exts: ext_set,
        paths: args.paths,
        follow_symlinks: args.follow_symlinks,

        no_gitignore: args.no_gitignore,
        json: args.json,
        excludes: args.excludes,
        max_bytes: args.max_bytes,
        end_marker: args.end_marker,
        only_commented: args.only_commented,
        check,
        verbose: args.verbose,
    };

    let summary = run_with_config(cfg)?;
    Ok(check && summary.commented > 0)
}
