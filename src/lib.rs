use std::collections::HashSet;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};

pub mod block;
pub mod comments;

pub use crate::block::{BlockComment, BlockScan, CommentSpan, locate_block_comments};
pub use crate::comments::{
    CommentFilter, Removal, filter, remove_block_comments, remove_line_comments,
};

/// Extensions filtered when none are given: languages using `/* */` and `//`.
pub const DEFAULT_EXTS: &[&str] = &[
    "rs", "c", "h", "cpp", "hpp", "cc", "js", "ts", "java", "go", "cs", "swift", "kt",
];

/// Path argument that means "read stdin, write stdout".
pub const STDIN_PATH: &str = "-";

/// Configuration passed from the CLI layer (main.rs) into the core logic.
#[derive(Debug)]
pub struct Config {
    pub exts: HashSet<String>,
    pub paths: Vec<PathBuf>,
    pub follow_symlinks: bool,
    pub no_gitignore: bool,
    pub json: bool,
    pub excludes: Vec<String>,
    pub max_bytes: Option<u64>,
    pub end_marker: bool,
    pub only_commented: bool,
    pub check: bool,
    pub verbose: bool,
}

/// Counts gathered over one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub commented: usize,
}

impl Summary {
    fn record(&mut self, had_comments: bool) {
        self.files += 1;
        if had_comments {
            self.commented += 1;
        }
    }
}

#[derive(serde::Serialize)]
struct FileEntry {
    path: String,
    file_name: String,
    had_comments: bool,
    content: String,
}

/// Where a filtered text came from.
#[derive(Debug, Clone, Copy)]
enum Origin<'a> {
    Stdin,
    File {
        path: &'a Path,
        display_path: &'a str,
    },
}

impl Origin<'_> {
    fn display_path(&self) -> &str {
        match self {
            Origin::Stdin => STDIN_PATH,
            Origin::File { display_path, .. } => display_path,
        }
    }

    fn file_name(&self) -> String {
        match self {
            Origin::Stdin => STDIN_PATH.to_string(),
            Origin::File { path, .. } => path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
        }
    }
}

/// Output state shared by every filtered input of one run.
#[derive(Debug)]
struct Output {
    first_file: bool,
    summary: Summary,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            first_file: true,
            summary: Summary::default(),
        }
    }
}

impl Output {
    /// Report one filtered input in whichever mode the config selects.
    fn emit(&mut self, cfg: &Config, origin: Origin<'_>, filtered: CommentFilter) -> Result<()> {
        let display_path = origin.display_path();
        self.summary.record(filtered.had_comments());

        if cfg.verbose {
            let verdict = if filtered.had_comments() {
                "comments removed"
            } else {
                "no comments"
            };
            eprintln!("{display_path}: {verdict}");
        }

        if cfg.check {
            if filtered.had_comments() {
                println!("{display_path}");
            }
            return Ok(());
        }

        if cfg.only_commented && !filtered.had_comments() {
            return Ok(());
        }

        if cfg.json {
            if !self.first_file {
                println!(",");
            }
            self.first_file = false;
            return print_file_json(&origin, filtered);
        }

        match origin {
            // Piped text is written back bare so ccf works as a filter.
            Origin::Stdin => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(filtered.output().as_bytes())?;
                stdout.flush()?;
            }
            Origin::File { display_path, .. } => {
                print_file(display_path, filtered.output(), cfg.end_marker);
            }
        }

        Ok(())
    }
}

pub fn run_with_config(cfg: Config) -> Result<Summary> {
    let exclude_globset = build_exclude_globset(&cfg.excludes)?;

    let mut out = Output::default();
    let mut had_error = false;

    if cfg.json {
        println!("[");
    }

    for raw_root in &cfg.paths {
        if raw_root.as_os_str() == STDIN_PATH {
            let filtered = filter_stdin().context("Failed to filter stdin")?;
            out.emit(&cfg, Origin::Stdin, filtered)
                .context("Failed to write filtered stdin")?;
            continue;
        }

        // Canonicalise roots so running from arbitrary working dirs is reliable.
        let canon_root = match raw_root.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Skipping root {:?}: {}", raw_root, e);
                had_error = true;
                continue;
            }
        };

        let mut builder = WalkBuilder::new(&canon_root);
        builder.follow_links(cfg.follow_symlinks);

        // Helps avoid edge cases where process CWD is invalid and global ignores need a base.
        builder.current_dir(canon_root.clone());

        if cfg.no_gitignore {
            builder
                .git_ignore(false)
                .git_exclude(false)
                .git_global(false)
                .ignore(false);
        } else {
            builder
                .git_ignore(true)
                .git_exclude(true)
                .git_global(true)
                .ignore(true)
                .require_git(false);
        }

        // Values moved into the 'static filter closure must be owned separately.
        let root_for_filter = canon_root.clone();
        let exclude_globset = exclude_globset.clone();

        builder.filter_entry(move |entry: &DirEntry| {
            // Always keep the root.
            if entry.depth() == 0 {
                return true;
            }

            // Apply user exclude globs, relative to the current root.
            if let Some(ref gs) = exclude_globset {
                let path = entry.path();
                let rel = path.strip_prefix(&root_for_filter).unwrap_or(path);
                let rel_norm = normalize_for_matching(rel);

                if gs.is_match(&rel_norm) {
                    return false;
                }

                // Directories also get a trailing slash so `tests/**` prunes the subtree.
                if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false)
                    && !rel_norm.ends_with('/')
                {
                    let rel_dir = format!("{rel_norm}/");
                    if gs.is_match(&rel_dir) {
                        return false;
                    }
                }
            }

            true
        });

        for result in builder.build() {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    eprintln!("Walk error: {err}");
                    had_error = true;
                    continue;
                }
            };

            if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                continue;
            }

            let path = entry.path();
            if !matches_ext(path, &cfg.exts) {
                continue;
            }

            let display_path = make_display_path(&canon_root, path);

            if let Some(limit) = cfg.max_bytes
                && let Ok(meta) = fs::metadata(path)
                && meta.len() > limit
            {
                eprintln!(
                    "Skipping {} (size {} bytes > max {} bytes)",
                    display_path,
                    meta.len(),
                    limit
                );
                continue;
            }

            let filtered = match filter_file(path, &display_path) {
                Ok(f) => f,
                Err(err) => {
                    eprintln!("Error printing {}: {:#}", display_path, err);
                    had_error = true;
                    continue;
                }
            };

            let origin = Origin::File {
                path,
                display_path: &display_path,
            };
            if let Err(err) = out.emit(&cfg, origin, filtered) {
                eprintln!("Error printing {}: {:#}", display_path, err);
                had_error = true;
            }
        }
    }

    if cfg.json {
        println!("\n]");
    }

    let summary = out.summary;
    if cfg.verbose {
        eprintln!(
            "Filtered {} file(s), {} had comments",
            summary.files, summary.commented
        );
    }

    if had_error {
        anyhow::bail!("One or more files could not be read. See stderr for details.");
    }

    Ok(summary)
}

/// Build a GlobSet from the user–provided `--exclude` patterns.
/// Returns `Ok(None)` if there are no patterns.
fn build_exclude_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();

    for pat in patterns {
        let pat = pat.trim();
        if pat.is_empty() {
            continue;
        }

        let glob =
            Glob::new(pat).with_context(|| format!("Invalid --exclude glob pattern: {pat}"))?;
        builder.add(glob);
    }

    let set = builder
        .build()
        .context("Failed to build exclude glob set")?;

    Ok(Some(set))
}

/// Case-insensitive extension match, using the provided extension set.
pub fn matches_ext(path: &Path, exts: &HashSet<String>) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => exts.contains(&ext.to_ascii_lowercase()),
        None => false,
    }
}

/// Produce a display path relative to `root` (stable regardless of current working directory).
pub fn make_display_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);

    // If root is a file and path == root, rel is empty.
    if rel.as_os_str().is_empty() {
        return path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
    }

    normalize_for_matching(rel)
}

/// Read a file (lossily as UTF-8) and strip its comments.
pub fn filter_file(path: &Path, display_path: &str) -> Result<CommentFilter> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", display_path))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(CommentFilter::new(&text))
}

/// Read stdin (lossily as UTF-8) and strip its comments.
fn filter_stdin() -> Result<CommentFilter> {
    let mut bytes = Vec::new();
    io::stdin()
        .read_to_end(&mut bytes)
        .context("Failed to read stdin")?;
    Ok(CommentFilter::new(&String::from_utf8_lossy(&bytes)))
}

/// Print a single filtered file with header (and optional end marker).
fn print_file(display_path: &str, text: &str, end_marker: bool) {
    println!("========== FILE: {} ==========", display_path);
    print!("{text}");

    // Ensure there is a trailing newline before the separator between files.
    if !text.ends_with('\n') {
        println!();
    }

    if end_marker {
        println!("========== END FILE: {} ==========\n", display_path);
    } else {
        println!();
    }
}

fn print_file_json(origin: &Origin<'_>, filtered: CommentFilter) -> Result<()> {
    let entry = FileEntry {
        path: origin.display_path().to_string(),
        file_name: origin.file_name(),
        had_comments: filtered.had_comments(),
        content: filtered.into_output(),
    };

    let json = serde_json::to_string(&entry)?;
    print!("{}", json);

    Ok(())
}

/// Convert paths to a stable, slash-separated form for matching/printing.
fn normalize_for_matching(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
