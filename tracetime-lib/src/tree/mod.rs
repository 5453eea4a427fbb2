//! Breadth-first directory analysis with tree-formatted console output.
//!
//! [`FolderAnalyzer`] walks a directory tree level by level, collecting
//! per-level and total file statistics. Unreadable subdirectories are
//! reported and skipped; only a failure to read the root aborts the walk.

use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::warn;
use serde::Serialize;

const FOLDER_NAMES_PER_LINE: usize = 10;
const NO_EXTENSION: &str = "(none)";
const RULE_WIDTH: usize = 50;

/// How much of the walk is printed while analyzing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Per-level tree output plus the final totals.
    Tree,
    /// Only the final totals.
    Summary,
    /// No printing; results are returned only.
    Silent,
}

/// Options controlling a directory walk.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Deepest level to visit; the root is level 0. `None` is unlimited.
    pub max_depth: Option<usize>,
    /// Visit entries whose name starts with a dot.
    pub include_hidden: bool,
    pub verbosity: Verbosity,
    /// List folder names in tree output.
    pub show_folders: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            include_hidden: false,
            verbosity: Verbosity::Tree,
            show_folders: true,
        }
    }
}

/// Statistics for one visited directory.
#[derive(Debug, Clone, Serialize)]
pub struct LayerStats {
    pub path: PathBuf,
    pub level: usize,
    pub dir_names: Vec<String>,
    pub file_count: usize,
    pub file_types: BTreeMap<String, usize>,
}

/// Whole-walk totals.
#[derive(Debug, Clone, Serialize)]
pub struct TreeSummary {
    pub root: PathBuf,
    pub total_files: usize,
    pub total_dirs: usize,
    /// Number of levels visited, the root included.
    pub levels: usize,
    pub file_types: BTreeMap<String, usize>,
}

/// Level-order directory walker.
pub struct FolderAnalyzer {
    root: PathBuf,
    layers: Vec<LayerStats>,
    analyzed: bool,
}

impl FolderAnalyzer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            layers: Vec::new(),
            analyzed: false,
        }
    }

    /// Walk the tree breadth-first, printing according to `options`.
    ///
    /// Returns the whole-walk totals; per-directory statistics stay
    /// available through [`layers`] afterwards.
    ///
    /// [`layers`]: Self::layers
    pub fn analyze(
        &mut self,
        options: &TreeOptions,
        out: &mut dyn Write,
    ) -> io::Result<TreeSummary> {
        self.layers.clear();
        self.analyzed = false;

        // The root must be listable; everything below degrades gracefully.
        fs::read_dir(&self.root)?;

        let mut total_files = 0usize;
        let mut total_dirs = 0usize;
        let mut max_level = 0usize;
        let mut file_types: BTreeMap<String, usize> = BTreeMap::new();

        if options.verbosity != Verbosity::Silent {
            writeln!(out, "scanning {}", self.root.display())?;
            writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        }

        let mut queue = VecDeque::new();
        queue.push_back((self.root.clone(), 0usize));

        while let Some((dir, level)) = queue.pop_front() {
            if let Some(max_depth) = options.max_depth {
                if level > max_depth {
                    continue;
                }
            }

            let entries = match read_sorted_entries(&dir, options.include_hidden) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("skipping unreadable directory {}: {}", dir.display(), err);
                    if options.verbosity == Verbosity::Tree {
                        let indent = "│   ".repeat(level);
                        writeln!(out, "{}├── (unreadable) {}", indent, dir.display())?;
                    }
                    continue;
                }
            };

            let mut dir_names = Vec::new();
            let mut file_count = 0usize;
            let mut level_types: BTreeMap<String, usize> = BTreeMap::new();

            for (name, path, is_dir) in entries {
                if is_dir {
                    dir_names.push(name);
                    queue.push_back((path, level + 1));
                } else {
                    file_count += 1;
                    let bucket = extension_bucket(&path);
                    *level_types.entry(bucket.clone()).or_insert(0) += 1;
                    *file_types.entry(bucket).or_insert(0) += 1;
                }
            }

            total_files += file_count;
            total_dirs += dir_names.len();
            max_level = max_level.max(level);

            if options.verbosity == Verbosity::Tree {
                print_layer(out, level, &dir, &dir_names, file_count, &level_types, options)?;
            }

            self.layers.push(LayerStats {
                path: dir,
                level,
                dir_names,
                file_count,
                file_types: level_types,
            });
        }

        self.analyzed = true;

        let summary = TreeSummary {
            root: self.root.clone(),
            total_files,
            total_dirs,
            levels: max_level + 1,
            file_types,
        };

        if options.verbosity != Verbosity::Silent {
            print_summary(out, &summary)?;
        }

        Ok(summary)
    }

    /// Per-directory statistics from the last walk, in visit order.
    pub fn layers(&self) -> &[LayerStats] {
        &self.layers
    }

    /// Return true once a walk has completed.
    pub fn analyzed(&self) -> bool {
        self.analyzed
    }
}

/// Read a directory's entries, sorted by name for deterministic output.
fn read_sorted_entries(
    dir: &Path,
    include_hidden: bool,
) -> io::Result<Vec<(String, PathBuf, bool)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping entry in {}: {}", dir.display(), err);
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        if !include_hidden && name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        let is_dir = path.is_dir();
        entries.push((name, path, is_dir));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

fn extension_bucket(path: &Path) -> String {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_lowercase()),
        _ => NO_EXTENSION.to_string(),
    }
}

fn print_layer(
    out: &mut dyn Write,
    level: usize,
    dir: &Path,
    dir_names: &[String],
    file_count: usize,
    file_types: &BTreeMap<String, usize>,
    options: &TreeOptions,
) -> io::Result<()> {
    let indent = "│   ".repeat(level);
    writeln!(out, "{}├── [level {}] {}", indent, level, dir.display())?;
    writeln!(out, "{}│   ├── folders: {}", indent, dir_names.len())?;
    writeln!(out, "{}│   ├── files: {}", indent, file_count)?;

    if options.show_folders && !dir_names.is_empty() {
        writeln!(out, "{}│   ├── folder names:", indent)?;
        for chunk in dir_names.chunks(FOLDER_NAMES_PER_LINE) {
            writeln!(out, "{}│   │   ├── {}", indent, chunk.join(", "))?;
        }
    }

    if file_count > 0 {
        writeln!(out, "{}│   └── file types:", indent)?;
        for (bucket, count) in file_types {
            writeln!(out, "{}│       ├── {}: {}", indent, bucket, count)?;
        }
    }

    Ok(())
}

fn print_summary(out: &mut dyn Write, summary: &TreeSummary) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "scan of {} complete", summary.root.display())?;
    writeln!(out, "├── total files: {}", summary.total_files)?;
    writeln!(out, "├── total folders: {}", summary.total_dirs)?;
    writeln!(out, "└── file types:")?;
    for (bucket, count) in &summary.file_types {
        writeln!(out, "    ├── {}: {}", bucket, count)?;
    }
    Ok(())
}
