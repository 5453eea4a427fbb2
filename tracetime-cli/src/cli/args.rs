//! CLI argument definitions for `tracetime-cli`.

use clap::{Arg, ArgAction, Command};

/// Build the CLI argument parser and command definitions.
pub fn build_cli() -> Command {
    // Build the CLI definition in one place to keep main.rs slim.
    Command::new("Tracetime")
        .version("0.1.0")
        .about("Live console time tracing and directory analysis")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("trace")
                .about("Run a demo traced workload with a live status line")
                .arg(
                    Arg::new("segments")
                        .long("segments")
                        .short('n')
                        .value_name("COUNT")
                        .default_value("2")
                        .help("Number of timed segments to run"),
                )
                .arg(
                    Arg::new("segment-ms")
                        .long("segment-ms")
                        .value_name("MS")
                        .default_value("600")
                        .help("Length of each segment in milliseconds"),
                )
                .arg(
                    Arg::new("gap-ms")
                        .long("gap-ms")
                        .value_name("MS")
                        .default_value("250")
                        .help("Pause between segments in milliseconds"),
                )
                .arg(
                    Arg::new("no-record")
                        .long("no-record")
                        .action(ArgAction::SetTrue)
                        .help("Skip the end-of-run record summary"),
                ),
        )
        .subcommand(
            Command::new("tree")
                .about("Analyze a directory tree breadth-first")
                .arg(
                    Arg::new("PATH")
                        .required(true)
                        .help("Root directory to analyze"),
                )
                .arg(
                    Arg::new("max-depth")
                        .long("max-depth")
                        .short('d')
                        .value_name("LEVELS")
                        .help("Deepest level to visit (the root is level 0)"),
                )
                .arg(
                    Arg::new("hidden")
                        .long("hidden")
                        .action(ArgAction::SetTrue)
                        .help("Include hidden files and directories"),
                )
                .arg(
                    Arg::new("summary-only")
                        .long("summary-only")
                        .action(ArgAction::SetTrue)
                        .help("Print only the final totals"),
                )
                .arg(
                    Arg::new("no-folders")
                        .long("no-folders")
                        .action(ArgAction::SetTrue)
                        .help("Omit folder name lists from tree output"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Emit the summary as JSON instead of text"),
                ),
        )
}
