//! Subcommand dispatch for the tracetime binary.

use std::error::Error;
use std::io;
use std::thread;
use std::time::Duration;

use clap::ArgMatches;
use log::info;

use tracetime_lib::tracer::TimeTracer;
use tracetime_lib::tree::{FolderAnalyzer, TreeOptions, Verbosity};

pub fn run(args: &ArgMatches) -> Result<i32, Box<dyn Error>> {
    match args.subcommand() {
        Some(("trace", sub)) => run_trace(sub),
        Some(("tree", sub)) => run_tree(sub),
        // arg_required_else_help keeps this unreachable from the shell.
        _ => Ok(-1),
    }
}

/// Drive a tracer through a fixed workload of timed segments.
fn run_trace(args: &ArgMatches) -> Result<i32, Box<dyn Error>> {
    let segments = args
        .get_one::<String>("segments")
        .unwrap()
        .parse::<usize>()?;
    let segment_ms = args
        .get_one::<String>("segment-ms")
        .unwrap()
        .parse::<u64>()?;
    let gap_ms = args.get_one::<String>("gap-ms").unwrap().parse::<u64>()?;
    let record = !args.get_flag("no-record");

    info!("tracing {} segments of {} ms", segments, segment_ms);

    let tracer = TimeTracer::new();
    tracer.start()?;
    for _ in 0..segments {
        tracer.mark_segment()?;
        thread::sleep(Duration::from_millis(segment_ms));
        tracer.mark_segment()?;
        thread::sleep(Duration::from_millis(gap_ms));
    }
    tracer.stop(record)?;

    Ok(0)
}

/// Analyze a directory tree and print its statistics.
fn run_tree(args: &ArgMatches) -> Result<i32, Box<dyn Error>> {
    let path = args.get_one::<String>("PATH").unwrap();
    let max_depth = match args.get_one::<String>("max-depth") {
        Some(raw) => Some(raw.parse::<usize>()?),
        None => None,
    };
    let json = args.get_flag("json");

    let verbosity = if json {
        Verbosity::Silent
    } else if args.get_flag("summary-only") {
        Verbosity::Summary
    } else {
        Verbosity::Tree
    };

    let options = TreeOptions {
        max_depth,
        include_hidden: args.get_flag("hidden"),
        verbosity,
        show_folders: !args.get_flag("no-folders"),
    };

    let mut analyzer = FolderAnalyzer::new(path);
    let mut stdout = io::stdout();
    let summary = analyzer.analyze(&options, &mut stdout)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(0)
}
