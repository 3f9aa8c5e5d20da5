use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use bms_library::db;
use bms_library::fs_ops::DiskFs;
use bms_library::logging::init_logger;
use bms_library::progress::{create_progress_bar, register_bar, set_log_only, unregister_bar};
use bms_library::resolver::{write_summary, Resolver};
use bms_library::Library;

#[derive(Parser)]
#[command(name = "bms-dedupe")]
#[command(about = "Merge BMS charts stored in several folders into their preferred location")]
struct Args {
    /// Library root holding config_sys.json (or config.json) and songdata.db
    folder_path: PathBuf,

    /// Report what would happen without touching any file
    #[arg(short, long)]
    dry_run: bool,

    /// Hide per-chart info and warning lines (default)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show per-chart info and warning lines
    #[arg(short, long)]
    verbose: bool,

    /// Hide the progress bar (tail-friendly output)
    #[arg(long)]
    log_only: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let verbose = args.verbose && !args.quiet;
    init_logger(if verbose { "info" } else { "error" });
    set_log_only(args.log_only);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", style(format!("E: {:#}. aborting.", err)).red());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let start = Instant::now();

    let library = Library::locate(&args.folder_path)?;
    let roots = library.root_folders()?;
    let groups = db::load_duplicate_groups(&library.db_path, |p| library.resolve(p))
        .context("Failed to read duplicate songs")?;

    let total = groups.duplicate_count();
    println!("I: Found {} duplicated charts.", total);
    if args.dry_run {
        println!("I: Dry run, no file will be changed.");
    }

    let pb = create_progress_bar(total as u64, "Merging");
    register_bar(&pb);
    let report = Resolver::new(&roots, &DiskFs, args.dry_run)
        .protect(library.root.clone())
        .run(&groups, &pb);
    pb.finish();
    unregister_bar();

    write_summary(&mut io::stdout().lock(), &report)?;
    println!("I: Done in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}
