//! Search the song DB by title and open the chart's folder.
//!
//! Usage: bms-open-folder <folder_path>

use anyhow::Result;
use clap::Parser;
use console::style;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use bms_library::library::{database_path, open_root};
use bms_library::logging::init_logger;
use bms_library::opener::{FolderOpener, SystemLauncher};
use bms_library::prompt::Prompter;

#[derive(Parser)]
#[command(name = "bms-open-folder")]
#[command(about = "Find a BMS song by title and open its folder")]
struct Args {
    /// Library root holding songdata.db
    folder_path: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger("warn");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", style(format!("E: {:#}", err)).red());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let root = open_root(&args.folder_path)?;
    let db_path = database_path(&root)?;

    let prompter = Prompter::new(io::stdin().lock(), io::stdout());
    let mut opener = FolderOpener::new(root, db_path, prompter, SystemLauncher);
    opener.run()?;
    Ok(())
}
