//! Interactive "find a song, open its folder" loop.
//!
//! The loop is a small state machine. Cancelling a selection returns to the
//! search prompt; cancelling the search prompt ends the session.

use console::style;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::db;
use crate::error::Result;
use crate::library::resolve_against;
use crate::models::{CandidateFolder, CandidateFolders, SongRecord};
use crate::prompt::Prompter;

pub const SEARCH_PROMPT: &str = "enter bms song title to open folder";
pub const CHOOSE_PROMPT: &str = "choose song to open (ctrl+d to cancel)";

/// Opens a folder in the platform file browser.
pub trait FolderLauncher {
    fn launch(&mut self, folder: &Path);
}

/// Launches through the OS handler; the outcome is not observed.
#[derive(Debug, Default)]
pub struct SystemLauncher;

impl FolderLauncher for SystemLauncher {
    fn launch(&mut self, folder: &Path) {
        if let Err(err) = open::that_detached(folder) {
            debug!("failed to open {}: {}", folder.display(), err);
        }
    }
}

#[derive(Debug)]
pub enum OpenerState {
    Prompting,
    ShowingCandidates(CandidateFolders),
    ConfirmingSingle(CandidateFolders),
    SelectingMultiple(CandidateFolders),
    Exiting,
}

pub struct FolderOpener<R, W, L> {
    root: PathBuf,
    db_path: PathBuf,
    prompter: Prompter<R, W>,
    launcher: L,
}

impl<R: BufRead, W: Write, L: FolderLauncher> FolderOpener<R, W, L> {
    pub fn new(root: PathBuf, db_path: PathBuf, prompter: Prompter<R, W>, launcher: L) -> Self {
        Self {
            root,
            db_path,
            prompter,
            launcher,
        }
    }

    /// Run until the search prompt is cancelled.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.prompter.output(), "Ctrl+D to quit, Ctrl+C to abort")?;
        let mut state = OpenerState::Prompting;
        loop {
            state = match state {
                OpenerState::Exiting => return Ok(()),
                state => self.step(state)?,
            };
        }
    }

    pub fn step(&mut self, state: OpenerState) -> Result<OpenerState> {
        let next = match state {
            OpenerState::Prompting => match self.prompter.read_line(SEARCH_PROMPT)? {
                None => OpenerState::Exiting,
                Some(term) if term.is_empty() => OpenerState::Prompting,
                Some(term) => {
                    let candidates = self.search(&term)?;
                    if candidates.is_empty() {
                        writeln!(
                            self.prompter.output(),
                            "{}",
                            style("matching song not found").yellow()
                        )?;
                        OpenerState::Prompting
                    } else {
                        OpenerState::ShowingCandidates(candidates)
                    }
                }
            },
            OpenerState::ShowingCandidates(candidates) => {
                writeln!(self.prompter.output(), "{}", render_candidates(&candidates))?;
                if candidates.len() == 1 {
                    OpenerState::ConfirmingSingle(candidates)
                } else {
                    OpenerState::SelectingMultiple(candidates)
                }
            }
            OpenerState::ConfirmingSingle(candidates) => {
                if let Some(folder) = candidates.folder(0) {
                    let question = format!("open folder {}?", folder.display());
                    if self.prompter.confirm(&question, true)? == Some(true) {
                        self.launcher.launch(folder);
                    }
                }
                OpenerState::Prompting
            }
            OpenerState::SelectingMultiple(candidates) => {
                let choice = self
                    .prompter
                    .choose_index(CHOOSE_PROMPT, candidates.len(), 0)?;
                if let Some(folder) = choice.and_then(|idx| candidates.folder(idx)) {
                    self.launcher.launch(folder);
                }
                OpenerState::Prompting
            }
            OpenerState::Exiting => OpenerState::Exiting,
        };
        Ok(next)
    }

    fn search(&self, term: &str) -> Result<CandidateFolders> {
        let conn = db::open_read_only(&self.db_path)?;
        let songs = db::search_title_prefix(&conn, term)?;
        Ok(group_by_folder(&self.root, songs))
    }

    pub fn into_parts(self) -> (Prompter<R, W>, L) {
        (self.prompter, self.launcher)
    }
}

/// Group songs by their resolved containing folder, in first-seen order.
pub fn group_by_folder(root: &Path, songs: Vec<SongRecord>) -> CandidateFolders {
    let mut candidates = CandidateFolders::new();
    for song in songs {
        let path = resolve_against(root, &song.path);
        let path = fs::canonicalize(&path).unwrap_or(path);
        let folder = path.parent().map(Path::to_path_buf).unwrap_or_default();
        candidates.push(folder, song.title);
    }
    candidates
}

pub fn render_candidate(idx: usize, candidate: &CandidateFolder) -> String {
    let others = match candidate.other_count() {
        0 => String::new(),
        1 => " and 1 other chart".to_string(),
        n => format!(" and {} other charts", n),
    };
    format!(
        "[{:>2}] {}{} -> {}",
        idx,
        candidate.representative(),
        others,
        candidate.folder.display()
    )
}

pub fn render_candidates(candidates: &CandidateFolders) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| render_candidate(idx, c))
        .collect::<Vec<_>>()
        .join("\n")
}
