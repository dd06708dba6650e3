use crate::convert::TrimBlanks;
use crate::evaluate::{evaluate, FileView, MetadataService};
use crate::profile::Profile;
use crate::replace::{apply_replace_chain, compile_replace_chain};
use crate::template::Template;
use chrono::Local;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("ファイルが見つかりません")]
    NotFound,
    #[error("アクセスが拒否されました")]
    PermissionDenied,
    #[error("同名のファイルが既に存在します")]
    AlreadyExists,
    #[error("リネームに失敗しました: {0}")]
    Io(#[from] std::io::Error),
}

/// A batch member that can also be renamed in place.
pub trait BatchFile: FileView {
    fn rename(&mut self, new_name: &str) -> Result<(), RenameError>;
}

/// Per-file working record. `original_name` tracks the current display
/// name: it is updated when a rename succeeds.
pub struct RenameRow {
    file: Box<dyn BatchFile>,
    pub original_name: String,
    pub computed_name: String,
    pub rename_failed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Previewing,
    Applying,
    Done,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub renamed: usize,
    pub failed: usize,
    pub unchanged: usize,
    pub new_focus: Option<String>,
}

/// Remembers which file was focused before Apply and yields its new
/// name afterwards, but only if that file's rename succeeded.
pub struct FocusTracker {
    wanted: Option<String>,
    new_name: Option<String>,
}

impl FocusTracker {
    pub fn new(focused: Option<&str>) -> Self {
        Self {
            wanted: focused.map(str::to_string),
            new_name: None,
        }
    }

    pub fn record_success(&mut self, old_name: &str, new_name: &str) {
        if self.new_name.is_none() && self.wanted.as_deref() == Some(old_name) {
            self.new_name = Some(new_name.to_string());
        }
    }

    pub fn into_new_name(self) -> Option<String> {
        self.new_name
    }
}

/// The fixed-order set of files being renamed in one run.
///
/// `preview` computes names without touching any file and may be
/// re-run after every profile edit; `apply` issues the actual renames
/// sequentially in row order and keeps going past per-row failures.
pub struct Batch {
    rows: Vec<RenameRow>,
    state: BatchState,
    preview_valid: bool,
}

impl Batch {
    pub fn new(files: Vec<Box<dyn BatchFile>>) -> Self {
        let rows = files
            .into_iter()
            .map(|file| {
                let original_name = file.name();
                RenameRow {
                    file,
                    original_name,
                    computed_name: String::new(),
                    rename_failed: false,
                }
            })
            .collect();
        Self {
            rows,
            state: BatchState::Idle,
            preview_valid: false,
        }
    }

    pub fn rows(&self) -> &[RenameRow] {
        &self.rows
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Callers invoke this after any profile mutation; the next apply
    /// re-runs the preview instead of trusting stale computed names.
    pub fn invalidate_preview(&mut self) {
        self.preview_valid = false;
    }

    pub fn preview(&mut self, profile: &Profile, metadata: Option<&dyn MetadataService>) {
        let template = Template::compile(&profile.template);
        let rules = compile_replace_chain(&profile.patterns);
        let mut counter = profile.counter();
        counter.reset(self.rows.len());
        let now = Local::now();

        for row in &mut self.rows {
            let file: &dyn FileView = row.file.as_ref();
            let name = evaluate(&template, file, metadata, &counter, now);
            let name = apply_replace_chain(&rules, name);
            let name = profile.case_conversion.apply(&name);
            let name = match profile.trim_blanks {
                TrimBlanks::None => name,
                trim => trim.apply(&name).to_string(),
            };
            row.computed_name = name;
            counter.advance();
        }

        self.state = BatchState::Previewing;
        self.preview_valid = true;
    }

    /// Renames every row whose computed name differs from its current
    /// name. Rows fail independently; the batch never stops early.
    pub fn apply(
        &mut self,
        profile: &Profile,
        metadata: Option<&dyn MetadataService>,
        focused: Option<&str>,
    ) -> ApplyOutcome {
        if !self.preview_valid {
            self.preview(profile, metadata);
        }
        self.state = BatchState::Applying;

        let mut tracker = FocusTracker::new(focused);
        let mut outcome = ApplyOutcome::default();

        for row in &mut self.rows {
            if row.computed_name == row.original_name {
                outcome.unchanged += 1;
                continue;
            }
            match row.file.rename(&row.computed_name) {
                Ok(()) => {
                    tracker.record_success(&row.original_name, &row.computed_name);
                    row.original_name = row.computed_name.clone();
                    row.rename_failed = false;
                    outcome.renamed += 1;
                }
                Err(_) => {
                    row.rename_failed = true;
                    outcome.failed += 1;
                }
            }
        }

        outcome.new_focus = tracker.into_new_name();
        self.state = BatchState::Done;
        // Display names moved; any further apply must re-preview.
        self.preview_valid = false;
        outcome
    }
}
