mod batch;
mod config;
mod convert;
mod counter;
mod evaluate;
mod fsfile;
mod profile;
mod replace;
mod template;

pub const DEFAULT_TEMPLATE: &str = "$N";

pub use batch::{ApplyOutcome, Batch, BatchFile, BatchState, FocusTracker, RenameError, RenameRow};
pub use config::{app_paths, load_profiles, save_profiles, AppPaths, ProfileStore};
pub use convert::{CaseConversion, TrimBlanks};
pub use counter::CounterState;
pub use evaluate::{evaluate, FileView, MetadataService};
pub use fsfile::DiskFile;
pub use profile::Profile;
pub use replace::{apply_replace_chain, compile_replace_chain, RegexReplace, ReplacePattern};
pub use template::{CounterWidth, DateField, Range, Tag, Template, TemplatePart};
