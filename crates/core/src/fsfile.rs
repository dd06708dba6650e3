use crate::batch::{BatchFile, RenameError};
use crate::evaluate::FileView;
use chrono::{DateTime, Local};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// `FileView`/`BatchFile` over a real path on disk.
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
}

impl DiskFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn component_name(path: Option<&Path>) -> String {
    path.and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

impl FileView for DiskFile {
    fn name(&self) -> String {
        component_name(Some(&self.path))
    }

    fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    fn extension(&self) -> String {
        self.path
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    fn parent_name(&self) -> String {
        component_name(self.path.parent())
    }

    fn grandparent_name(&self) -> String {
        component_name(self.path.parent().and_then(|p| p.parent()))
    }

    fn size(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    fn modified(&self) -> Option<DateTime<Local>> {
        let time = fs::metadata(&self.path).ok()?.modified().ok()?;
        Some(DateTime::from(time))
    }
}

impl BatchFile for DiskFile {
    fn rename(&mut self, new_name: &str) -> Result<(), RenameError> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let target = parent.join(new_name);
        if target == self.path {
            return Ok(());
        }
        // std::fs::rename silently replaces an existing file; a name
        // collision must fail the row instead.
        if target.exists() {
            return Err(RenameError::AlreadyExists);
        }
        fs::rename(&self.path, &target).map_err(|err| match err.kind() {
            ErrorKind::NotFound => RenameError::NotFound,
            ErrorKind::PermissionDenied => RenameError::PermissionDenied,
            ErrorKind::AlreadyExists => RenameError::AlreadyExists,
            _ => RenameError::Io(err),
        })?;
        self.path = target;
        Ok(())
    }
}
