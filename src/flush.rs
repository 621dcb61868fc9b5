//! Writing a staged session to disk
//!
//! Flush materializes a [`BuildContext`] below a pack's `data/` directory in
//! two sequential passes:
//!
//! 1.  **Create folders** in registry order. The registry guarantees parents
//!     precede children, so each folder is created with a single
//!     `create_dir`. A folder that already exists counts as created; a
//!     regular file in its place is an error.
//! 2.  **Write files** in first-staged order, JSON pretty-printed with four
//!     spaces and text verbatim.
//!
//! Any other filesystem error aborts the flush immediately. There is no retry
//! and no rollback: whatever was written before the failure stays on disk.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info};

use crate::context::BuildContext;
use crate::error::{Error, Result};

/// Counts of what a flush wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub folders: usize,
    pub files: usize,
}

/// Create every registered folder, then write every staged file.
pub fn execute(ctx: &BuildContext, data_path: &Path) -> Result<FlushReport> {
    let mut report = FlushReport::default();

    for folder in ctx.folders() {
        let full_path = folder.to_path(data_path);
        match fs::create_dir(&full_path) {
            Ok(()) => info!("New folder: {}", full_path.display()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && full_path.is_dir() => {
                debug!("Folder already exists: {}", full_path.display())
            }
            Err(e) => {
                return Err(Error::Filesystem {
                    message: format!(
                        "Failed to create directory '{}': {}",
                        full_path.display(),
                        e
                    ),
                })
            }
        }
        report.folders += 1;
    }

    for (relative_path, content) in ctx.files().iter() {
        let full_path = relative_path.to_path(data_path);
        let bytes = content.render()?;
        fs::write(&full_path, bytes).map_err(|e| Error::Filesystem {
            message: format!("Failed to write file '{}': {}", full_path.display(), e),
        })?;
        info!("New file: {}", relative_path);
        report.files += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::execute;
    use crate::context::BuildContext;
    use crate::path::VirtualPath;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn vp(s: &str) -> VirtualPath {
        VirtualPath::parse(s).unwrap()
    }

    #[test]
    fn test_flush_writes_folders_and_files() {
        let temp_dir = TempDir::new().unwrap();
        let data_path = temp_dir.path();

        let mut ctx = BuildContext::new("pack", Vec::new()).unwrap();
        ctx.stage_json(vp("pack/recipe/stick.json"), json!({"type": "x"}));
        ctx.stage_text(vp("pack/functions/load.mcfunction"), "say loaded");

        let report = execute(&ctx, data_path).unwrap();
        assert_eq!(report.folders, 3);
        assert_eq!(report.files, 2);

        assert!(data_path.join("pack/recipe").is_dir());
        assert_eq!(
            fs::read_to_string(data_path.join("pack/recipe/stick.json")).unwrap(),
            "{\n    \"type\": \"x\"\n}"
        );
        assert_eq!(
            fs::read_to_string(data_path.join("pack/functions/load.mcfunction")).unwrap(),
            "say loaded"
        );
    }

    #[test]
    fn test_flush_existing_folder_is_success() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("pack/functions")).unwrap();

        let mut ctx = BuildContext::new("pack", Vec::new()).unwrap();
        ctx.stage_text(vp("pack/functions/tick.mcfunction"), "say tick");

        let report = execute(&ctx, temp_dir.path()).unwrap();
        assert_eq!(report.folders, 2);
        assert!(temp_dir.path().join("pack/functions/tick.mcfunction").exists());
    }

    #[test]
    fn test_flush_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("pack")).unwrap();
        fs::write(temp_dir.path().join("pack/a.txt"), "old content").unwrap();

        let mut ctx = BuildContext::new("pack", Vec::new()).unwrap();
        ctx.stage_text(vp("pack/a.txt"), "new content");
        execute(&ctx, temp_dir.path()).unwrap();

        assert_eq!(
            fs::read_to_string(temp_dir.path().join("pack/a.txt")).unwrap(),
            "new content"
        );
    }

    #[test]
    fn test_flush_missing_data_dir_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does/not/exist");

        let ctx = BuildContext::new("pack", Vec::new()).unwrap();
        let err = execute(&ctx, &missing).unwrap_err();
        assert!(err.to_string().contains("Failed to create directory"));
    }

    #[test]
    fn test_flush_file_in_place_of_folder_fails() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("pack")).unwrap();
        fs::write(temp_dir.path().join("pack/functions"), "not a dir").unwrap();

        let mut ctx = BuildContext::new("pack", Vec::new()).unwrap();
        ctx.stage_text(vp("pack/functions/tick.mcfunction"), "say tick");

        let err = execute(&ctx, temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to create directory"));
        assert!(err.to_string().contains("functions"));
    }

    #[test]
    fn test_flush_stops_at_first_file_error_without_rollback() {
        let temp_dir = TempDir::new().unwrap();

        let mut ctx = BuildContext::new("pack", Vec::new()).unwrap();
        ctx.stage_text(vp("pack/first.txt"), "1");
        ctx.stage_text(vp("pack/second.txt"), "2");
        ctx.stage_text(vp("pack/third.txt"), "3");

        // A directory where a file is expected makes the second write fail.
        fs::create_dir_all(temp_dir.path().join("pack/second.txt")).unwrap();

        let err = execute(&ctx, temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("second.txt"));
        assert!(temp_dir.path().join("pack/first.txt").exists());
        assert!(!temp_dir.path().join("pack/third.txt").exists());
    }
}
