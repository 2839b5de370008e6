use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

pub const RESUME_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

impl ResumeFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn modified_display(&self) -> String {
        DateTime::<Local>::from(self.modified)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }
}

/// Scan `directory` for resume documents, newest first. A missing or
/// unreadable directory yields an empty list; the caller decides whether to
/// proceed without an attachment.
pub fn find_resume_files(directory: &Path) -> Vec<ResumeFile> {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot scan {}: {}", directory.display(), e);
            return Vec::new();
        }
    };

    let mut files = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !has_resume_extension(&path) {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        files.push(ResumeFile {
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            path,
        });
    }

    sort_resumes(&mut files);
    debug!("Found {} resume file(s) in {}", files.len(), directory.display());
    files
}

/// Newest first; filename breaks ties so the order is deterministic.
pub fn sort_resumes(files: &mut [ResumeFile]) {
    files.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.file_name().cmp(&b.file_name()))
    });
}

/// Bounds-checked pick from the scan result.
pub fn pick_resume(files: &[ResumeFile], index: usize) -> Option<&ResumeFile> {
    files.get(index)
}

pub fn has_resume_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            RESUME_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

pub fn format_file_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} TB", size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn resume(name: &str, secs: u64) -> ResumeFile {
        ResumeFile {
            path: PathBuf::from(name),
            size: 1024,
            modified: SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
        }
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        assert!(has_resume_extension(Path::new("cv.pdf")));
        assert!(has_resume_extension(Path::new("cv.PDF")));
        assert!(has_resume_extension(Path::new("cv.docx")));
        assert!(has_resume_extension(Path::new("cv.doc")));
        assert!(!has_resume_extension(Path::new("cv.txt")));
        assert!(!has_resume_extension(Path::new("no_extension")));
    }

    #[test]
    fn newest_file_sorts_first() {
        let mut files = vec![resume("old.pdf", 100), resume("new.pdf", 300), resume("mid.pdf", 200)];
        sort_resumes(&mut files);
        let names: Vec<String> = files.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["new.pdf", "mid.pdf", "old.pdf"]);
    }

    #[test]
    fn equal_timestamps_fall_back_to_name_order() {
        let mut files = vec![resume("b.pdf", 100), resume("a.pdf", 100)];
        sort_resumes(&mut files);
        let names: Vec<String> = files.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn pick_rejects_out_of_range_indices() {
        let files = vec![resume("a.pdf", 1), resume("b.pdf", 2)];
        assert!(pick_resume(&files, 0).is_some());
        assert!(pick_resume(&files, 1).is_some());
        assert!(pick_resume(&files, 2).is_none());
        assert!(pick_resume(&[], 0).is_none());
    }

    #[test]
    fn scan_ignores_non_resume_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cv.pdf"), b"pdf").unwrap();
        std::fs::write(dir.path().join("cv.docx"), b"docx").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"txt").unwrap();

        let files = find_resume_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| has_resume_extension(&f.path)));
    }

    #[test]
    fn missing_directory_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let files = find_resume_files(&dir.path().join("does-not-exist"));
        assert!(files.is_empty());
    }

    #[test]
    fn sizes_render_human_readable() {
        assert_eq!(format_file_size(512), "512.0 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }
}
