use std::fs;
use std::path::{Path, PathBuf};

const NOTE_EXTENSIONS: [&str; 2] = ["md", "txt"];

/// Notes files directly inside `notes_dir`, sorted by path.
pub fn get_note_files(notes_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if notes_dir.is_dir()
        && let Ok(entries) = fs::read_dir(notes_dir)
    {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file()
                && let Some(ext) = path.extension().and_then(|e| e.to_str())
                && NOTE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
            {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}

pub fn load_note(path: &Path) -> std::io::Result<String> {
    let content = fs::read_to_string(path)?;
    Ok(content.trim().to_string())
}

pub fn note_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
