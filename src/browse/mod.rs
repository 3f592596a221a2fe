//! Filesystem browsing for picking images: directory listings and drive
//! roots. Listings are read fresh on every call.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{InscribeError, Result};

/// File extensions treated as images (lowercase, without the dot).
pub const IMAGE_EXTENSIONS: [&str; 9] = [
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif", "svg",
];

/// One directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// File name (no directory part).
    pub name: String,
    /// Whether the entry is a directory.
    pub is_directory: bool,
}

impl FileEntry {
    /// Whether the entry is an image file.
    pub fn is_image(&self) -> bool {
        !self.is_directory && is_image_file(&self.name)
    }

    /// Whether the entry is a dotfile.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Whether `name` has an image extension.
pub fn is_image_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// List the entries of `path`: directories first, then by name ignoring case.
///
/// Entries whose names are not valid UTF-8 are shown lossily.
pub async fn list_directory(path: &Path) -> Result<Vec<FileEntry>> {
    let mut dir = fs::read_dir(path)
        .await
        .map_err(|e| InscribeError::from_io_at(path, e, true))?;

    let mut entries = Vec::new();
    while let Some(entry) = dir.next_entry().await.map_err(|e| {
        InscribeError::io(
            format!("Failed to read directory entry: {}", path.display()),
            e,
        )
    })? {
        // Follows symlinks, so a link to a directory browses like one.
        let is_directory = match fs::metadata(entry.path()).await {
            Ok(meta) => meta.is_dir(),
            Err(e) => {
                tracing::debug!(path = %entry.path().display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        entries.push(FileEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_directory,
        });
    }

    sort_entries(&mut entries);
    Ok(entries)
}

fn sort_entries(entries: &mut [FileEntry]) {
    entries.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Filesystem roots to start browsing from.
///
/// On Windows these are the drive letters that exist; elsewhere the single
/// root `/`.
pub fn list_drives() -> Vec<PathBuf> {
    #[cfg(windows)]
    {
        (b'A'..=b'Z')
            .map(|letter| PathBuf::from(format!("{}:\\", char::from(letter))))
            .filter(|root| root.exists())
            .collect()
    }

    #[cfg(not(windows))]
    {
        vec![PathBuf::from("/")]
    }
}
