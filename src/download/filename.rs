//! Filename derivation, sanitization, and collision-free path reservation.

use std::borrow::Cow;
use std::collections::HashSet;
use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tracing::debug;
use url::Url;

use super::constants::{FALLBACK_FILENAME, MAX_NAME_SUFFIX};
use super::error::DownloadError;

/// Derives the local filename for a download from its URL.
///
/// Uses the final path segment, percent-decoded and sanitized. An empty
/// segment (a URL ending in `/`) or a dot segment falls back to
/// [`FALLBACK_FILENAME`].
#[must_use]
pub fn filename_from_url(url: &Url) -> String {
    let last = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    let decoded = urlencoding::decode(last).unwrap_or(Cow::Borrowed(last));
    let name = sanitize_filename(decoded.trim());

    if name.is_empty() || !is_safe_filename_segment(&name) {
        FALLBACK_FILENAME.to_string()
    } else {
        name
    }
}

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

/// `file.bin`, then `file.bin.1`, `file.bin.2`, ...
fn candidate_name(filename: &str, attempt: usize) -> Cow<'_, str> {
    if attempt == 0 {
        Cow::Borrowed(filename)
    } else {
        Cow::Owned(format!("{filename}.{attempt}"))
    }
}

/// Atomically claims the first unused name in `dir` derived from `filename`.
///
/// Each candidate is created with `create_new`, so the returned path is
/// guaranteed not to have existed before and no other caller can claim it.
/// The returned file is empty and open for writing.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] if a candidate cannot be created for a reason
/// other than already existing, or if every suffix is taken.
pub(crate) async fn reserve_unique_path(
    dir: &Path,
    filename: &str,
) -> Result<(PathBuf, File), DownloadError> {
    for attempt in 0..=MAX_NAME_SUFFIX {
        let path = dir.join(candidate_name(filename, attempt).as_ref());
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => {
                if attempt > 0 {
                    debug!(path = %path.display(), "name collision; reserved suffixed name");
                }
                return Ok((path, file));
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(DownloadError::io(path, e)),
        }
    }

    Err(suffixes_exhausted(dir, filename))
}

/// Claims the first name derived from `filename` that no other job of the
/// batch holds, without touching the filesystem.
///
/// Used when overwriting, where an existing file is no obstacle but two jobs
/// of one batch must still never share a target.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] if every suffix is already claimed.
pub(crate) fn claim_batch_name(
    claimed: &mut HashSet<String>,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, DownloadError> {
    for attempt in 0..=MAX_NAME_SUFFIX {
        let candidate = candidate_name(filename, attempt);
        if !claimed.contains(candidate.as_ref()) {
            if attempt > 0 {
                debug!(name = %candidate, "name already claimed in batch; using suffixed name");
            }
            let path = dir.join(candidate.as_ref());
            claimed.insert(candidate.into_owned());
            return Ok(path);
        }
    }
    Err(suffixes_exhausted(dir, filename))
}

fn suffixes_exhausted(dir: &Path, filename: &str) -> DownloadError {
    DownloadError::io(
        dir.join(filename),
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free name among {MAX_NAME_SUFFIX} suffixes"),
        ),
    )
}
