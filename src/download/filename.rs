//! Destination filename derivation for downloaded links.

use std::path::{Component, Path};

use tracing::debug;
use url::Url;

/// Extension appended to host-based fallback names.
const FALLBACK_EXTENSION: &str = ".download";

/// Derives the local filename for a resolved link URL.
///
/// Uses the last non-empty path segment plus the query string, if any,
/// percent-decoded and sanitised. `https://host/files/My%20Report.doc` becomes
/// `My Report.doc`, `https://host/dir/` becomes `dir`, and
/// `https://host/get.php?f=a.doc` becomes `get.php_f=a.doc`, so links that
/// differ only by query land in different files. The fragment is ignored.
/// URLs with neither fall back to `<host>.download`. The result is always a
/// single safe path component.
#[must_use]
pub fn filename_from_url(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|segments| segments.rev().find(|segment| !segment.is_empty()))
        .unwrap_or_default();

    let raw = match url.query() {
        Some(query) => format!("{segment}?{query}"),
        None => segment.to_string(),
    };

    if raw.is_empty() {
        let host = url.host_str().unwrap_or("download");
        return format!("{}{FALLBACK_EXTENSION}", sanitize_filename(host));
    }

    let decoded = urlencoding::decode(&raw).unwrap_or_else(|e| {
        debug!(name = %raw, error = %e, "URL decoding failed, using raw name");
        std::borrow::Cow::Borrowed(raw.as_str())
    });
    sanitize_filename(&decoded)
}

/// Replaces characters that are invalid or unsafe in filenames.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized.replace('.', "_")
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
