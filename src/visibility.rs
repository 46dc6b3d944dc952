//! Archive-ness predicate for file-browser entries
//!
//! Decides whether the extract affordance is offered for a filename. A
//! single-segment extension test alone cannot recognize compound suffixes
//! like `.tar.gz`, so both the final segment and the final two segments are
//! checked against a fixed closed set, which also avoids false positives on
//! ordinary multi-dot filenames.

/// Whether `filename` ends in one of `allowed_extensions`
///
/// Extensions in the allowed set carry their leading dot (`".zip"`,
/// `".tar.gz"`). Filenames with fewer than two dot-separated segments fall
/// back to the single-extension test only. The compound check needs a stem
/// in front of the suffix: a file literally named `tar.gz` has no stem and
/// is deliberately not treated as an archive, matching the suffix-selector
/// behavior the context menu is wired with.
///
/// # Examples
///
/// ```
/// use folder_archive::config::ALLOWED_ARCHIVE_EXTENSIONS;
/// use folder_archive::visibility::is_archive;
///
/// assert!(is_archive("backup.tar.gz", &ALLOWED_ARCHIVE_EXTENSIONS));
/// assert!(is_archive("photos.zip", &ALLOWED_ARCHIVE_EXTENSIONS));
/// assert!(!is_archive("notes.txt", &ALLOWED_ARCHIVE_EXTENSIONS));
/// ```
pub fn is_archive(filename: &str, allowed_extensions: &[&str]) -> bool {
    let parts: Vec<&str> = filename.split('.').collect();
    if parts.len() < 2 {
        // No dot at all: nothing to match on.
        return false;
    }

    let single_ext = format!(".{}", parts[parts.len() - 1]);
    if allowed_extensions.contains(&single_ext.as_str()) {
        return true;
    }

    if parts.len() >= 3 {
        let last_two = format!(".{}.{}", parts[parts.len() - 2], parts[parts.len() - 1]);
        if allowed_extensions.contains(&last_two.as_str()) {
            return true;
        }
    }

    false
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ALLOWED_ARCHIVE_EXTENSIONS;

    #[test]
    fn every_allowed_extension_is_recognized() {
        for ext in ALLOWED_ARCHIVE_EXTENSIONS {
            let filename = format!("backup{ext}");
            assert!(
                is_archive(&filename, &ALLOWED_ARCHIVE_EXTENSIONS),
                "{filename} should be recognized"
            );
        }
    }

    #[test]
    fn compound_suffix_is_recognized_via_last_two_segments() {
        assert!(is_archive("data.tar.gz", &ALLOWED_ARCHIVE_EXTENSIONS));
        assert!(is_archive("data.tar.bz2", &ALLOWED_ARCHIVE_EXTENSIONS));
        assert!(is_archive("data.tar.xz", &ALLOWED_ARCHIVE_EXTENSIONS));
    }

    #[test]
    fn multi_dot_filenames_still_match_on_the_suffix() {
        assert!(is_archive("2024.01.backup.tar.gz", &ALLOWED_ARCHIVE_EXTENSIONS));
        assert!(is_archive("release.v2.zip", &ALLOWED_ARCHIVE_EXTENSIONS));
    }

    #[test]
    fn ordinary_filenames_are_rejected() {
        assert!(!is_archive("notes.txt", &ALLOWED_ARCHIVE_EXTENSIONS));
        assert!(!is_archive("archive.gz", &ALLOWED_ARCHIVE_EXTENSIONS));
        assert!(!is_archive("tarball.tar", &ALLOWED_ARCHIVE_EXTENSIONS));
    }

    #[test]
    fn whole_filename_as_compound_extension_is_rejected() {
        // "tar.gz" has no stem in front of the suffix; only "x.tar.gz"
        // style names carry the compound extension.
        assert!(!is_archive("tar.gz", &ALLOWED_ARCHIVE_EXTENSIONS));
        assert!(is_archive("x.tar.gz", &ALLOWED_ARCHIVE_EXTENSIONS));
    }

    #[test]
    fn filename_without_dots_is_rejected() {
        assert!(!is_archive("README", &ALLOWED_ARCHIVE_EXTENSIONS));
        assert!(!is_archive("", &ALLOWED_ARCHIVE_EXTENSIONS));
    }

    #[test]
    fn suffix_must_match_exactly_not_merely_contain() {
        // "gz" alone is not in the set; only ".tar.gz" and ".tgz" are.
        assert!(!is_archive("file.notzip", &ALLOWED_ARCHIVE_EXTENSIONS));
        assert!(!is_archive("file.zip.txt", &ALLOWED_ARCHIVE_EXTENSIONS));
    }

    #[test]
    fn custom_allowed_set_is_honored() {
        let allowed = [".rar"];
        assert!(is_archive("movie.rar", &allowed));
        assert!(!is_archive("movie.zip", &allowed));
    }
}
