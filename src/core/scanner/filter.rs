//! Extension allow-list for the enumerator.

use std::path::Path;

/// Extensions accepted by the enumerator, compared case-insensitively
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "tiff"];

/// Filters files down to the fixed image allow-list
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFilter;

impl ImageFilter {
    pub fn new() -> Self {
        Self
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        self.extension(path)
            .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Lowercased text after the last dot of the file name.
    ///
    /// A file named just `.png` has extension `png` here, unlike
    /// `Path::extension`.
    pub fn extension(&self, path: &Path) -> Option<String> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_includes_every_allowed_extension() {
        let filter = ImageFilter::new();
        for ext in ALLOWED_EXTENSIONS {
            let path = format!("/photos/image.{}", ext);
            assert!(filter.should_include(Path::new(&path)), "{}", ext);
        }
    }

    #[test]
    fn filter_is_case_insensitive() {
        let filter = ImageFilter::new();
        assert!(filter.should_include(Path::new("/photos/image.JPEG")));
        assert!(filter.should_include(Path::new("/photos/image.Png")));
        assert!(filter.should_include(Path::new("/photos/scan.TIFF")));
    }

    #[test]
    fn filter_excludes_other_formats() {
        let filter = ImageFilter::new();
        assert!(!filter.should_include(Path::new("/photos/document.pdf")));
        assert!(!filter.should_include(Path::new("/photos/IMG_1234.heic")));
        assert!(!filter.should_include(Path::new("/photos/image.webp")));
        assert!(!filter.should_include(Path::new("/photos/archive.png.zip")));
        // Only the long form of TIFF is on the list
        assert!(!filter.should_include(Path::new("/photos/scan.tif")));
    }

    #[test]
    fn filter_handles_no_extension() {
        let filter = ImageFilter::new();
        assert!(!filter.should_include(Path::new("/photos/no_extension")));
        assert!(!filter.should_include(Path::new("/photos/png")));
    }

    #[test]
    fn bare_extension_file_name_is_included() {
        let filter = ImageFilter::new();
        assert!(filter.should_include(Path::new("/photos/.png")));
        assert!(filter.should_include(Path::new("/photos/.JPG")));
        assert_eq!(filter.extension(Path::new(".png")).as_deref(), Some("png"));
    }
}
