//! Supported image formats.

use std::path::Path;

/// File extensions accepted from a bundle (matched case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg"];

/// Image formats accepted from a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
    Svg,
}

impl ImageFormat {
    /// Format implied by a file name's extension.
    pub fn from_path(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "webp" => Some(Self::Webp),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// Whether `bytes` start the way this format's files do.
    pub fn matches(self, bytes: &[u8]) -> bool {
        match self {
            Self::Jpeg => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
            Self::Png => bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
            Self::Gif => bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a"),
            Self::Bmp => bytes.starts_with(b"BM"),
            Self::Webp => bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP",
            Self::Svg => {
                let head = &bytes[..bytes.len().min(1024)];
                String::from_utf8_lossy(head)
                    .to_ascii_lowercase()
                    .contains("<svg")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_filter() {
        assert_eq!(ImageFormat::from_path("a.jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path("dir/B.JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path("c.WebP"), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::from_path("d.svg"), Some(ImageFormat::Svg));
        assert_eq!(ImageFormat::from_path("notes.txt"), None);
        assert_eq!(ImageFormat::from_path("png"), None);
        assert_eq!(ImageFormat::from_path("archive.tiff"), None);
    }

    #[test]
    fn test_every_listed_extension_is_recognised() {
        for ext in SUPPORTED_EXTENSIONS {
            assert!(ImageFormat::from_path(&format!("file.{ext}")).is_some(), "{ext}");
        }
    }

    #[test]
    fn test_content_sniffing() {
        assert!(ImageFormat::Jpeg.matches(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(ImageFormat::Png.matches(b"\x89PNG\r\n\x1a\n...."));
        assert!(ImageFormat::Gif.matches(b"GIF89a..."));
        assert!(ImageFormat::Webp.matches(b"RIFF\0\0\0\0WEBPVP8 "));
        assert!(ImageFormat::Svg.matches(b"<?xml version=\"1.0\"?>\n<SVG xmlns=\"\">"));
        assert!(!ImageFormat::Png.matches(b"GIF89a"));
        assert!(!ImageFormat::Webp.matches(b"RIFF"));
    }
}
