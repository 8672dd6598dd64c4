//! Media types by file extension.
//!
//! Extension matching is ASCII case-insensitive, unknown extension falls back to
//! [`APPLICATION_OCTET_STREAM`].
use std::path::Path;

/// `application/octet-stream`
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";
/// `application/json`
pub const APPLICATION_JSON: &str = "application/json";
/// `text/plain; charset=utf-8`
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
/// `text/html; charset=utf-8`
pub const TEXT_HTML: &str = "text/html; charset=utf-8";

macro_rules! extensions {
    ($($ext:literal => $mime:literal,)*) => {
        /// Returns the media type registered for file extension, without the leading dot.
        pub fn from_extension(ext: &str) -> Option<&'static str> {
            $(
                if ext.eq_ignore_ascii_case($ext) {
                    return Some($mime);
                }
            )*
            None
        }
    };
}

extensions! {
    "aac" => "audio/aac",
    "avi" => "video/x-msvideo",
    "avif" => "image/avif",
    "bin" => "application/octet-stream",
    "bmp" => "image/bmp",
    "css" => "text/css; charset=utf-8",
    "csv" => "text/csv; charset=utf-8",
    "gif" => "image/gif",
    "gz" => "application/gzip",
    "htm" => "text/html; charset=utf-8",
    "html" => "text/html; charset=utf-8",
    "ico" => "image/vnd.microsoft.icon",
    "jpeg" => "image/jpeg",
    "jpg" => "image/jpeg",
    "js" => "text/javascript; charset=utf-8",
    "json" => "application/json",
    "jsonld" => "application/ld+json",
    "md" => "text/markdown; charset=utf-8",
    "mjs" => "text/javascript; charset=utf-8",
    "mp3" => "audio/mpeg",
    "mp4" => "video/mp4",
    "mpeg" => "video/mpeg",
    "oga" => "audio/ogg",
    "ogv" => "video/ogg",
    "otf" => "font/otf",
    "pdf" => "application/pdf",
    "png" => "image/png",
    "svg" => "image/svg+xml",
    "tar" => "application/x-tar",
    "tif" => "image/tiff",
    "tiff" => "image/tiff",
    "ttf" => "font/ttf",
    "txt" => "text/plain; charset=utf-8",
    "wasm" => "application/wasm",
    "wav" => "audio/wav",
    "weba" => "audio/webm",
    "webm" => "video/webm",
    "webp" => "image/webp",
    "woff" => "font/woff",
    "woff2" => "font/woff2",
    "xhtml" => "application/xhtml+xml",
    "xml" => "application/xml",
    "zip" => "application/zip",
}

/// Returns the media type for a path based on its extension.
pub fn from_path(path: impl AsRef<Path>) -> &'static str {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(from_extension)
        .unwrap_or(APPLICATION_OCTET_STREAM)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mime_by_extension() {
        assert_eq!(from_path("app/index.HTML"), TEXT_HTML);
        assert_eq!(from_path("logo.png"), "image/png");
        assert_eq!(from_path("archive.unknown"), APPLICATION_OCTET_STREAM);
        assert_eq!(from_path("Makefile"), APPLICATION_OCTET_STREAM);
    }
}
