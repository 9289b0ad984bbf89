//! Extension-based MIME type guessing for `file upload` when `--mime` is
//! omitted. Deliberately small: a handful of common types rather than a full
//! registry crate.

use std::path::Path;

pub fn guess_mime_type(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "json" => "application/json",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "zip" => "application/zip",
        "tar" => "application/x-tar",
        "gz" => "application/gzip",
        _ => return None,
    };
    Some(mime.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_known_extension() {
        assert_eq!(guess_mime_type(Path::new("photo.JPG")).as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn unknown_extension_is_none() {
        assert_eq!(guess_mime_type(Path::new("blob.xyz")), None);
    }

    #[test]
    fn no_extension_is_none() {
        assert_eq!(guess_mime_type(Path::new("blob")), None);
    }
}
