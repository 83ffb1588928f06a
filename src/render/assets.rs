//! Image asset resolution for capture.
//!
//! The browser waits for asynchronous image loads before capturing a
//! card; the headless pipeline gets the same guarantee by resolving every
//! referenced image up front and embedding it as a data URI. A reference
//! that cannot be resolved fails the slide's capture — it never produces
//! a card with a blank image box.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{Error, Result};

/// Resolve an image reference to a `data:` URI.
///
/// Supported sources:
/// - `data:` URIs pass through untouched
/// - filesystem paths, resolved relative to `base_dir` when given
///
/// Remote `http(s)` references are rejected: the capture backend has no
/// fetch step, so treating them as resolvable would silently drop the
/// image from the rendered card.
pub fn resolve_image(src: &str, base_dir: Option<&Path>) -> Result<String> {
    if src.starts_with("data:") {
        return Ok(src.to_string());
    }
    if src.starts_with("http://") || src.starts_with("https://") {
        return Err(Error::MissingAsset(format!(
            "remote image not embeddable: {src}"
        )));
    }

    let path = match base_dir {
        Some(dir) => dir.join(src),
        None => Path::new(src).to_path_buf(),
    };
    let bytes = std::fs::read(&path)
        .map_err(|e| Error::MissingAsset(format!("{}: {e}", path.display())))?;

    Ok(format!(
        "data:{};base64,{}",
        mime_for(src),
        BASE64.encode(bytes)
    ))
}

fn mime_for(src: &str) -> &'static str {
    let ext = src.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn data_uris_pass_through() {
        let uri = "data:image/png;base64,AAAA";
        assert_eq!(resolve_image(uri, None).unwrap(), uri);
    }

    #[test]
    fn remote_images_are_rejected() {
        let err = resolve_image("https://example.com/cat.png", None).unwrap_err();
        assert!(matches!(err, Error::MissingAsset(_)));
    }

    #[test]
    fn local_files_are_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(&[0x89, 0x50, 0x4e, 0x47])
            .unwrap();

        let uri = resolve_image("dot.png", Some(dir.path())).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn missing_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_image("nope.png", Some(dir.path())).is_err());
    }
}
