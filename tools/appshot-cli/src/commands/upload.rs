//! Upload acceptance: what the preview is allowed to receive.

use std::path::Path;

use appshot_common::error::{AppshotError, AppshotResult};
use appshot_render_engine::{BitmapFormat, SourceBitmap};

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: u64 = 15 * 1024 * 1024;

/// Read and accept a screenshot file.
pub fn read_upload(path: &Path) -> AppshotResult<SourceBitmap> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AppshotError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => AppshotError::Io(e),
    })?;
    check_size(metadata.len())?;
    accept(std::fs::read(path)?)
}

/// Sniff the format from content and wrap the bytes.
pub fn accept(bytes: Vec<u8>) -> AppshotResult<SourceBitmap> {
    check_size(bytes.len() as u64)?;
    let format = image::guess_format(&bytes)
        .ok()
        .and_then(BitmapFormat::from_image_format)
        .ok_or_else(|| {
            AppshotError::unsupported("Only JPEG, PNG, GIF and WebP screenshots are accepted")
        })?;
    Ok(SourceBitmap::new(bytes, format))
}

fn check_size(len: u64) -> AppshotResult<()> {
    if len > MAX_UPLOAD_BYTES {
        return Err(AppshotError::unsupported(format!(
            "Screenshot is {:.1} MB; the limit is 15 MB",
            len as f64 / (1024.0 * 1024.0)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_sniffs_format_from_content() {
        let mut png = PNG_MAGIC.to_vec();
        png.extend_from_slice(&[0; 16]);
        assert_eq!(accept(png).unwrap().format(), BitmapFormat::Png);

        let jpeg = vec![0xff, 0xd8, 0xff, 0xe0, 0, 0];
        assert_eq!(accept(jpeg).unwrap().format(), BitmapFormat::Jpeg);

        let gif = b"GIF89a\x01\x00".to_vec();
        assert_eq!(accept(gif).unwrap().format(), BitmapFormat::Gif);
    }

    #[test]
    fn test_rejects_other_formats() {
        let bmp = b"BM\x00\x00\x00\x00".to_vec();
        assert!(matches!(accept(bmp), Err(AppshotError::Unsupported { .. })));
        assert!(accept(b"hello".to_vec()).is_err());
    }

    #[test]
    fn test_size_limit() {
        assert!(check_size(MAX_UPLOAD_BYTES).is_ok());
        let err = check_size(MAX_UPLOAD_BYTES + 1).unwrap_err();
        assert!(err.to_string().contains("15 MB"));
    }

    #[test]
    fn test_missing_file() {
        let err = read_upload(Path::new("/nonexistent/appshot/shot.png")).unwrap_err();
        assert!(matches!(err, AppshotError::FileNotFound { .. }));
    }
}
