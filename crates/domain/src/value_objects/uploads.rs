use anyhow::{Result, bail};

/// Extensions accepted for offer and grade photo uploads.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// A file received from a multipart request, held in memory until validated.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }

    pub fn extension(&self) -> Option<String> {
        let split_name: Vec<&str> = self.filename.rsplitn(2, '.').collect();
        if split_name.len() < 2 {
            return None;
        }
        Some(split_name[0].to_lowercase())
    }
}

/// Validates an image upload before anything is written. Failures map to a
/// client-visible bad request upstream.
pub fn validate_image_upload(file: &UploadedFile, max_bytes: u64) -> Result<()> {
    match file.extension() {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => bail!("unsupported image type: {}", file.filename),
    }
    if file.content.is_empty() {
        bail!("empty file: {}", file.filename);
    }
    if file.content.len() as u64 > max_bytes {
        bail!(
            "file too large: {} ({} bytes, limit {})",
            file.filename,
            file.content.len(),
            max_bytes
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_image_extensions() {
        for name in ["a.png", "b.jpg", "c.JPEG"] {
            let file = UploadedFile::new(name, vec![0u8; 16]);
            assert!(validate_image_upload(&file, 1024).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_unknown_extension() {
        let file = UploadedFile::new("manual.pdf", vec![0u8; 16]);
        assert!(validate_image_upload(&file, 1024).is_err());
    }

    #[test]
    fn rejects_missing_extension() {
        let file = UploadedFile::new("noext", vec![0u8; 16]);
        assert!(validate_image_upload(&file, 1024).is_err());
    }

    #[test]
    fn rejects_oversized_file() {
        let file = UploadedFile::new("big.png", vec![0u8; 2048]);
        assert!(validate_image_upload(&file, 1024).is_err());
    }

    #[test]
    fn rejects_empty_file() {
        let file = UploadedFile::new("zero.png", Vec::new());
        assert!(validate_image_upload(&file, 1024).is_err());
    }
}
