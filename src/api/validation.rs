use std::path::Path;

use crate::api::errors::ApiError;

pub(crate) fn require(value: &str, message: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::validation(message))
    } else {
        Ok(())
    }
}

pub(crate) fn validate_image_upload(
    filename: &str,
    content_type: &str,
    size: u64,
    allowed_extensions: &[String],
    max_bytes: u64,
) -> Result<(), ApiError> {
    if size == 0 {
        return Err(ApiError::validation("Please upload your payment screenshot first."));
    }
    if size > max_bytes {
        return Err(ApiError::validation(format!(
            "File is too large ({size} bytes, limit {max_bytes} bytes)"
        )));
    }

    let extension = extension_of(filename)
        .ok_or_else(|| ApiError::validation("File must have an extension"))?;

    if !allowed_extensions.iter().any(|allowed| allowed == &extension) {
        return Err(ApiError::validation(format!("File extension '{extension}' is not allowed")));
    }

    let mime = content_type.trim().to_ascii_lowercase();
    if mime_allowed_for_extension(&mime, &extension) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "MIME type '{mime}' does not match extension '.{extension}'"
        )))
    }
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn mime_allowed_for_extension(mime: &str, extension: &str) -> bool {
    match extension {
        "jpg" | "jpeg" => matches!(mime, "image/jpeg" | "image/jpg"),
        "png" => mime == "image/png",
        "webp" => mime == "image/webp",
        "gif" => mime == "image/gif",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        ["jpg", "jpeg", "png"].iter().map(ToString::to_string).collect()
    }

    #[test]
    fn accepts_matching_image() {
        validate_image_upload("proof.JPG", "image/jpeg", 2048, &allowed(), 10 * 1024 * 1024)
            .expect("valid");
    }

    #[test]
    fn rejects_empty_or_oversized_files() {
        let empty = validate_image_upload("proof.png", "image/png", 0, &allowed(), 100);
        assert!(matches!(empty, Err(ApiError::Validation(_))));

        let large = validate_image_upload("proof.png", "image/png", 101, &allowed(), 100);
        assert!(matches!(large, Err(ApiError::Validation(_))));
    }

    #[test]
    fn rejects_disallowed_extension_and_mismatched_mime() {
        assert!(validate_image_upload("proof.gif", "image/gif", 10, &allowed(), 100).is_err());
        assert!(validate_image_upload("proof.png", "image/jpeg", 10, &allowed(), 100).is_err());
        assert!(validate_image_upload("proof", "image/png", 10, &allowed(), 100).is_err());
    }

    #[test]
    fn require_rejects_blank() {
        assert!(require("  ", "Email is required").is_err());
        assert!(require("a@b.c", "Email is required").is_ok());
    }
}
