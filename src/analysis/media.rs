use std::path::Path;

/// Image types the model accepts.
pub const SUPPORTED_MEDIA_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

pub const FALLBACK_MEDIA_TYPE: &str = "image/jpeg";

/// The declared type when the model accepts it, otherwise `image/jpeg`.
pub fn coerce_media_type(declared: Option<&str>) -> &'static str {
    declared
        .map(str::trim)
        .and_then(|declared| {
            SUPPORTED_MEDIA_TYPES
                .iter()
                .find(|supported| supported.eq_ignore_ascii_case(declared))
                .copied()
        })
        .unwrap_or(FALLBACK_MEDIA_TYPE)
}

/// Media type guessed from a file extension, for images read from disk.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let declared = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .and_then(|ext| match ext.as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            _ => None,
        });
    coerce_media_type(declared)
}
