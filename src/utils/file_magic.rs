/// 根据魔术字节确认图片内容与扩展名一致，返回对应的 MIME 类型
///
/// `extension` 包含点号，如 `.png`。只接受图片格式。
pub fn image_content_type(data: &[u8], extension: &str) -> Option<&'static str> {
    let matches = match extension.to_lowercase().as_str() {
        ".png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        ".gif" => data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),
        ".webp" => data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP",
        _ => false,
    };

    if matches {
        content_type_for_extension(extension)
    } else {
        None
    }
}

pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        ".png" => Some("image/png"),
        ".jpg" | ".jpeg" => Some("image/jpeg"),
        ".gif" => Some("image/gif"),
        ".webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_magic() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(image_content_type(&png_header, ".png"), Some("image/png"));
        assert_eq!(image_content_type(&png_header, ".PNG"), Some("image/png"));
        assert_eq!(image_content_type(&png_header, ".jpg"), None);
    }

    #[test]
    fn test_jpeg_magic() {
        let jpeg_header = [0xFF, 0xD8, 0xFF, 0xE0];
        assert_eq!(image_content_type(&jpeg_header, ".jpeg"), Some("image/jpeg"));
        assert_eq!(image_content_type(&jpeg_header, ".gif"), None);
    }

    #[test]
    fn test_webp_magic() {
        let mut webp = b"RIFF\x00\x00\x00\x00WEBPVP8 ".to_vec();
        assert_eq!(image_content_type(&webp, ".webp"), Some("image/webp"));
        webp.truncate(10);
        assert_eq!(image_content_type(&webp, ".webp"), None);
    }

    #[test]
    fn test_non_images_rejected() {
        assert_eq!(image_content_type(b"%PDF-1.4", ".pdf"), None);
        assert_eq!(image_content_type(&[], ".png"), None);
    }
}
