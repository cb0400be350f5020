/// 判断魔术字节所需的最长文件头
pub const MAGIC_HEAD_LEN: usize = 8;

/// 校验文件头魔术字节与扩展名是否一致
///
/// `extension` 含点号（如 ".pdf"），大小写不敏感。只认识上传白名单可能出现的格式，
/// 其余扩展名一律返回 false。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        ".png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        ".pdf" => data.starts_with(b"%PDF"),
        // OLE 复合文档
        ".doc" | ".xls" | ".ppt" => {
            data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        }
        // OOXML 与 zip 同为 PK 头
        ".docx" | ".xlsx" | ".pptx" | ".zip" => data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),
        _ => false,
    }
}

/// 取文件名的扩展名（小写，含点号）
pub fn extension_of(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{}", e.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_magic() {
        assert!(validate_magic_bytes(b"%PDF-1.7\n", ".pdf"));
        assert!(validate_magic_bytes(b"%PDF-1.4", ".PDF"));
        assert!(!validate_magic_bytes(b"%PDF-1.4", ".docx"));
    }

    #[test]
    fn test_office_formats() {
        let ooxml = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&ooxml, ".docx"));
        assert!(validate_magic_bytes(&ooxml, ".zip"));
        assert!(!validate_magic_bytes(&ooxml, ".doc"));

        let ole = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
        assert!(validate_magic_bytes(&ole, ".xls"));
    }

    #[test]
    fn test_images() {
        assert!(validate_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], ".jpeg"));
        assert!(!validate_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], ".png"));
    }

    #[test]
    fn test_empty_and_unknown() {
        assert!(!validate_magic_bytes(&[], ".pdf"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".exe"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("Diploma.PDF").as_deref(), Some(".pdf"));
        assert_eq!(extension_of("archive.tar.zip").as_deref(), Some(".zip"));
        assert_eq!(extension_of("README"), None);
    }
}
