/// PDF 文件头 `%PDF`
///
/// 只看内容本身，声明的 Content-Type 与扩展名都不可信。
pub fn is_pdf(data: &[u8]) -> bool {
    data.starts_with(b"%PDF")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_magic() {
        assert!(is_pdf(b"%PDF-1.4"));
        assert!(is_pdf(b"%PDF-2.0\n%\xe2\xe3"));
    }

    #[test]
    fn test_disguised_file() {
        let zip_header = [0x50, 0x4B, 0x03, 0x04];
        assert!(!is_pdf(&zip_header));
        assert!(!is_pdf(b"hello %PDF"));
    }

    #[test]
    fn test_empty_data() {
        assert!(!is_pdf(&[]));
        assert!(!is_pdf(b"%PD"));
    }
}
