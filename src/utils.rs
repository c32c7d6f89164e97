// src/utils.rs
use std::path::Path;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase and strip diacritics, for lenient matching of labels.
/// Precomposed and decomposed spellings fold to the same key.
pub fn fold_accents(value: &str) -> String {
    value
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check a file name against an `accept`-style list of extensions
pub fn has_allowed_extension(filename: &str, allowed: &[&str]) -> bool {
    get_file_extension(filename)
        .map(|ext| allowed.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Get content type for an upload
pub fn content_type_for(filename: &str) -> &'static str {
    match get_file_extension(filename).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("xls") => "application/vnd.ms-excel",
        Some("csv") => "text/csv",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Trim a string and drop it when nothing is left
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_accents() {
        assert_eq!(fold_accents("Ingeniería"), "ingenieria");
        assert_eq!(fold_accents("  LOGÍSTICA "), "logistica");
        assert_eq!(fold_accents("Diseño"), "diseno");
    }

    #[test]
    fn test_fold_accents_decomposed_input() {
        assert_eq!(fold_accents("Ingenieri\u{301}a"), "ingenieria");
        assert_eq!(fold_accents("Disen\u{303}o"), "diseno");
        assert_eq!(fold_accents("ATENCIÓN"), fold_accents("Atencio\u{301}n"));
    }

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("test.pdf"), Some("pdf".to_string()));
        assert_eq!(
            get_file_extension("document.DOCX"),
            Some("docx".to_string())
        );
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_has_allowed_extension() {
        assert!(has_allowed_extension("cv.PDF", &["pdf", "docx"]));
        assert!(!has_allowed_extension("cv.png", &["pdf", "docx"]));
        assert!(!has_allowed_extension("noext", &["pdf"]));
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.pdf"), "application/pdf");
        assert_eq!(content_type_for("a.csv"), "text/csv");
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  hola "), Some("hola"));
        assert_eq!(non_blank("   "), None);
    }
}
