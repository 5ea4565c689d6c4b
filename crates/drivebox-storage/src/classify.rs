//! File-type labels shown in the file browser.

use std::path::Path;

/// Extension to label mapping, checked in order.
pub static FILE_TYPE_LABELS: &[(&str, &str)] = &[
    ("pdf", "Adobe Portable Document Format (PDF)"),
    ("xlsx", "Microsoft Excel Spreadsheet (XLSX)"),
    ("xls", "Microsoft Excel Spreadsheet (XLS)"),
    ("png", "PNG Image"),
    ("jpg", "JPEG Image"),
    ("jpeg", "JPEG Image"),
    ("doc", "Microsoft Word Document"),
    ("docx", "Microsoft Word Document"),
    ("ppt", "Microsoft PowerPoint Presentation"),
    ("pptx", "Microsoft PowerPoint Presentation"),
    ("txt", "Plain Text File"),
    ("zip", "ZIP Archive"),
    ("mp4", "Video File"),
    ("mov", "Video File"),
    ("avi", "Video File"),
    ("mkv", "Video File"),
    ("webm", "Video File"),
    ("mp3", "Audio File"),
    ("wav", "Audio File"),
    ("aac", "Audio File"),
    ("flac", "Audio File"),
    ("ogg", "Audio File"),
    ("m4a", "Audio File"),
];

pub const PDF_LABEL: &str = "Adobe Portable Document Format (PDF)";
pub const WORD_LABEL: &str = "Microsoft Word Document";
pub const VIDEO_LABEL: &str = "Video File";
pub const AUDIO_LABEL: &str = "Audio File";
pub const IMAGE_LABELS: &[&str] = &["PNG Image", "JPEG Image"];
pub const SPREADSHEET_LABELS: &[&str] = &[
    "Microsoft Excel Spreadsheet (XLSX)",
    "Microsoft Excel Spreadsheet (XLS)",
];

/// Label for a file, from its extension (case-insensitive), falling back to
/// the declared MIME type verbatim.
pub fn classify_file_type(file_name: &str, declared_mime: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .and_then(|ext| {
            FILE_TYPE_LABELS
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, label)| (*label).to_string())
        })
        .unwrap_or_else(|| declared_mime.to_string())
}
