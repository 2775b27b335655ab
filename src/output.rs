use crate::error::CrawlError;
use crate::results::ExamRecord;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes all records as one pretty-printed JSON array.
///
/// Text is written as UTF-8 without escaping non-ASCII characters.
pub fn write_records<P: AsRef<Path>>(path: P, records: &[ExamRecord]) -> Result<(), CrawlError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    ::log::info!("Saved {} exams to {}", records.len(), path.display());
    Ok(())
}

/// Reads back a file produced by [`write_records`]
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<ExamRecord>, CrawlError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::SubPageKind;
    use crate::results::{ExamSummary, PageExtraction};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("exam-pages-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_non_ascii_written_verbatim() {
        let mut record = ExamRecord::new(ExamSummary::new(
            "परीक्षा",
            "https://example.com/exam",
        ));
        record.set(
            SubPageKind::Overview,
            Some(PageExtraction {
                title: Some("Prüfung – 2025".to_string()),
                ..PageExtraction::default()
            }),
        );

        let path = temp_path("verbatim.json");
        write_records(&path, &[record.clone()]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("परीक्षा"));
        assert!(contents.contains("Prüfung – 2025"));
        assert!(!contents.contains("\\u"));
        assert!(contents.trim_start().starts_with('['));

        assert_eq!(read_records(&path).unwrap(), vec![record]);
    }
}
