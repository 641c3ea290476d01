//! Plain-text export of the current transcript.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::logging::sanitize_filename;
use crate::models::{InformationLetter, ObservationTime};

use super::composer::Transcript;

/// A transcript ready to be saved as `{AIRPORT}_{LETTER}_{HHMM}Z.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptExport {
    pub filename: String,
    pub content: String,
}

impl TranscriptExport {
    /// Build from the identifying fields. Missing parts become `XXXX`, `X`
    /// and `0000`.
    pub fn new(
        airport: Option<&str>,
        letter: Option<InformationLetter>,
        time: Option<ObservationTime>,
        transcript: &Transcript,
    ) -> Self {
        let filename = format!(
            "{}_{}_{}Z.txt",
            airport.unwrap_or("XXXX"),
            letter.map(|l| l.letter()).unwrap_or('X'),
            time.map(|t| t.hhmm()).unwrap_or_else(|| "0000".to_string()),
        );
        Self {
            filename: sanitize_filename(&filename),
            content: format!("{}\n", transcript),
        }
    }

    /// Write into `dir`, creating it if needed. The file is written to a
    /// temporary name first and renamed into place.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let path = dir.join(&self.filename);
        let temp_path = path.with_extension("txt.tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(self.content.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn filename_from_identity_fields() {
        let export = TranscriptExport::new(
            Some("KSEA"),
            InformationLetter::new('a'),
            Some(ObservationTime {
                hour: 14,
                minute: 53,
            }),
            &Transcript::default(),
        );
        assert_eq!(export.filename, "KSEA_A_1453Z.txt");
        assert_eq!(export.content, "\n");
    }

    #[test]
    fn filename_fallbacks() {
        let export = TranscriptExport::new(None, None, None, &Transcript::default());
        assert_eq!(export.filename, "XXXX_X_0000Z.txt");
    }

    #[test]
    fn write_to_creates_file() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested");
        let export = TranscriptExport {
            filename: "KSEA_B_0000Z.txt".to_string(),
            content: "KSEA.\n".to_string(),
        };

        let path = export.write_to(&out).unwrap();
        assert_eq!(path, out.join("KSEA_B_0000Z.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "KSEA.\n");
        assert!(!out.join("KSEA_B_0000Z.txt.tmp").exists());
    }
}
