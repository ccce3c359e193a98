//! CLI ingestion: read the optional game-record file named on the command line.
//!
//! The file is read as UTF-8 text and wrapped as-is, with no trimming and no
//! parsing.  Whatever fails (missing file, permissions, invalid UTF-8) the
//! shell simply starts without a record.

use std::io;
use std::path::{Path, PathBuf};

use chess_analyzer_core::GameRecord;
use thiserror::Error;
use tracing::{debug, info};

/// Why a CLI record could not be loaded.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("game record file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read game record {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("game record {0} is not valid UTF-8 text")]
    NotUtf8(PathBuf),
}

/// Reads `path` into a `cli-argument` record.
///
/// # Errors
///
/// [`IngestError::NotFound`], [`IngestError::NotUtf8`] or
/// [`IngestError::Io`] for any other read failure.
pub fn read_game_record(path: &Path) -> Result<GameRecord, IngestError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(GameRecord::from_cli(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(IngestError::NotFound(path.to_path_buf()))
        }
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            Err(IngestError::NotUtf8(path.to_path_buf()))
        }
        Err(source) => Err(IngestError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads the CLI record if a path was given, logging instead of failing.
pub fn load_cli_record(path: Option<&Path>) -> Option<GameRecord> {
    let Some(path) = path else {
        debug!("no game record path on the command line");
        return None;
    };
    match read_game_record(path) {
        Ok(record) => {
            info!("loaded game record {} ({} bytes)", path.display(), record.len());
            Some(record)
        }
        Err(e) => {
            info!("{e}; starting without a record");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_analyzer_core::Provenance;

    #[test]
    fn test_read_keeps_text_byte_for_byte() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.pgn");
        let text = "[White \"Ann\"]\r\n\r\n1. e4 e5 2. Nf3 *\n\n";
        std::fs::write(&path, text).unwrap();

        // Act
        let record = read_game_record(&path).unwrap();

        // Assert
        assert_eq!(record.text(), text);
        assert_eq!(record.provenance(), Provenance::CliArgument);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_game_record(&dir.path().join("absent.pgn"));
        assert!(matches!(result, Err(IngestError::NotFound(_))));
    }

    #[test]
    fn test_invalid_utf8_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.pgn");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x31]).unwrap();

        let result = read_game_record(&path);

        assert!(matches!(result, Err(IngestError::NotUtf8(_))));
    }

    #[test]
    fn test_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_game_record(dir.path()).is_err());
    }

    #[test]
    fn test_load_cli_record_swallows_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_cli_record(Some(&dir.path().join("absent.pgn"))), None);
        assert_eq!(load_cli_record(None), None);
    }
}
