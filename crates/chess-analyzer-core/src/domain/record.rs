//! The [`GameRecord`] payload.
//!
//! A game record is the text of a chess game transcript (normally PGN).  The
//! shell never parses it: the host reads it from disk or receives it from the
//! view, and forwards the exact same string to the view's input control.
//!
//! The only metadata attached is a [`Provenance`] tag so that logs can tell a
//! record supplied on the command line apart from one that bounced through the
//! bridge.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a [`GameRecord`] entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    /// Read by the host from the file named by the first positional argument.
    CliArgument,
    /// Submitted by the view over the `send-pgn` channel and forwarded back.
    BridgeForward,
}

impl Provenance {
    /// Returns the wire/log tag for this provenance.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CliArgument => "cli-argument",
            Self::BridgeForward => "bridge-forward",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque chess game transcript plus its provenance.
///
/// The text is immutable once captured.  There is deliberately no accessor
/// that hands out `&mut String`; the only ways to get the text back are
/// [`GameRecord::text`] and [`GameRecord::into_text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    text: String,
    provenance: Provenance,
}

impl GameRecord {
    /// Wraps `text` with an explicit provenance tag.
    pub fn new(text: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            text: text.into(),
            provenance,
        }
    }

    /// A record read from the command-line file argument.
    pub fn from_cli(text: impl Into<String>) -> Self {
        Self::new(text, Provenance::CliArgument)
    }

    /// A record submitted by the view for re-delivery.
    pub fn from_bridge(text: impl Into<String>) -> Self {
        Self::new(text, Provenance::BridgeForward)
    }

    /// The transcript text, byte-for-byte as captured.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Length of the transcript in bytes.  Used in log lines instead of the
    /// text itself, which can be several kilobytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Consumes the record and returns the transcript text.
    pub fn into_text(self) -> String {
        self.text
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cli_tags_cli_argument() {
        let record = GameRecord::from_cli("1. e4 *");
        assert_eq!(record.provenance(), Provenance::CliArgument);
    }

    #[test]
    fn test_from_bridge_tags_bridge_forward() {
        let record = GameRecord::from_bridge("1. d4 *");
        assert_eq!(record.provenance(), Provenance::BridgeForward);
    }

    #[test]
    fn test_text_is_preserved_exactly() {
        // Arrange: headers, CRLF line endings and trailing whitespace must all
        // survive untouched.
        let raw = "[Event \"Casual\"]\r\n\r\n1. e4 e5 2. Nf3 *  \n";

        // Act
        let record = GameRecord::from_cli(raw);

        // Assert
        assert_eq!(record.text(), raw);
        assert_eq!(record.len(), raw.len());
        assert_eq!(record.into_text(), raw);
    }

    #[test]
    fn test_empty_record_reports_empty() {
        let record = GameRecord::from_bridge("");
        assert!(record.is_empty());
    }

    #[test]
    fn test_provenance_tags_are_kebab_case() {
        assert_eq!(Provenance::CliArgument.to_string(), "cli-argument");
        assert_eq!(Provenance::BridgeForward.to_string(), "bridge-forward");
    }

    #[test]
    fn test_provenance_serializes_as_tag() {
        let json = serde_json::to_string(&Provenance::BridgeForward).unwrap();
        assert_eq!(json, r#""bridge-forward""#);
    }
}
