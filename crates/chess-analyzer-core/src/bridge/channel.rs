//! Bridge channel names and the [`BridgeMessage`] envelope used in logs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::record::GameRecord;

/// Channel the view uses to hand a record to the host.
pub const TO_HOST_CHANNEL: &str = "send-pgn";

/// Channel the host uses to push a record into the view.
pub const TO_VIEW_CHANNEL: &str = "load-pgn";

/// Direction of a bridge message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// View → host (`send-pgn`).
    ToHost,
    /// Host → view (`load-pgn`).
    ToView,
}

impl Channel {
    /// The channel identifier used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Self::ToHost => TO_HOST_CHANNEL,
            Self::ToView => TO_VIEW_CHANNEL,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record travelling in one direction.
///
/// The channels themselves carry bare [`GameRecord`]s; this pairing exists so
/// diagnostics can describe a message without guessing its direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeMessage {
    pub channel: Channel,
    pub payload: GameRecord,
}

impl BridgeMessage {
    pub fn to_host(payload: GameRecord) -> Self {
        Self {
            channel: Channel::ToHost,
            payload,
        }
    }

    pub fn to_view(payload: GameRecord) -> Self {
        Self {
            channel: Channel::ToView,
            payload,
        }
    }
}

impl fmt::Display for BridgeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} bytes, {})",
            self.channel,
            self.payload.len(),
            self.payload.provenance()
        )
    }
}
