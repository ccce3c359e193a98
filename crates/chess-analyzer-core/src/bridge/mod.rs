//! The host/view bridge.
//!
//! The bridge is the only way the isolated view and the privileged host talk
//! to each other.  It carries exactly one kind of payload, a [`GameRecord`],
//! in two independent directions:
//!
//! ```text
//!            send-pgn (ToHost)
//!   View  ───────────────────────▶  Host
//!   View  ◀───────────────────────  Host
//!            load-pgn (ToView)
//! ```
//!
//! # Delivery semantics
//!
//! - Fire-and-forget: sending never waits and there is no reply.
//! - At most once: a message is either queued for the peer or dropped because
//!   the peer is gone; it is never duplicated.
//! - FIFO within one direction, no ordering across directions.
//!
//! A drop is reported as [`Delivery::Dropped`], not as an error, because a
//! window closing while a record is in flight is normal operation.
//!
//! [`GameRecord`]: crate::domain::record::GameRecord
//! [`Delivery::Dropped`]: port::Delivery::Dropped

pub mod channel;
pub mod port;
