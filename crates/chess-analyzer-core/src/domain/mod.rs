//! Domain entities shared by the host and the view.
//!
//! Everything in here is plain data: no channels, no I/O, no async.  The
//! host, the bridge and the automation controller all pass these values
//! around but none of them looks inside a record's text.

/// The game-record payload and where it came from.
pub mod record;

/// Identity of one native window instance.
pub mod window;
