//! Application layer for the host.
//!
//! # Sub-modules
//!
//! - **`events`**: the events the GUI loop feeds into the supervisor and the
//!   loop-control answer it gets back.
//!
//! - **`supervisor`**: session lifecycle.  Starts and stops the gateway,
//!   opens at most one window, delivers the CLI record once the page has
//!   loaded and forwards in-app submissions back to the view.

pub mod events;
pub mod supervisor;
