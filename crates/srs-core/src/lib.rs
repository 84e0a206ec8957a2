//! Rating session workspace.
//!
//! [`Workspace`] holds the live state of one rating session (the image
//! collection, the current index, ratings, and notes) and keeps it durable:
//! every mutation re-arms the auto-save scheduler, and [`Workspace::shutdown`]
//! flushes unconditionally before releasing display handles.
//!
//! Loading a collection goes one of two ways:
//! - [`Workspace::load_fresh`] starts over and discards stored progress
//! - [`Workspace::restore`] reconciles the collection with stored progress
//!   and refuses a bundle that does not match it

mod error;
mod workspace;

pub use error::{CoreError, Result};
pub use workspace::Workspace;
