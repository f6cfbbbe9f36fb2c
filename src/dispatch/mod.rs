//! Batch dispatch of song downloads
//!
//! [`SongList`] streams titles from a line-oriented source and
//! [`BatchDispatcher`] feeds them through a bounded queue into batches of
//! concurrent [`SongJob`](crate::worker::SongJob)s.

mod batch;
mod input;

pub use batch::{BatchDispatcher, DispatchError, DispatchSummary};
pub use input::SongList;
