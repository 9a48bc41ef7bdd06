//! Search server and client
//!
//! Architecture:
//! - `SearchServer`: builds nothing itself; serves an already prepared
//!   `Searcher` over TCP with a length-prefixed JSON protocol
//! - `SearchClient`: connects to the server, sends words, receives file refs

mod client;
pub mod daemon;
pub mod protocol;

pub use client::{ClientError, ClientResult, SearchClient};
pub use daemon::SearchServer;
