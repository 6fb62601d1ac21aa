//! # Services Module
//!
//! Network-facing services: the Horizon transport, transaction submission,
//! event streaming and the exchange surface built on top of them.

pub mod provider;
pub use provider::*;

pub mod submission;
pub use submission::*;

pub mod stream;
pub use stream::*;

pub mod exchange;
pub use exchange::*;
