//! Block download layer for the quorum commit layer.
//!
//! The synchronizer pulls missing chains through the [`BlockLoader`] trait.
//! [`ChannelBlockLoader`] implements it over an mpsc request channel; the
//! transport side reads requests from the companion [`BlockLoaderHandle`].
//! [`serve_block_requests`] is an in-process transport answering from local
//! block sources.

pub mod block_loader;
pub mod error;
pub mod loader;
pub mod serve;

pub use block_loader::{BlockLoader, BlockStream};
pub use error::NetworkError;
pub use loader::{BlockLoaderHandle, BlockRequest, ChannelBlockLoader};
pub use serve::serve_block_requests;
