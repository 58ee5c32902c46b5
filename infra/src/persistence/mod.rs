//! Storage adapters.
//!
//! `MemoryStore` keeps everything in one process; it implements both the
//! user repository and the credential store over the same records, so a
//! token write is immediately visible to the next user load.

pub mod memory;

pub use memory::MemoryStore;
