//! Credential stores - JSON file and in-memory.

mod file;
mod memory;

pub use file::FileCredentialStore;
pub use memory::InMemoryCredentialStore;
