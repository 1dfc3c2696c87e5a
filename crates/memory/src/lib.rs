//! Session storage implementations for the DSA tutor.

pub mod in_memory;

pub use in_memory::InMemorySessionStore;
