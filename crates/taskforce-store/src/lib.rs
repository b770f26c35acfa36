pub mod memory;

// Re-exports
pub use memory::MemoryStore;
