// Data module - Cipher suite and named group registry

pub mod registry;

// Re-export commonly used types
pub use registry::Registry;
