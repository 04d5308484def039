//! Configuration source adapters.

mod layered;
mod memory;

pub use layered::LayeredConfig;
pub use memory::MemoryConfig;
