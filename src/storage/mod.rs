pub mod file;
pub mod memory;
pub mod preferences;
pub mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use preferences::{keys, Preferences};
pub use traits::KeyValueStore;
