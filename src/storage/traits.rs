use crate::error::Result;

/// Named string slots persisted on the device.
/// Lets the app swap the storage medium without touching callers.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;

    /// Drop every key
    fn clear(&mut self) -> Result<()>;
}
