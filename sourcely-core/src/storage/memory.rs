use std::collections::HashMap;
use std::sync::Mutex;

use super::{ClientStorage, StorageError};

/// 进程内存储，记录每次写入
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置值，不计入写入记录
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.into(), value.into());
        }
        self
    }

    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        self.writes
            .lock()
            .map_err(|_| StorageError::Poisoned)?
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_values_are_not_writes() {
        let storage = MemoryStorage::new().with("token", "abc");
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("abc"));
        assert!(storage.writes().is_empty());

        storage.set("language", "zh").unwrap();
        assert_eq!(storage.get("language").unwrap().as_deref(), Some("zh"));
        assert_eq!(storage.writes(), vec![("language".to_string(), "zh".to_string())]);
        assert_eq!(storage.get("missing").unwrap(), None);
    }
}
