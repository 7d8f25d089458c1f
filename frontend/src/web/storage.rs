//! LocalStorage 封装模块
//!
//! 通过 `gloo-storage` 取得原始 `web_sys::Storage` 句柄，按原样读写字符串，
//! 不经过 gloo 的 JSON 编码，保证键值格式与其他客户端一致。

use gloo_storage::{LocalStorage, Storage};

use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// 浏览器 LocalStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> web_sys::Storage {
        LocalStorage::raw()
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()
            .set_item(key, value)
            .map_err(|e| StorageError::new(key, format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()
            .remove_item(key)
            .map_err(|e| StorageError::new(key, format!("{:?}", e)))
    }
}
