use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Supplies the raw, untrusted response text for a theme.
#[async_trait]
pub trait ResponseSource: Send + Sync {
    async fn fetch(&self, theme: &str) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn attempts(&self) -> u32;
    fn headers(&self) -> &HashMap<String, String>;
}
