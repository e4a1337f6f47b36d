//! 读取器配置
//!
//! 与 `DataLoader` 一样采用链式设置：
//! ```ignore
//! let config = ReaderConfig::default().buffer_capacity(1 << 20).prefetch(8);
//! ```

use serde::{Deserialize, Serialize};

use super::error::DataError;

/// 默认读缓冲区大小（64 KiB）
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// 读取器配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    /// 每个文件的读缓冲区大小（字节）
    pub buffer_capacity: usize,
    /// 后台预取队列深度，`None` 表示不预取
    pub prefetch: Option<usize>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            prefetch: None,
        }
    }
}

impl ReaderConfig {
    /// 设置读缓冲区大小
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// 开启后台预取，`depth` 为队列中最多缓存的记录数
    pub fn prefetch(mut self, depth: usize) -> Self {
        self.prefetch = Some(depth);
        self
    }

    /// 从 JSON 文本解析配置，缺省字段取默认值
    pub fn from_json(text: &str) -> Result<Self, DataError> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| DataError::ConfigError(format!("JSON 解析失败: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.buffer_capacity == 0 {
            return Err(DataError::ConfigError(
                "buffer_capacity 必须大于 0".to_string(),
            ));
        }
        if self.prefetch == Some(0) {
            return Err(DataError::ConfigError("prefetch 深度必须大于 0".to_string()));
        }
        Ok(())
    }
}
