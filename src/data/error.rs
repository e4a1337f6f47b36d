//! 数据读取错误类型定义

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 读取 IDX 数据集时的相关错误
///
/// 所有错误对当前迭代器都是终结性的：内部不做任何重试，原样传递给调用方。
#[derive(Debug, Error)]
pub enum DataError {
    /// 输入无法打开（不存在、无权限等）
    #[error("数据源不可用: {path:?} ({source})")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 不支持的压缩类型标签
    #[error("不支持的压缩类型: {0:?}（可选: \"\"/none、gzip、zlib、auto）")]
    UnsupportedCompression(String),

    /// 头部格式错误（如 magic number 不匹配）
    #[error("头部格式错误: {path:?}: {detail}")]
    MalformedHeader { path: PathBuf, detail: String },

    /// 输入在头部或记录中途提前结束
    #[error("输入被截断: {path:?}: 期望 {expected} 字节, 实际只读到 {got} 字节")]
    TruncatedInput {
        path: PathBuf,
        expected: usize,
        got: usize,
    },

    /// 迭代器已关闭
    #[error("迭代器已关闭")]
    IteratorClosed,

    /// 图像与标签数量不一致
    #[error("数量不匹配: 图像 {images} 个, 标签 {labels} 个")]
    CountMismatch { images: usize, labels: usize },

    /// IO 错误（非 EOF 的读取失败，如解压流损坏）
    #[error("IO 错误: {0}")]
    IoError(#[from] io::Error),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),
}

impl DataError {
    pub fn is_truncated(&self) -> bool {
        matches!(self, DataError::TruncatedInput { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, DataError::MalformedHeader { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, DataError::IteratorClosed)
    }
}
