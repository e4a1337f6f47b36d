//! 数据读取模块
//!
//! 以拉取方式逐条读取 MNIST（IDX 二进制格式）图像与标签文件。
//!
//! # 主要组件
//!
//! - [`source`]: 按压缩类型打开文件，得到顺序字节流
//! - [`header`]: 解析并校验 IDX 头部
//! - [`RecordIter`]: 惰性、有限的记录迭代器（多文件按顺序拼接）
//! - [`MnistDataset`]: 不可变的数据集句柄，每次 `open` 得到独立的迭代器
//! - [`MnistPairs`]: 图像与标签配对的样本数据集
//! - [`PrefetchIter`]: 后台线程预取
//! - [`transforms`]: 数据变换函数（归一化、one-hot 等）
//! - [`DataError`]: 数据读取错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use mnist_io::data::MnistImageDataset;
//!
//! let dataset = MnistImageDataset::new(["t10k-images-idx3-ubyte.gz"], "gzip")?;
//! for image in &dataset {
//!     let image = image?;
//!     assert_eq!(image.shape(), (28, 28));
//! }
//! ```

pub mod config;
pub mod datasets;
pub mod error;
pub mod header;
mod iter;
mod prefetch;
pub mod record;
pub mod source;
pub mod testing;
pub mod transforms;

#[cfg(test)]
mod tests;

// Re-exports
pub use config::ReaderConfig;
pub use datasets::{
    MnistDataset, MnistImageDataset, MnistLabelDataset, MnistPairs, PairIter, Split,
    default_data_dir,
};
pub use error::DataError;
pub use header::IdxHeader;
pub use iter::{IterState, RecordIter};
pub use prefetch::{PrefetchIter, Records};
pub use record::{IdxRecord, ImageRecord, LabelRecord};
pub use source::Compression;
