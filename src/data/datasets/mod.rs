//! 内置数据集
//!
//! - MNIST 图像 / 标签数据集句柄（IDX 格式，逐条读取）
//! - 图像与标签配对的样本数据集

mod mnist;
mod paired;

pub use mnist::{
    MnistDataset, MnistImageDataset, MnistLabelDataset, Split, default_data_dir, locate,
};
pub use paired::{MnistPairs, PairIter};
