//! # mnist_io
//!
//! `mnist_io`以拉取（pull）方式流式读取[MNIST](http://yann.lecun.com/exdb/mnist/)使用的
//! IDX 二进制格式：图像文件逐条产出 `rows x cols` 的字节矩阵，标签文件逐条产出单字节类别。
//! 支持多个文件顺序拼接，以及透明的 gzip / zlib 解压。
//!

pub mod data;
pub mod ops;

pub use data::{
    Compression, DataError, IdxHeader, ImageRecord, LabelRecord, MnistDataset, MnistImageDataset,
    MnistLabelDataset, MnistPairs, ReaderConfig, RecordIter, Split,
};
