//! 解码后的记录类型
//!
//! - [`ImageRecord`]: 形状为 `(rows, cols)` 的 `u8` 像素网格（行优先）
//! - [`LabelRecord`]: 单字节类别值
//!
//! 两者都实现 [`IdxRecord`]，它把记录类型与 magic number、头部字段数、
//! 每条记录的字节数以及解码方式绑定在一起，迭代器只依赖这一 trait。

use std::path::Path;

use image::GrayImage;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::error::DataError;
use super::header::IdxHeader;

/// 图像文件的 magic number
pub const IMAGE_MAGIC: u32 = 0x0000_0803;
/// 标签文件的 magic number
pub const LABEL_MAGIC: u32 = 0x0000_0801;

/// 一种可以从 IDX 文件中逐条读出的记录
pub trait IdxRecord: Sized + Send + 'static {
    /// 期望的 magic number
    const MAGIC: u32;
    /// 头部中 magic 之后的 u32 字段个数
    const HEADER_FIELDS: usize;
    /// 用于日志与错误信息的类型名
    const KIND: &'static str;

    /// 每条记录的字节数
    fn record_len(header: &IdxHeader) -> usize;

    /// 将恰好 `record_len` 字节的负载解码为一条记录
    fn decode(payload: Vec<u8>, header: &IdxHeader, path: &Path) -> Result<Self, DataError>;

    /// 单条记录的输出形状，`None` 表示该维度要到读取头部后才知道
    fn output_shape() -> Vec<Option<usize>>;
}

/// 一张图像
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord(Array2<u8>);

impl ImageRecord {
    pub fn new(pixels: Array2<u8>) -> Self {
        Self(pixels)
    }

    pub fn rows(&self) -> usize {
        self.0.nrows()
    }

    pub fn cols(&self) -> usize {
        self.0.ncols()
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.0.dim()
    }

    pub fn pixels(&self) -> &Array2<u8> {
        &self.0
    }

    pub fn into_array(self) -> Array2<u8> {
        self.0
    }

    /// 转为灰度图（宽 = cols，高 = rows），便于保存或查看
    pub fn to_gray_image(&self) -> Option<GrayImage> {
        let (rows, cols) = self.shape();
        let raw: Vec<u8> = self.0.iter().copied().collect();
        GrayImage::from_raw(cols as u32, rows as u32, raw)
    }
}

impl IdxRecord for ImageRecord {
    const MAGIC: u32 = IMAGE_MAGIC;
    const HEADER_FIELDS: usize = 3;
    const KIND: &'static str = "图像";

    fn record_len(header: &IdxHeader) -> usize {
        header.dims.map_or(0, |(rows, cols)| rows * cols)
    }

    fn decode(payload: Vec<u8>, header: &IdxHeader, path: &Path) -> Result<Self, DataError> {
        let dims = header.dims.ok_or_else(|| DataError::MalformedHeader {
            path: path.to_path_buf(),
            detail: "图像头部缺少行列数".to_string(),
        })?;
        let pixels =
            Array2::from_shape_vec(dims, payload).map_err(|e| DataError::MalformedHeader {
                path: path.to_path_buf(),
                detail: format!("像素数与尺寸 {}x{} 不符: {e}", dims.0, dims.1),
            })?;
        Ok(Self(pixels))
    }

    fn output_shape() -> Vec<Option<usize>> {
        vec![None, None]
    }
}

/// 一个标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LabelRecord(pub u8);

impl LabelRecord {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl From<LabelRecord> for u8 {
    fn from(label: LabelRecord) -> Self {
        label.0
    }
}

impl IdxRecord for LabelRecord {
    const MAGIC: u32 = LABEL_MAGIC;
    const HEADER_FIELDS: usize = 1;
    const KIND: &'static str = "标签";

    fn record_len(_header: &IdxHeader) -> usize {
        1
    }

    fn decode(payload: Vec<u8>, _header: &IdxHeader, path: &Path) -> Result<Self, DataError> {
        match payload.as_slice() {
            [value] => Ok(Self(*value)),
            other => Err(DataError::TruncatedInput {
                path: path.to_path_buf(),
                expected: 1,
                got: other.len(),
            }),
        }
    }

    fn output_shape() -> Vec<Option<usize>> {
        Vec::new()
    }
}
