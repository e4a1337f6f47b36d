//! 构造 IDX 文件字节的辅助函数
//!
//! 供单元测试、集成测试以及下游调试时在内存中生成小型数据文件。

use super::header::IdxHeader;
use super::record::{IMAGE_MAGIC, LABEL_MAGIC};

/// 构造图像文件的完整字节
///
/// # 参数
/// - `images`: 各张图像的像素，行优先，每张应恰好 `rows * cols` 字节
/// - `rows`, `cols`: 头部声明的图像尺寸
///
/// # 返回
/// 16 字节头部后紧跟全部像素
pub fn build_idx3_bytes(images: &[&[u8]], rows: u32, cols: u32) -> Vec<u8> {
    let header = IdxHeader {
        magic: IMAGE_MAGIC,
        count: images.len(),
        dims: Some((rows as usize, cols as usize)),
    };
    assemble(&header, images.iter().copied())
}

/// 构造标签文件的完整字节，8 字节头部后每个标签占 1 字节
pub fn build_idx1_bytes(labels: &[u8]) -> Vec<u8> {
    let header = IdxHeader {
        magic: LABEL_MAGIC,
        count: labels.len(),
        dims: None,
    };
    assemble(&header, [labels])
}

fn assemble<'a>(header: &IdxHeader, records: impl IntoIterator<Item = &'a [u8]>) -> Vec<u8> {
    let mut bytes = header.to_bytes();
    for record in records {
        bytes.extend_from_slice(record);
    }
    bytes
}
