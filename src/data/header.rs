//! IDX 头部解析
//!
//! IDX 格式（所有字段均为大端 u32）：
//! - 图像文件: magic(0x00000803) | count | rows | cols | 每条记录 rows*cols 字节
//! - 标签文件: magic(0x00000801) | count | 每条记录 1 字节

use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::DataError;
use super::record::IdxRecord;

/// 解析后的头部描述
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdxHeader {
    pub magic: u32,
    /// 文件声明的记录数
    pub count: usize,
    /// 图像的 (rows, cols)；标签文件为 `None`
    pub dims: Option<(usize, usize)>,
}

impl IdxHeader {
    /// 头部字节数
    pub fn byte_len(&self) -> usize {
        if self.dims.is_some() { 16 } else { 8 }
    }

    pub fn rows(&self) -> Option<usize> {
        self.dims.map(|(rows, _)| rows)
    }

    pub fn cols(&self) -> Option<usize> {
        self.dims.map(|(_, cols)| cols)
    }

    /// 按 IDX 布局编码为大端字节，是 [`read_header`] 的逆过程
    ///
    /// 各字段按 u32 写出，超过 `u32::MAX` 的值会被截断。
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut fields = vec![self.magic, self.count as u32];
        if let Some((rows, cols)) = self.dims {
            fields.extend([rows as u32, cols as u32]);
        }
        fields.iter().flat_map(|field| field.to_be_bytes()).collect()
    }
}

/// 单次预分配的上限，更大的记录随读取逐步扩容
const PREALLOC_LIMIT: usize = 1 << 20;

/// 读取恰好 `len` 字节的负载，不足时返回 `TruncatedInput`
///
/// 缓冲区随实际读到的数据增长，头部声明的长度再大也不会一次性分配。
/// 解压流在压缩数据被截断时会报 `UnexpectedEof`，同样视为截断，`got` 为已读到的字节数。
pub(crate) fn read_payload<R: Read + ?Sized>(
    reader: &mut R,
    len: usize,
    path: &Path,
) -> Result<Vec<u8>, DataError> {
    let mut payload = Vec::with_capacity(len.min(PREALLOC_LIMIT));
    let result = Read::take(&mut *reader, len as u64).read_to_end(&mut payload);
    let got = payload.len();
    match result {
        Ok(_) if got == len => Ok(payload),
        Ok(_) => Err(truncated(path, len, got)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(truncated(path, len, got)),
        Err(e) => Err(DataError::IoError(e)),
    }
}

/// 读满 `buf`，不足时返回 `TruncatedInput`
pub(crate) fn read_exact_or_truncated<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
    path: &Path,
) -> Result<(), DataError> {
    let payload = read_payload(reader, buf.len(), path)?;
    buf.copy_from_slice(&payload);
    Ok(())
}

fn truncated(path: &Path, expected: usize, got: usize) -> DataError {
    DataError::TruncatedInput {
        path: path.to_path_buf(),
        expected,
        got,
    }
}

fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// 读取并校验 `K` 类型文件的头部，读完后流恰好位于第一条记录处
///
/// # 返回
/// - magic number 不匹配时返回 `DataError::MalformedHeader`
/// - 可读字节少于头部长度时返回 `DataError::TruncatedInput`
pub fn read_header<K: IdxRecord, R: Read + ?Sized>(
    reader: &mut R,
    path: &Path,
) -> Result<IdxHeader, DataError> {
    // 先单独读 magic，文件类型不对时尽早报错
    let mut magic_buf = [0u8; 4];
    read_exact_or_truncated(reader, &mut magic_buf, path)?;
    let magic = be_u32(&magic_buf);
    if magic != K::MAGIC {
        return Err(DataError::MalformedHeader {
            path: path.to_path_buf(),
            detail: format!(
                "magic number 不匹配: 期望 {:#010x}（{}文件）, 实际 {magic:#010x}",
                K::MAGIC,
                K::KIND
            ),
        });
    }

    let mut fields = vec![0u8; 4 * K::HEADER_FIELDS];
    read_exact_or_truncated(reader, &mut fields, path)?;
    let values: Vec<usize> = fields.chunks_exact(4).map(|c| be_u32(c) as usize).collect();

    let count = values[0];
    let dims = match values[1..] {
        [rows, cols] => {
            if rows.checked_mul(cols).is_none() {
                return Err(DataError::MalformedHeader {
                    path: path.to_path_buf(),
                    detail: format!("图像尺寸溢出: {rows}x{cols}"),
                });
            }
            Some((rows, cols))
        }
        _ => None,
    };

    Ok(IdxHeader { magic, count, dims })
}
