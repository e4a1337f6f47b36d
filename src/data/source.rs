//! 文件数据源
//!
//! 按压缩类型标签打开输入文件，返回一个从偏移 0 开始的顺序字节流。
//! 解压被抽象为一层可替换的字节流变换，头部解析与记录迭代对具体压缩方式无感知。

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use flate2::read::{MultiGzDecoder, ZlibDecoder};
use serde::{Deserialize, Serialize};

use super::error::DataError;

/// 压缩类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// 不做任何变换
    #[default]
    None,
    Gzip,
    Zlib,
    /// 按扩展名判断：`.gz` 视为 gzip，其余视为未压缩
    Auto,
}

impl Compression {
    /// 针对具体文件确定实际使用的压缩方式（`Auto` 在此处被解析掉）
    pub fn resolve(self, path: &Path) -> Compression {
        match self {
            Compression::Auto => {
                if path.extension().is_some_and(|ext| ext == "gz") {
                    Compression::Gzip
                } else {
                    Compression::None
                }
            }
            other => other,
        }
    }
}

impl FromStr for Compression {
    type Err = DataError;

    /// 解析压缩标签（忽略大小写与首尾空白），空串等价于 `none`
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Compression::None),
            "gzip" | "gz" => Ok(Compression::Gzip),
            "zlib" => Ok(Compression::Zlib),
            "auto" => Ok(Compression::Auto),
            _ => Err(DataError::UnsupportedCompression(tag.to_string())),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
            Compression::Zlib => "zlib",
            Compression::Auto => "auto",
        };
        f.write_str(tag)
    }
}

/// 已打开的字节流；drop 时释放底层文件句柄
pub type ByteStream = Box<dyn Read + Send>;

/// 打开文件并按压缩类型套上解压层
///
/// # 返回
/// - 成功返回定位在偏移 0 的顺序字节流
/// - 文件无法打开时返回 `DataError::SourceUnavailable`
pub fn open_source(
    path: &Path,
    compression: Compression,
    buffer_capacity: usize,
) -> Result<ByteStream, DataError> {
    let file = File::open(path).map_err(|source| DataError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::with_capacity(buffer_capacity.max(1), file);

    let stream: ByteStream = match compression.resolve(path) {
        Compression::None | Compression::Auto => Box::new(reader),
        // 多成员 gzip（如分段压缩后拼接的文件）按一个连续流读取
        Compression::Gzip => Box::new(MultiGzDecoder::new(reader)),
        Compression::Zlib => Box::new(ZlibDecoder::new(reader)),
    };
    Ok(stream)
}

/// 以字符串标签打开数据源
pub fn open_source_tagged(
    path: &Path,
    compression_type: &str,
    buffer_capacity: usize,
) -> Result<ByteStream, DataError> {
    let compression = compression_type.parse::<Compression>()?;
    open_source(path, compression, buffer_capacity)
}
