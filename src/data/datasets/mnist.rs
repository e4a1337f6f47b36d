//! MNIST 数据集句柄
//!
//! 支持：
//! - IDX 二进制格式的惰性逐条读取（支持 gzip / zlib 压缩）
//! - 多文件按顺序拼接成一个逻辑序列
//! - 按标准文件名在数据目录中定位文件（优先未压缩版本，其次 `.gz`）

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::data::config::ReaderConfig;
use crate::data::error::DataError;
use crate::data::header::{IdxHeader, read_header};
use crate::data::iter::RecordIter;
use crate::data::prefetch::Records;
use crate::data::record::{IdxRecord, ImageRecord, LabelRecord};
use crate::data::source::{Compression, open_source};

/// MNIST 图像数据集
pub type MnistImageDataset = MnistDataset<ImageRecord>;
/// MNIST 标签数据集
pub type MnistLabelDataset = MnistDataset<LabelRecord>;

/// 已配置、尚未迭代的数据源描述
///
/// 构造后不可变；克隆开销很小（文件列表共享）。每次 [`open`](Self::open)
/// 都得到一个独立的、从头开始的迭代器。
pub struct MnistDataset<K: IdxRecord> {
    filenames: Arc<[PathBuf]>,
    compression: Compression,
    config: ReaderConfig,
    _kind: PhantomData<fn() -> K>,
}

impl<K: IdxRecord> Clone for MnistDataset<K> {
    fn clone(&self) -> Self {
        Self {
            filenames: Arc::clone(&self.filenames),
            compression: self.compression,
            config: self.config,
            _kind: PhantomData,
        }
    }
}

impl<K: IdxRecord> fmt::Debug for MnistDataset<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnistDataset")
            .field("kind", &K::KIND)
            .field("filenames", &self.filenames)
            .field("compression", &self.compression)
            .field("config", &self.config)
            .finish()
    }
}

impl<K: IdxRecord> MnistDataset<K> {
    /// 以文件名列表和压缩类型标签构造
    ///
    /// # 参数
    /// - `filenames`: 按顺序读取的文件，可以为空（得到立即结束的迭代器）
    /// - `compression_type`: `""`/`"none"`、`"gzip"`、`"zlib"` 或 `"auto"`（忽略大小写）
    ///
    /// # 返回
    /// 标签无法识别时返回 `DataError::UnsupportedCompression`
    pub fn new<I, P>(filenames: I, compression_type: &str) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let compression = compression_type.parse::<Compression>()?;
        Ok(Self::with_compression(filenames, compression))
    }

    pub fn with_compression<I, P>(filenames: I, compression: Compression) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            filenames: filenames.into_iter().map(Into::into).collect(),
            compression,
            config: ReaderConfig::default(),
            _kind: PhantomData,
        }
    }

    /// 替换读取配置
    pub fn with_config(mut self, config: ReaderConfig) -> Result<Self, DataError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn filenames(&self) -> &[PathBuf] {
        &self.filenames
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// 新建一个同步迭代器（此时不做任何 IO，第一次 pull 时才打开文件）
    pub fn open(&self) -> RecordIter<K> {
        RecordIter::new(
            Arc::clone(&self.filenames),
            self.compression,
            self.config.buffer_capacity,
        )
    }

    /// 按配置新建迭代器：配置了 `prefetch` 时启用后台预取
    pub fn records(&self) -> Result<Records<K>, DataError> {
        match self.config.prefetch {
            Some(depth) => Ok(Records::Prefetched(self.open().prefetch(depth)?)),
            None => Ok(Records::Direct(self.open())),
        }
    }

    /// 依次读取每个文件的头部（不读记录），返回各文件的头部描述
    pub fn headers(&self) -> Result<Vec<IdxHeader>, DataError> {
        self.filenames
            .iter()
            .map(|path| {
                let mut stream =
                    open_source(path, self.compression, self.config.buffer_capacity)?;
                read_header::<K, _>(&mut stream, path)
            })
            .collect()
    }

    /// 所有文件头部声明的记录总数
    pub fn declared_len(&self) -> Result<usize, DataError> {
        Ok(self.headers()?.iter().map(|header| header.count).sum())
    }
}

impl<K: IdxRecord> IntoIterator for &MnistDataset<K> {
    type Item = Result<K, DataError>;
    type IntoIter = RecordIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.open()
    }
}

/// 训练集或测试集
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    /// 图像文件的标准文件名（不含 `.gz`）
    pub fn images_stem(self) -> &'static str {
        match self {
            Split::Train => "train-images-idx3-ubyte",
            Split::Test => "t10k-images-idx3-ubyte",
        }
    }

    /// 标签文件的标准文件名（不含 `.gz`）
    pub fn labels_stem(self) -> &'static str {
        match self {
            Split::Train => "train-labels-idx1-ubyte",
            Split::Test => "t10k-labels-idx1-ubyte",
        }
    }
}

/// 获取默认数据目录
pub fn default_data_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mnist_io")
        .join("datasets")
        .join("mnist")
}

/// 在 `dir` 中定位标准文件：优先未压缩文件，其次 `.gz`
pub fn locate(dir: &Path, stem: &str) -> Result<PathBuf, DataError> {
    let plain = dir.join(stem);
    if plain.is_file() {
        return Ok(plain);
    }

    let gz = dir.join(format!("{stem}.gz"));
    if gz.is_file() {
        return Ok(gz);
    }

    Err(DataError::SourceUnavailable {
        path: plain,
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "未找到文件（含 .gz 版本）"),
    })
}

fn resolve_root(root: Option<&Path>) -> PathBuf {
    root.map(Path::to_path_buf).unwrap_or_else(default_data_dir)
}

impl MnistImageDataset {
    /// 按标准文件名加载某个划分的图像文件，`root` 为 `None` 时使用默认目录
    pub fn standard(root: Option<&Path>, split: Split) -> Result<Self, DataError> {
        let path = locate(&resolve_root(root), split.images_stem())?;
        debug!(path = ?path, ?split, "定位到图像文件");
        Ok(Self::with_compression([path], Compression::Auto))
    }
}

impl MnistLabelDataset {
    /// 按标准文件名加载某个划分的标签文件，`root` 为 `None` 时使用默认目录
    pub fn standard(root: Option<&Path>, split: Split) -> Result<Self, DataError> {
        let path = locate(&resolve_root(root), split.labels_stem())?;
        debug!(path = ?path, ?split, "定位到标签文件");
        Ok(Self::with_compression([path], Compression::Auto))
    }
}
