//! 宿主调用边界
//!
//! 供外部适配层（例如某个运行时的数据集算子）调用的四个入口：
//! `construct -> open -> pull* -> close`，以及每种记录对应的输出形状。
//!
//! ```ignore
//! let handle = ops::construct::<ImageRecord, _>(&["a.gz", "b.gz"], "GZIP")?;
//! let mut records = ops::open(&handle)?;
//! while let Some(image) = ops::pull(&mut records)? { /* ... */ }
//! ops::close(&mut records);
//! ```

use std::path::PathBuf;

use crate::data::{DataError, IdxRecord, MnistDataset, Records};

/// 以文件名列表与压缩类型标签构造数据集句柄
pub fn construct<K, P>(filenames: &[P], compression_type: &str) -> Result<MnistDataset<K>, DataError>
where
    K: IdxRecord,
    P: AsRef<str>,
{
    MnistDataset::new(
        filenames.iter().map(|name| PathBuf::from(name.as_ref())),
        compression_type,
    )
}

/// 新建迭代器，按句柄的配置决定是否后台预取
pub fn open<K: IdxRecord>(dataset: &MnistDataset<K>) -> Result<Records<K>, DataError> {
    dataset.records()
}

/// 拉取下一条记录；`Ok(None)` 表示序列结束
pub fn pull<K: IdxRecord>(records: &mut Records<K>) -> Result<Option<K>, DataError> {
    records.pull()
}

/// 关闭迭代器并释放数据源，此后 `pull` 返回 `IteratorClosed`
pub fn close<K: IdxRecord>(records: &mut Records<K>) {
    records.close();
}

/// 单条记录的输出形状，`None` 表示未知维度
///
/// 图像为 `[?, ?]`（行列数要读到头部才知道），标签为标量 `[]`。
pub fn output_shape<K: IdxRecord>() -> Vec<Option<usize>> {
    K::output_shape()
}
