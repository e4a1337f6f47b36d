/*
 * @Description  : 记录迭代器（拉取式、惰性、有限）
 *
 * 状态机：Uninitialized -> Iterating -> Exhausted | Closed
 * - 第一次 pull 时才打开第一个文件并解析头部；
 * - 每次 pull 恰好读取一条记录的字节并解码；
 * - 当前文件的记录数用尽后按顺序打开下一个文件，全部读完即 Exhausted；
 * - 任何读取失败都是终结性的（不重试），底层文件随即释放；
 * - close() 后再 pull 返回 IteratorClosed，且不会重新打开数据源。
 */

use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use super::error::DataError;
use super::header::{IdxHeader, read_header, read_payload};
use super::record::IdxRecord;
use super::source::{ByteStream, Compression, open_source};

/// 迭代器所处状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterState {
    /// 尚未 pull 过，数据源未打开
    Uninitialized,
    Iterating,
    /// 所有记录已读完，或因错误终止
    Exhausted,
    Closed,
}

/// 当前正在读取的文件
struct OpenFile {
    path: PathBuf,
    stream: ByteStream,
    header: IdxHeader,
    pending: usize,
}

/// 按文件顺序逐条产出 `K` 记录的迭代器
///
/// # 示例
/// ```ignore
/// let dataset = MnistImageDataset::new(["train-images-idx3-ubyte.gz"], "gzip")?;
/// let mut iter = dataset.open();
/// while let Some(image) = iter.pull()? {
///     println!("{:?}", image.shape());
/// }
/// ```
pub struct RecordIter<K: IdxRecord> {
    filenames: Arc<[PathBuf]>,
    compression: Compression,
    buffer_capacity: usize,
    state: IterState,
    next_file: usize,
    current: Option<OpenFile>,
    records_emitted: usize,
    bytes_consumed: u64,
    _kind: PhantomData<fn() -> K>,
}

impl<K: IdxRecord> RecordIter<K> {
    pub(crate) fn new(
        filenames: Arc<[PathBuf]>,
        compression: Compression,
        buffer_capacity: usize,
    ) -> Self {
        Self {
            filenames,
            compression,
            buffer_capacity,
            state: IterState::Uninitialized,
            next_file: 0,
            current: None,
            records_emitted: 0,
            bytes_consumed: 0,
            _kind: PhantomData,
        }
    }

    /// 拉取下一条记录
    ///
    /// # 返回
    /// - `Ok(Some(record))`: 下一条记录
    /// - `Ok(None)`: 已读完（此后每次都返回 `Ok(None)`）
    /// - `Err(DataError::IteratorClosed)`: 已调用过 `close`
    /// - 其他错误：当前迭代器就此终止
    pub fn pull(&mut self) -> Result<Option<K>, DataError> {
        match self.state {
            IterState::Closed => return Err(DataError::IteratorClosed),
            IterState::Exhausted => return Ok(None),
            IterState::Uninitialized => self.state = IterState::Iterating,
            IterState::Iterating => {}
        }

        match self.advance() {
            Ok(Some(record)) => Ok(Some(record)),
            Ok(None) => {
                self.state = IterState::Exhausted;
                debug!(
                    kind = K::KIND,
                    records = self.records_emitted,
                    bytes = self.bytes_consumed,
                    "数据集读取完毕"
                );
                Ok(None)
            }
            Err(e) => {
                self.current = None;
                self.state = IterState::Exhausted;
                warn!(
                    kind = K::KIND,
                    records = self.records_emitted,
                    error = %e,
                    "迭代因错误终止"
                );
                Err(e)
            }
        }
    }

    fn advance(&mut self) -> Result<Option<K>, DataError> {
        loop {
            if let Some(file) = self.current.as_mut() {
                if file.pending > 0 {
                    let len = K::record_len(&file.header);
                    let payload = read_payload(&mut file.stream, len, &file.path)?;
                    file.pending -= 1;
                    self.bytes_consumed += payload.len() as u64;
                    let record = K::decode(payload, &file.header, &file.path)?;
                    self.records_emitted += 1;
                    return Ok(Some(record));
                }
                debug!(path = ?file.path, count = file.header.count, "文件读取完毕");
                // 释放当前文件句柄
                self.current = None;
            }

            let Some(path) = self.filenames.get(self.next_file) else {
                return Ok(None);
            };
            self.next_file += 1;

            let mut stream = open_source(path, self.compression, self.buffer_capacity)?;
            let header = read_header::<K, _>(&mut stream, path)?;
            self.bytes_consumed += header.byte_len() as u64;
            debug!(
                path = ?path,
                kind = K::KIND,
                count = header.count,
                dims = ?header.dims,
                "已打开文件并解析头部"
            );
            self.current = Some(OpenFile {
                path: path.clone(),
                stream,
                header,
                pending: header.count,
            });
        }
    }

    /// 关闭迭代器并释放底层数据源；可在任意状态调用，重复调用无副作用
    pub fn close(&mut self) {
        if self.state != IterState::Closed {
            debug!(kind = K::KIND, records = self.records_emitted, "关闭迭代器");
        }
        self.current = None;
        self.state = IterState::Closed;
    }

    pub fn state(&self) -> IterState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == IterState::Closed
    }

    /// 当前文件的头部（尚未打开或已在文件之间时为 `None`）
    pub fn header(&self) -> Option<&IdxHeader> {
        self.current.as_ref().map(|file| &file.header)
    }

    /// 当前文件中尚未读取的记录数
    pub fn pending(&self) -> usize {
        self.current.as_ref().map_or(0, |file| file.pending)
    }

    /// 已产出的记录数（跨所有文件）
    pub fn records_emitted(&self) -> usize {
        self.records_emitted
    }

    /// 已消费的字节数（解压后，含头部）
    pub fn bytes_consumed(&self) -> u64 {
        self.bytes_consumed
    }
}

impl<K: IdxRecord> Iterator for RecordIter<K> {
    type Item = Result<K, DataError>;

    /// 出错后返回一次 `Some(Err(..))`，之后返回 `None`；关闭后直接返回 `None`
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_closed() {
            return None;
        }
        self.pull().transpose()
    }
}

impl<K: IdxRecord> FusedIterator for RecordIter<K> {}
