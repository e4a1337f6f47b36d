//! 后台预取
//!
//! 把 [`RecordIter`] 移入一个工作线程，由它提前读取记录并放入有界队列，
//! 调用方仍通过同样的 pull 接口按顺序取出记录或错误。
//! 关闭时先丢弃接收端，工作线程在下一次发送失败时退出，随后被 join。

use std::io;
use std::iter::FusedIterator;
use std::sync::mpsc::{Receiver, sync_channel};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use super::error::DataError;
use super::iter::RecordIter;
use super::record::IdxRecord;

/// 带后台预取的记录迭代器
pub struct PrefetchIter<K: IdxRecord> {
    receiver: Option<Receiver<Result<K, DataError>>>,
    worker: Option<JoinHandle<()>>,
    finished: bool,
}

impl<K: IdxRecord> RecordIter<K> {
    /// 转为后台预取模式，`depth` 为队列中最多缓存的记录数（至少为 1）
    pub fn prefetch(self, depth: usize) -> Result<PrefetchIter<K>, DataError> {
        PrefetchIter::spawn(self, depth)
    }
}

impl<K: IdxRecord> PrefetchIter<K> {
    fn spawn(mut inner: RecordIter<K>, depth: usize) -> Result<Self, DataError> {
        let (sender, receiver) = sync_channel(depth.max(1));
        let worker = thread::Builder::new()
            .name("mnist-prefetch".to_string())
            .spawn(move || {
                loop {
                    let item = match inner.pull() {
                        Ok(Some(record)) => Ok(record),
                        Ok(None) => break,
                        Err(e) => Err(e),
                    };
                    let failed = item.is_err();
                    // 接收端已被丢弃，说明调用方关闭了迭代器
                    if sender.send(item).is_err() || failed {
                        break;
                    }
                }
                inner.close();
            })?;
        debug!(depth, "后台预取线程已启动");

        Ok(Self {
            receiver: Some(receiver),
            worker: Some(worker),
            finished: false,
        })
    }

    /// 拉取下一条记录，必要时阻塞等待工作线程
    pub fn pull(&mut self) -> Result<Option<K>, DataError> {
        let Some(receiver) = self.receiver.as_ref() else {
            return Err(DataError::IteratorClosed);
        };
        if self.finished {
            return Ok(None);
        }

        match receiver.recv() {
            Ok(Ok(record)) => Ok(Some(record)),
            Ok(Err(e)) => {
                self.finished = true;
                self.join_worker();
                Err(e)
            }
            // 发送端已丢弃：工作线程正常读完，或者中途 panic
            Err(_) => {
                self.finished = true;
                if self.join_worker() {
                    Ok(None)
                } else {
                    Err(DataError::IoError(io::Error::other("后台预取线程异常退出")))
                }
            }
        }
    }

    /// 关闭：丢弃队列中未取出的记录并等待工作线程退出
    pub fn close(&mut self) {
        self.receiver = None;
        self.join_worker();
    }

    pub fn is_closed(&self) -> bool {
        self.receiver.is_none()
    }

    /// 等待工作线程退出，线程 panic 时返回 `false`
    fn join_worker(&mut self) -> bool {
        let Some(worker) = self.worker.take() else {
            return true;
        };
        let clean = worker.join().is_ok();
        if !clean {
            warn!("后台预取线程异常退出");
        }
        clean
    }
}

impl<K: IdxRecord> Drop for PrefetchIter<K> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<K: IdxRecord> Iterator for PrefetchIter<K> {
    type Item = Result<K, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_closed() {
            return None;
        }
        self.pull().transpose()
    }
}

impl<K: IdxRecord> FusedIterator for PrefetchIter<K> {}

/// 同步或预取两种读取方式的统一入口，由 [`ReaderConfig::prefetch`](super::config::ReaderConfig) 决定
pub enum Records<K: IdxRecord> {
    Direct(RecordIter<K>),
    Prefetched(PrefetchIter<K>),
}

impl<K: IdxRecord> Records<K> {
    pub fn pull(&mut self) -> Result<Option<K>, DataError> {
        match self {
            Records::Direct(iter) => iter.pull(),
            Records::Prefetched(iter) => iter.pull(),
        }
    }

    pub fn close(&mut self) {
        match self {
            Records::Direct(iter) => iter.close(),
            Records::Prefetched(iter) => iter.close(),
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            Records::Direct(iter) => iter.is_closed(),
            Records::Prefetched(iter) => iter.is_closed(),
        }
    }
}

impl<K: IdxRecord> Iterator for Records<K> {
    type Item = Result<K, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Records::Direct(iter) => iter.next(),
            Records::Prefetched(iter) => iter.next(),
        }
    }
}
