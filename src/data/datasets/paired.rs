//! 图像与标签配对
//!
//! 把一个图像数据集和一个标签数据集按顺序拉链成 `(image, label)` 样本。
//! 第一次 pull 时先比较两边头部声明的总数，不一致直接报 `CountMismatch`；
//! 迭代中若一侧先结束，同样报 `CountMismatch`。

use std::iter::FusedIterator;
use std::path::Path;

use tracing::warn;

use crate::data::error::DataError;
use crate::data::iter::RecordIter;
use crate::data::record::{ImageRecord, LabelRecord};

use super::mnist::{MnistImageDataset, MnistLabelDataset, Split};

/// 图像与标签配对的数据集
#[derive(Debug, Clone)]
pub struct MnistPairs {
    images: MnistImageDataset,
    labels: MnistLabelDataset,
}

impl MnistPairs {
    pub fn new(images: MnistImageDataset, labels: MnistLabelDataset) -> Self {
        Self { images, labels }
    }

    /// 按标准文件名加载某个划分，`root` 为 `None` 时使用默认目录
    ///
    /// # 返回
    /// 图像或标签文件（含 `.gz` 版本）都不存在时返回 `DataError::SourceUnavailable`
    pub fn standard(root: Option<&Path>, split: Split) -> Result<Self, DataError> {
        Ok(Self::new(
            MnistImageDataset::standard(root, split)?,
            MnistLabelDataset::standard(root, split)?,
        ))
    }

    pub fn images(&self) -> &MnistImageDataset {
        &self.images
    }

    pub fn labels(&self) -> &MnistLabelDataset {
        &self.labels
    }

    pub fn open(&self) -> PairIter {
        PairIter {
            pairs: self.clone(),
            images: self.images.open(),
            labels: self.labels.open(),
            started: false,
            finished: false,
            closed: false,
        }
    }
}

/// 逐条产出 `(ImageRecord, LabelRecord)` 的迭代器
pub struct PairIter {
    pairs: MnistPairs,
    images: RecordIter<ImageRecord>,
    labels: RecordIter<LabelRecord>,
    started: bool,
    finished: bool,
    closed: bool,
}

impl PairIter {
    pub fn pull(&mut self) -> Result<Option<(ImageRecord, LabelRecord)>, DataError> {
        if self.closed {
            return Err(DataError::IteratorClosed);
        }
        if self.finished {
            return Ok(None);
        }

        let result = self.advance();
        match &result {
            Ok(Some(_)) => {}
            Ok(None) => self.finish(),
            Err(e) => {
                warn!(error = %e, "配对迭代因错误终止");
                self.finish();
            }
        }
        result
    }

    fn advance(&mut self) -> Result<Option<(ImageRecord, LabelRecord)>, DataError> {
        if !self.started {
            self.started = true;
            let images = self.pairs.images.declared_len()?;
            let labels = self.pairs.labels.declared_len()?;
            if images != labels {
                return Err(DataError::CountMismatch { images, labels });
            }
        }

        match (self.images.pull()?, self.labels.pull()?) {
            (Some(image), Some(label)) => Ok(Some((image, label))),
            (None, None) => Ok(None),
            // 头部一致但一侧实际先结束（例如读取途中文件被替换）
            _ => Err(DataError::CountMismatch {
                images: self.images.records_emitted(),
                labels: self.labels.records_emitted(),
            }),
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        self.images.close();
        self.labels.close();
    }

    /// 关闭两侧的迭代器；此后 pull 返回 `IteratorClosed`
    pub fn close(&mut self) {
        self.images.close();
        self.labels.close();
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// 已产出的样本数
    pub fn pairs_emitted(&self) -> usize {
        self.images.records_emitted().min(self.labels.records_emitted())
    }
}

impl Iterator for PairIter {
    type Item = Result<(ImageRecord, LabelRecord), DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        self.pull().transpose()
    }
}

impl FusedIterator for PairIter {}
