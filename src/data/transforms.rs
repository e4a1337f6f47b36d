//! 数据变换函数
//!
//! 提供把原始记录转为训练常用形式的操作，如像素归一化、one-hot 编码等。

use ndarray::{Array1, Array2};

use super::record::{ImageRecord, LabelRecord};

/// 将 0-255 像素值归一化到 0-1
///
/// # 返回
/// 与图像同形状的 `f32` 矩阵，值范围 [0, 1]
pub fn normalize_pixels(image: &ImageRecord) -> Array2<f32> {
    image.pixels().mapv(|p| f32::from(p) / 255.0)
}

/// 将图像按行优先展平为一维向量
pub fn flatten_image(image: &ImageRecord) -> Array1<u8> {
    image.pixels().iter().copied().collect()
}

/// 将类别标签转换为 one-hot 编码
///
/// # 参数
/// - `label`: 类别标签
/// - `num_classes`: 类别总数
///
/// # 返回
/// 长度为 `num_classes` 的向量；标签超出范围时全为 0
///
/// # 示例
/// ```ignore
/// let encoded = one_hot(&LabelRecord(2), 3);
/// // 结果: [0, 0, 1]
/// ```
pub fn one_hot(label: &LabelRecord, num_classes: usize) -> Array1<f32> {
    let mut encoded = Array1::zeros(num_classes);
    let class_idx = usize::from(label.value());
    if class_idx < num_classes {
        encoded[class_idx] = 1.0;
    }
    encoded
}
