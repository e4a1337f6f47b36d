//! transforms 模块单元测试

use approx::assert_abs_diff_eq;
use ndarray::array;

use crate::data::transforms::{flatten_image, normalize_pixels, one_hot};
use crate::data::{ImageRecord, LabelRecord};

#[test]
fn test_normalize_pixels_basic() {
    let image = ImageRecord::new(array![[0u8, 51], [255, 102]]);
    let normalized = normalize_pixels(&image);

    assert_eq!(normalized.dim(), (2, 2));
    assert_abs_diff_eq!(normalized[[0, 0]], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(normalized[[0, 1]], 0.2, epsilon = 1e-6);
    assert_abs_diff_eq!(normalized[[1, 0]], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(normalized[[1, 1]], 0.4, epsilon = 1e-6);
}

#[test]
fn test_flatten_image() {
    let image = ImageRecord::new(array![[1u8, 2], [3, 4]]);
    assert_eq!(flatten_image(&image), array![1u8, 2, 3, 4]);
}

#[test]
fn test_one_hot_basic() {
    let encoded = one_hot(&LabelRecord(2), 3);
    assert_eq!(encoded, array![0.0f32, 0.0, 1.0]);
}

#[test]
fn test_one_hot_out_of_range() {
    // 超出类别数时全为 0
    let encoded = one_hot(&LabelRecord(12), 10);
    assert_eq!(encoded.len(), 10);
    assert_abs_diff_eq!(encoded.sum(), 0.0);
}
