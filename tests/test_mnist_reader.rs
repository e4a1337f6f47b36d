/*
 * @Description  : 宿主调用边界集成测试
 *                 验证：construct -> open -> pull* -> close 的完整流程，
 *                 多文件拼接、压缩标签、预取配置与关闭语义
 */

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression as Level;
use flate2::write::GzEncoder;

use mnist_io::data::testing::{build_idx1_bytes, build_idx3_bytes};
use mnist_io::ops;
use mnist_io::{DataError, ImageRecord, LabelRecord, ReaderConfig};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mnist_io_it_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_gzip(path: &Path, bytes: &[u8]) {
    let mut encoder = GzEncoder::new(Vec::new(), Level::default());
    encoder.write_all(bytes).unwrap();
    fs::write(path, encoder.finish().unwrap()).unwrap();
}

/// 第 i 张图像的像素全为 i
fn digit_images(n: usize) -> Vec<Vec<u8>> {
    (0..n).map(|i| vec![i as u8; 28 * 28]).collect()
}

#[test]
fn test_output_shapes() {
    assert_eq!(ops::output_shape::<ImageRecord>(), vec![None, None]);
    assert_eq!(ops::output_shape::<LabelRecord>(), Vec::<Option<usize>>::new());
}

#[test]
fn test_gzip_images_across_two_files() {
    let dir = scratch_dir("images");
    let first = digit_images(3);
    let second = digit_images(2);
    let a = dir.join("part-0-images-idx3-ubyte.gz");
    let b = dir.join("part-1-images-idx3-ubyte.gz");
    write_gzip(&a, &build_idx3_bytes(&first.iter().map(Vec::as_slice).collect::<Vec<_>>(), 28, 28));
    write_gzip(&b, &build_idx3_bytes(&second.iter().map(Vec::as_slice).collect::<Vec<_>>(), 28, 28));

    let names = [a.to_string_lossy().into_owned(), b.to_string_lossy().into_owned()];
    let handle = ops::construct::<ImageRecord, _>(&names, "GZIP").unwrap();
    let mut records = ops::open(&handle).unwrap();

    let mut firsts = Vec::new();
    while let Some(image) = ops::pull(&mut records).unwrap() {
        assert_eq!(image.shape(), (28, 28));
        firsts.push(image.pixels()[[0, 0]]);
    }
    ops::close(&mut records);

    assert_eq!(firsts, vec![0, 1, 2, 0, 1]);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_labels_with_prefetch_config() {
    let dir = scratch_dir("labels");
    let path = dir.join("labels-idx1-ubyte");
    let labels: Vec<u8> = (0..100).map(|i| (i % 10) as u8).collect();
    fs::write(&path, build_idx1_bytes(&labels)).unwrap();

    let handle = ops::construct::<LabelRecord, _>(&[path.to_string_lossy()], "")
        .unwrap()
        .with_config(ReaderConfig::default().prefetch(8))
        .unwrap();
    let mut records = ops::open(&handle).unwrap();
    let mut pulled = Vec::new();
    while let Some(label) = ops::pull(&mut records).unwrap() {
        pulled.push(label.value());
    }
    assert_eq!(pulled, labels);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_unsupported_compression_rejected() {
    let err = ops::construct::<LabelRecord, _>(&["labels"], "snappy").unwrap_err();
    assert!(matches!(err, DataError::UnsupportedCompression(tag) if tag == "snappy"));
}

#[test]
fn test_pull_after_close_does_not_reopen() {
    let dir = scratch_dir("close");
    let path = dir.join("labels");
    fs::write(&path, build_idx1_bytes(&[1, 2, 3])).unwrap();

    let handle = ops::construct::<LabelRecord, _>(&[path.to_string_lossy()], "none").unwrap();
    let mut records = ops::open(&handle).unwrap();
    assert_eq!(ops::pull(&mut records).unwrap(), Some(LabelRecord(1)));
    ops::close(&mut records);
    fs::remove_file(&path).unwrap();

    assert!(matches!(ops::pull(&mut records), Err(DataError::IteratorClosed)));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_empty_handle_is_immediately_exhausted() {
    let handle = ops::construct::<ImageRecord, &str>(&[], "").unwrap();
    let mut records = ops::open(&handle).unwrap();
    assert!(ops::pull(&mut records).unwrap().is_none());
}
