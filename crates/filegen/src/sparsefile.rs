// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::{
    fs,
    io::{self, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use nix::sys::stat;

use crate::{format_size, Error, FileSize};

/// Chunk written per call when zero-filling
const ZERO_CHUNK: usize = 64 * 1024;

/// Size of the blocks reported in `st_blocks`
const STAT_BLOCK_SIZE: u64 = 512;

/// How the body of a generated file is produced
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FillMethod {
    /// Seek to the end and write a single zero byte
    #[default]
    Sparse,
    /// Write every byte of the file
    Zeroed,
}

/// A file to generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Target path, created or truncated
    pub path: PathBuf,

    /// Requested length
    pub size: FileSize,

    /// How the file body is written
    pub method: FillMethod,
}

impl Request {
    /// Create a sparse file request
    pub fn new(path: impl Into<PathBuf>, size: FileSize) -> Self {
        Self {
            path: path.into(),
            size,
            method: FillMethod::default(),
        }
    }

    /// Use the given fill method
    pub fn with_method(self, method: FillMethod) -> Self {
        Self { method, ..self }
    }
}

/// Outcome of a generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub path: PathBuf,

    pub size: FileSize,

    /// Bytes actually allocated on disk, when the file system reports it
    pub allocated: Option<u64>,
}

/// Creates a sparse file at the specified path with the given size.
///
/// The file is truncated, the write position moved to the last byte and a
/// single zero written there. Whatever lies before that byte is left to the
/// file system, which normally reads it back as zeroes.
///
/// # Arguments
/// * `path` - Path where the sparse file should be created
/// * `size` - Length of the resulting file
///
/// # Returns
/// `io::Result<()>` indicating success or failure
pub fn create<P>(path: P, size: FileSize) -> io::Result<()>
where
    P: AsRef<Path>,
{
    let mut file = open_truncated(path.as_ref())?;

    let last = size.bytes() - 1;
    debug!("Seeking to offset {last}");
    file.seek(SeekFrom::Start(last))?;
    file.write_all(&[0])?;

    Ok(())
}

/// Creates a file at the specified path filled entirely with zeroes.
///
/// # Arguments
/// * `path` - Path where the file should be created
/// * `size` - Length of the resulting file
///
/// # Returns
/// `io::Result<()>` indicating success or failure
pub fn create_zeroed<P>(path: P, size: FileSize) -> io::Result<()>
where
    P: AsRef<Path>,
{
    let mut file = open_truncated(path.as_ref())?;
    let zero = vec![0u8; ZERO_CHUNK];

    let mut total_left = size.bytes();
    while total_left > 0 {
        let n = usize::try_from(total_left).map_or(zero.len(), |left| left.min(zero.len()));
        file.write_all(&zero[..n])?;
        total_left -= n as u64;
    }

    file.flush()?;
    Ok(())
}

fn open_truncated(path: &Path) -> io::Result<fs::File> {
    debug!("Opening {:?} for writing", path);
    fs::OpenOptions::new().write(true).create(true).truncate(true).open(path)
}

/// Generate the file described by `request`
pub fn generate(request: &Request) -> Result<Report, Error> {
    info!(
        "Creating {:?} ({}, {:?})",
        request.path,
        format_size(request.size.bytes()),
        request.method
    );

    match request.method {
        FillMethod::Sparse => create(&request.path, request.size)?,
        FillMethod::Zeroed => create_zeroed(&request.path, request.size)?,
    }

    let allocated = allocated_bytes(&request.path);
    if let Some(allocated) = allocated {
        debug!("{:?} occupies {} on disk", request.path, format_size(allocated));
    }

    Ok(Report {
        path: request.path.clone(),
        size: request.size,
        allocated,
    })
}

/// Bytes allocated to the file by the file system
fn allocated_bytes(path: &Path) -> Option<u64> {
    match stat::stat(path) {
        Ok(st) => Some(st.st_blocks as u64 * STAT_BLOCK_SIZE),
        Err(err) => {
            warn!("Unable to stat {:?}: {}", path, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use test_log::test;

    fn kib(n: u64) -> FileSize {
        FileSize::from_kib(n).unwrap()
    }

    #[test]
    fn test_sparse_lengths() {
        let dir = tempfile::tempdir().unwrap();
        for n in [1, 2, 3, 17, 100, 4096] {
            let path = dir.path().join(format!("{n}.bin"));
            create(&path, kib(n)).unwrap();
            assert_eq!(fs::metadata(&path).unwrap().len(), n * 1024);
        }
    }

    #[test]
    fn test_output_bin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.bin");
        let report = generate(&Request::new(&path, kib(1))).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 1024);
        assert_eq!(report.path, path);
        assert_eq!(report.size, kib(1));
    }

    #[test]
    fn test_big_bin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        let report = generate(&Request::new(&path, kib(10240))).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 10_485_760);
        assert!(report.allocated.is_some());
    }

    #[test]
    fn test_last_byte_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tail.bin");
        fs::write(&path, vec![0xffu8; 4096]).unwrap();
        create(&path, kib(1)).unwrap();

        let contents = fs::read(&path).unwrap();
        assert_eq!(contents.len(), 1024);
        assert_eq!(contents[1023], 0);
    }

    #[test]
    fn test_truncates_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shrink.bin");
        create(&path, kib(64)).unwrap();
        create(&path, kib(2)).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 2048);
    }

    #[test]
    fn test_zeroed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.bin");
        // not a multiple of the chunk size
        let size = FileSize::from_unit(ZERO_CHUNK as u64 * 2 + 123, crate::StorageUnit::Bytes).unwrap();
        let request = Request::new(&path, size).with_method(FillMethod::Zeroed);
        generate(&request).unwrap();

        let mut contents = vec![];
        fs::File::open(&path).unwrap().read_to_end(&mut contents).unwrap();
        assert_eq!(contents.len() as u64, size.bytes());
        assert!(contents.iter().all(|b| *b == 0));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does").join("not").join("exist.bin");
        let err = generate(&Request::new(&path, kib(1))).unwrap_err();
        match err {
            Error::IO(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            e => panic!("unexpected error: {e}"),
        }
        assert!(!path.exists());
    }
}
