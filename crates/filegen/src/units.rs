// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::{fmt, num::NonZeroU64, str::FromStr};

use crate::Error;

/// Largest length a file can take, bounded by the signed seek offset
pub const MAX_FILE_SIZE: u64 = i64::MAX as u64;

/// Storage unit
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum StorageUnit {
    /// Bytes
    Bytes = 1,

    // as 1000s,
    /// Kilobytes
    Kilobytes = 1000,
    /// Megabytes
    Megabytes = 1_000_000,
    /// Gigabytes
    Gigabytes = 1_000_000_000,
    /// Terabytes
    Terabytes = 1_000_000_000_000,

    // as 1024s, the "KB" of interactive input is a kibibyte
    /// Kibibytes
    #[default]
    Kibibytes = 1024,
    /// Mebibytes
    Mebibytes = 1024 * 1024,
    /// Gibibytes
    Gibibytes = 1024 * 1024 * 1024,
    /// Tebibytes
    Tebibytes = 1024 * 1024 * 1024 * 1024,
}

impl StorageUnit {
    /// Number of bytes in one of this unit
    pub fn multiplier(self) -> u64 {
        self as u64
    }
}

impl fmt::Display for StorageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageUnit::Bytes => f.write_str("bytes"),
            StorageUnit::Kilobytes => f.write_str("kilobytes"),
            StorageUnit::Megabytes => f.write_str("megabytes"),
            StorageUnit::Gigabytes => f.write_str("gigabytes"),
            StorageUnit::Terabytes => f.write_str("terabytes"),
            StorageUnit::Kibibytes => f.write_str("kibibytes"),
            StorageUnit::Mebibytes => f.write_str("mebibytes"),
            StorageUnit::Gibibytes => f.write_str("gibibytes"),
            StorageUnit::Tebibytes => f.write_str("tebibytes"),
        }
    }
}

impl FromStr for StorageUnit {
    type Err = Error;

    /// Attempt to convert a string to a storage unit
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "b" => Ok(Self::Bytes),
            "kb" => Ok(Self::Kilobytes),
            "mb" => Ok(Self::Megabytes),
            "gb" => Ok(Self::Gigabytes),
            "tb" => Ok(Self::Terabytes),
            "kib" => Ok(Self::Kibibytes),
            "mib" => Ok(Self::Mebibytes),
            "gib" => Ok(Self::Gibibytes),
            "tib" => Ok(Self::Tebibytes),
            _ => Err(Error::UnknownVariant),
        }
    }
}

/// Length of a file to generate, in bytes
///
/// Always non-zero and never beyond [`MAX_FILE_SIZE`], so the last byte
/// of the file is always addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileSize(NonZeroU64);

impl FileSize {
    /// Size of `value` units
    pub fn from_unit(value: u64, unit: StorageUnit) -> Result<Self, Error> {
        let bytes = value
            .checked_mul(unit.multiplier())
            .filter(|bytes| *bytes <= MAX_FILE_SIZE)
            .ok_or(Error::SizeOverflow { value, unit })?;
        NonZeroU64::new(bytes).map(Self).ok_or(Error::ZeroSize)
    }

    /// Size of `kib` kibibytes
    pub fn from_kib(kib: u64) -> Result<Self, Error> {
        Self::from_unit(kib, StorageUnit::Kibibytes)
    }

    /// Size in bytes
    pub fn bytes(self) -> u64 {
        self.0.get()
    }

    /// Whole kibibytes, if the size is an exact multiple of 1024
    pub fn as_kib(self) -> Option<u64> {
        let bytes = self.bytes();
        (bytes % StorageUnit::Kibibytes.multiplier() == 0).then(|| bytes / StorageUnit::Kibibytes.multiplier())
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_kib() {
            Some(kib) => write!(f, "{kib} KB"),
            None => write!(f, "{} bytes", self.bytes()),
        }
    }
}

/// Format a byte count with the nearest binary unit
pub fn format_size(size: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    const TB: f64 = GB * 1024.0;

    let size = size as f64;
    if size >= TB {
        format!("{:.1}TiB", size / TB)
    } else if size >= GB {
        format!("{:.1}GiB", size / GB)
    } else if size >= MB {
        format!("{:.1}MiB", size / MB)
    } else if size >= KB {
        format!("{:.1}KiB", size / KB)
    } else {
        format!("{}B", size)
    }
}
