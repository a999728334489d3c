//! Shared filesystem helpers built on `cap-std` and `camino`.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use std::{fs, io};

/// How a store file is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessMode {
    /// Read-only access.
    ReadOnly,
    /// Read and write access; the file must already exist.
    #[default]
    ReadWrite,
}

/// Open an existing UTF-8 file path in `mode` using ambient authority.
///
/// The file is never created or truncated.
pub fn open_utf8_file_with(path: &Utf8Path, mode: AccessMode) -> io::Result<fs_utf8::File> {
    let mut options = fs_utf8::OpenOptions::new();
    options.read(true).write(mode == AccessMode::ReadWrite);
    fs_utf8::File::open_ambient_with(path, &options, ambient_authority())
}

/// Open an existing file in `mode` and hand back a standard library handle.
pub fn open_std_file(path: &Utf8Path, mode: AccessMode) -> io::Result<fs::File> {
    open_utf8_file_with(path, mode).map(fs_utf8::File::into_std)
}
