//! Per-file error type for headerfix-edit.
//!
//! A `PatchError` never aborts a run: the driver records it against the file
//! and moves on to the next target.

use camino::Utf8PathBuf;
use headerfix_types::report::{FileError, FileErrorKind};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    /// The file vanished between the existence check and the read.
    #[error("{path} disappeared before it could be read")]
    Missing { path: Utf8PathBuf },

    #[error("permission denied: {source}")]
    PermissionDenied {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read failed: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write failed: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PatchError {
    pub(crate) fn read(path: Utf8PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => PatchError::Missing { path },
            io::ErrorKind::PermissionDenied => PatchError::PermissionDenied { path, source },
            _ => PatchError::Read { path, source },
        }
    }

    pub(crate) fn write(path: Utf8PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::PermissionDenied => PatchError::PermissionDenied { path, source },
            _ => PatchError::Write { path, source },
        }
    }

    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            PatchError::Missing { path }
            | PatchError::PermissionDenied { path, .. }
            | PatchError::Read { path, .. }
            | PatchError::Write { path, .. } => path,
        }
    }

    pub fn kind(&self) -> FileErrorKind {
        match self {
            PatchError::Missing { .. } => FileErrorKind::Missing,
            PatchError::PermissionDenied { .. } => FileErrorKind::PermissionDenied,
            PatchError::Read { .. } => FileErrorKind::ReadFailed,
            PatchError::Write { .. } => FileErrorKind::WriteFailed,
        }
    }

    pub fn to_file_error(&self) -> FileError {
        FileError {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> Utf8PathBuf {
        Utf8PathBuf::from("Foo.h")
    }

    #[test]
    fn read_errors_are_classified_by_io_kind() {
        let err = PatchError::read(path(), io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.kind(), FileErrorKind::Missing);

        let err = PatchError::read(path(), io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.kind(), FileErrorKind::PermissionDenied);

        let err = PatchError::read(path(), io::Error::from(io::ErrorKind::InvalidData));
        assert_eq!(err.kind(), FileErrorKind::ReadFailed);
    }

    #[test]
    fn write_errors_are_classified_by_io_kind() {
        let err = PatchError::write(path(), io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.kind(), FileErrorKind::PermissionDenied);

        let err = PatchError::write(path(), io::Error::other("disk full"));
        assert_eq!(err.kind(), FileErrorKind::WriteFailed);
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn file_error_carries_display_message() {
        let err = PatchError::Missing { path: path() };
        let fe = err.to_file_error();
        assert_eq!(fe.kind, FileErrorKind::Missing);
        assert!(fe.message.contains("Foo.h"));
        assert_eq!(err.path(), &path());
    }
}
