//! Atomic file replacement.

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `path` with `contents` via a sibling temp file and a rename.
///
/// Symlinks are followed: the file they point at is replaced and the link
/// itself stays. The temp file takes the target's permissions and is synced
/// before the rename. On any error the original file is left as it was.
pub(crate) fn replace_atomic(path: &Utf8Path, contents: &str) -> io::Result<()> {
    let target = fs::canonicalize(path)?;
    let perms = fs::metadata(&target)?.permissions();
    let dir = target.parent().unwrap_or(Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.as_file().set_permissions(perms)?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

/// Copy `path` to `<path><suffix>` and return the backup location.
///
/// An empty suffix is rejected, since the copy would land on `path` itself.
pub(crate) fn write_backup(path: &Utf8Path, suffix: &str) -> io::Result<Utf8PathBuf> {
    if suffix.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "backup suffix is empty",
        ));
    }
    let backup = Utf8PathBuf::from(format!("{path}{suffix}"));
    fs::copy(path, &backup)?;
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8")
    }

    #[test]
    fn replace_overwrites_and_leaves_no_temp_files() {
        let temp = TempDir::new().expect("temp dir");
        let path = root(&temp).join("Foo.h");
        std::fs::write(&path, "old").expect("write");

        replace_atomic(&path, "new").expect("replace");

        assert_eq!(std::fs::read_to_string(&path).expect("read"), "new");
        let entries = std::fs::read_dir(temp.path()).expect("read dir").count();
        assert_eq!(entries, 1);
    }

    #[cfg(unix)]
    #[test]
    fn replace_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("temp dir");
        let path = root(&temp).join("Foo.h");
        std::fs::write(&path, "old").expect("write");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).expect("chmod");

        replace_atomic(&path, "new").expect("replace");

        let mode = std::fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn replace_fails_without_creating_missing_target() {
        let temp = TempDir::new().expect("temp dir");
        let path = root(&temp).join("nope").join("Foo.h");

        assert!(replace_atomic(&path, "new").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn backup_copies_original_bytes() {
        let temp = TempDir::new().expect("temp dir");
        let path = root(&temp).join("Foo.h");
        std::fs::write(&path, "#import <X/X.h>\n").expect("write");

        let backup = write_backup(&path, ".bak").expect("backup");

        assert_eq!(backup, root(&temp).join("Foo.h.bak"));
        assert_eq!(
            std::fs::read_to_string(&backup).expect("read"),
            "#import <X/X.h>\n"
        );
    }

    #[test]
    fn backup_rejects_empty_suffix() {
        let temp = TempDir::new().expect("temp dir");
        let path = root(&temp).join("Foo.h");
        std::fs::write(&path, "#import <X/X.h>\n").expect("write");

        let err = write_backup(&path, "").expect_err("empty suffix");

        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(
            std::fs::read_to_string(&path).expect("read"),
            "#import <X/X.h>\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn replace_writes_through_symlink() {
        let temp = TempDir::new().expect("temp dir");
        let real = root(&temp).join("Real.h");
        let link = root(&temp).join("Link.h");
        std::fs::write(&real, "old").expect("write");
        std::os::unix::fs::symlink(&real, &link).expect("symlink");

        replace_atomic(&link, "new").expect("replace");

        assert!(
            std::fs::symlink_metadata(&link)
                .expect("lstat")
                .file_type()
                .is_symlink()
        );
        assert_eq!(std::fs::read_to_string(&real).expect("read"), "new");
        assert_eq!(std::fs::read_to_string(&link).expect("read"), "new");
    }
}
