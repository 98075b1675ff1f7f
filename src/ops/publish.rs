//! Artifact publishing.
//!
//! Publishing replaces whatever sits at the destination with a relative
//! symlink to the artifact. Filesystems that cannot hold symlinks get a byte
//! copy instead; every other failure is reported.

use std::fs;
use std::io;
use std::path::Path;

use crate::ops::errors::SetupError;
use crate::util::fs::{entry_exists, relative_path, symlink};

/// Creates symbolic links. Abstracted so tests can simulate filesystems
/// without symlink support.
pub trait Linker {
    /// Create a link at `link` whose content is `target`.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;
}

/// Links through the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLinker;

impl Linker for SystemLinker {
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        symlink(target, link)
    }
}

/// Publish `source` at `destination` using the system linker.
pub fn publish(source: &Path, destination: &Path) -> Result<(), SetupError> {
    publish_with(&SystemLinker, source, destination)
}

/// Publish `source` at `destination` using `linker`.
pub fn publish_with(
    linker: &dyn Linker,
    source: &Path,
    destination: &Path,
) -> Result<(), SetupError> {
    let fail = |e: io::Error| SetupError::PublishFailure {
        source_path: source.to_path_buf(),
        destination: destination.to_path_buf(),
        source: e,
    };

    if entry_exists(destination) {
        fs::remove_file(destination).map_err(fail)?;
    }

    let parent = destination.parent().unwrap_or_else(|| Path::new(""));
    let target = relative_path(parent, source);

    match linker.symlink(&target, destination) {
        Ok(()) => {
            tracing::debug!("linked {} -> {}", destination.display(), target.display());
            Ok(())
        }
        Err(e) if is_link_unsupported(&e) => {
            tracing::debug!(
                "symlinks unsupported ({}), copying {} to {}",
                e,
                source.display(),
                destination.display()
            );
            fs::copy(source, destination).map_err(fail)?;
            Ok(())
        }
        Err(e) => Err(fail(e)),
    }
}

/// Whether a link error means "this filesystem or platform cannot do it".
fn is_link_unsupported(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::Unsupported {
        return true;
    }

    // ERROR_PRIVILEGE_NOT_HELD: symlinks need developer mode or elevation.
    #[cfg(windows)]
    {
        if err.raw_os_error() == Some(1314) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FailingLinker;
    use tempfile::TempDir;

    fn native_db(tmp: &TempDir) -> std::path::PathBuf {
        let path = tmp.path().join("build").join("native").join("compile_commands.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"[{\"file\": \"a.cpp\"}]\n").unwrap();
        path
    }

    #[test]
    fn test_unsupported_link_falls_back_to_copy() {
        let tmp = TempDir::new().unwrap();
        let source = native_db(&tmp);
        let core = tmp.path().join("core");
        fs::create_dir_all(&core).unwrap();
        let dest = core.join("compile_commands.json");

        let linker = FailingLinker::new(io::ErrorKind::Unsupported);
        publish_with(&linker, &source, &dest).unwrap();

        assert_eq!(linker.calls.get(), 1);
        assert!(!fs::symlink_metadata(&dest).unwrap().file_type().is_symlink());
        assert_eq!(fs::read(&dest).unwrap(), fs::read(&source).unwrap());
    }

    #[test]
    fn test_other_link_errors_propagate() {
        let tmp = TempDir::new().unwrap();
        let source = native_db(&tmp);
        let core = tmp.path().join("core");
        fs::create_dir_all(&core).unwrap();
        let dest = core.join("compile_commands.json");

        let linker = FailingLinker::new(io::ErrorKind::PermissionDenied);
        let err = publish_with(&linker, &source, &dest).unwrap_err();

        assert!(matches!(err, SetupError::PublishFailure { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn test_missing_destination_dir_is_failure() {
        let tmp = TempDir::new().unwrap();
        let source = native_db(&tmp);
        let dest = tmp.path().join("missing").join("compile_commands.json");

        let err = publish(&source, &dest).unwrap_err();
        assert!(matches!(err, SetupError::PublishFailure { .. }));
    }

    #[test]
    fn test_stale_file_replaced() {
        let tmp = TempDir::new().unwrap();
        let source = native_db(&tmp);
        let core = tmp.path().join("core");
        fs::create_dir_all(&core).unwrap();
        let dest = core.join("compile_commands.json");
        fs::write(&dest, "stale").unwrap();

        let linker = FailingLinker::new(io::ErrorKind::Unsupported);
        publish_with(&linker, &source, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), fs::read(&source).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_symlink_created() {
        let tmp = TempDir::new().unwrap();
        let source = native_db(&tmp);
        let core = tmp.path().join("core");
        fs::create_dir_all(&core).unwrap();
        let dest = core.join("compile_commands.json");

        publish(&source, &dest).unwrap();

        let target = fs::read_link(&dest).unwrap();
        assert_eq!(
            target,
            Path::new("../build/native/compile_commands.json")
        );
        assert_eq!(fs::read(&dest).unwrap(), fs::read(&source).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_link_replaced_and_rerun_is_stable() {
        let tmp = TempDir::new().unwrap();
        let source = native_db(&tmp);
        let core = tmp.path().join("core");
        fs::create_dir_all(&core).unwrap();
        let dest = core.join("compile_commands.json");
        symlink(Path::new("../gone/compile_commands.json"), &dest).unwrap();

        publish(&source, &dest).unwrap();
        publish(&source, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), fs::read(&source).unwrap());
    }
}
