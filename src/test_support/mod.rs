//! Test utilities for unit tests.
//!
//! Provides on-disk project fixtures and a linker that can simulate
//! filesystems without symlink support.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::test_support::{FailingLinker, ProjectFixture};
//!
//! #[test]
//! fn test_example() {
//!     let fixture = ProjectFixture::new().with_sdk().with_cross_sources(&["app.cpp"]);
//!     let linker = FailingLinker::new(std::io::ErrorKind::Unsupported);
//!     // Run setup against fixture.layout() with the linker...
//! }
//! ```

pub mod fixtures;

use std::cell::Cell;
use std::io;
use std::path::Path;

use crate::ops::publish::Linker;

pub use fixtures::*;

/// Linker whose every call fails with a fixed error kind.
#[derive(Debug)]
pub struct FailingLinker {
    kind: io::ErrorKind,
    /// Number of link attempts
    pub calls: Cell<usize>,
}

impl FailingLinker {
    pub fn new(kind: io::ErrorKind) -> Self {
        FailingLinker {
            kind,
            calls: Cell::new(0),
        }
    }
}

impl Linker for FailingLinker {
    fn symlink(&self, _target: &Path, _link: &Path) -> io::Result<()> {
        self.calls.set(self.calls.get() + 1);
        Err(io::Error::new(self.kind, "simulated link failure"))
    }
}
