//! # versync
//!
//! A library for finding and rewriting version numbers in the files of a project.
//!
//! Versions are located line by line with user-supplied regular expressions, transformed
//! (incremented, assigned, relabeled or overwritten), verified, and written back without touching
//! any other byte of the file.
//!
//! ## Examples
//!
//! Work with a single version:
//!
//! ```
//! use versync::prelude::*;
//!
//! let version = Version::parse("1.2.3-beta").unwrap();
//! assert_eq!("1.3.0-beta", version.increment(2, true).unwrap().to_string());
//! assert_eq!("1.2.0042-beta", version.assign(3, "0042").unwrap().to_string());
//! assert_eq!("1.2.3", version.with_label("").to_string());
//! ```
//!
//! Or, find versions in lines of text:
//!
//! ```
//! use versync::prelude::*;
//!
//! let pattern = VersionPattern::new(r"<(?<marker>Version)>(?<version>[^<]+)</Version>").unwrap();
//! let found = pattern.scan("  <Version>1.0.0.0</Version>").unwrap();
//! assert_eq!(Some(&"1.0.0.0".parse::<Version>().unwrap()), found.version());
//! ```
//!
//! Or, apply an operation to all versions in a set of files:
//!
//! ```no_run
//! use versync::prelude::*;
//!
//! let entries = vec![
//!     ConfigEntry::new("**/*.csproj"),
//!     ConfigEntry::new("**/version.txt").with_regex(r"(?<version>\d+(\.\d+)*)"),
//! ];
//! let mut engine = Engine::new(FsStore, |line: &str| println!("{line}"), Options::default());
//! engine.apply_transform(&entries, &Transform::Increment { position: 3, cascade: true })?;
//! engine.ensure(&entries)?;
//! # Ok::<(), BumpError>(())
//! ```
//!
//! ## Important Terms
//!
//! - **Version**: One or more non-negative numbers joined by `.` (or `,`), optionally followed by
//!   a label such as `-beta` or `+build.5`. The textual width of every number is kept, so `1.02`
//!   stays zero-padded when incremented. It's modeled by the [`Version`] struct.
//! - **Pattern**: A regular expression with a named group `version`, and optionally a group
//!   `marker` naming the location of a version in reports. It's modeled by [`VersionPattern`].
//! - **Entry**: A set of files (a [`Glob`]) together with a pattern, an encoding and a profile.
//!   It's modeled by [`ConfigEntry`].
//! - **Profile**: A named group of entries. Versions are reported per profile, and
//!   [`Engine::ensure`] checks that each profile agrees on one version.
//!
//! ## Prelude
//!
//! versync provides a prelude module for convenience. It contains everything needed to interact
//! with the library.
//!
//! Use it with:
//!
//! ```
//! use versync::prelude::*;
//! ```
#![warn(missing_docs)]

mod config;
mod encoding;
mod engine;
mod error;
mod glob;
mod ops;
mod scan;
mod store;
mod version;

pub use crate::config::{ConfigEntry, ConfigSource, DEFAULT_PROFILE};
pub use crate::encoding::TextEncoding;
pub use crate::engine::{Engine, Options, Reporter, TransformOutcome, NO_OP_BANNER};
pub use crate::error::{BumpError, PatternError, VersionError};
pub use crate::glob::Glob;
pub use crate::ops::Transform;
pub use crate::scan::{scan_line, ScanResult, VersionPattern, MARKER_GROUP, VERSION_GROUP};
pub use crate::store::{relative_display, FileContent, FileStore, FsStore, LineEnding};
pub use crate::version::{Delimiter, Version};

/// A convenience module appropriate for glob imports (`use versync::prelude::*;`).
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::BumpError;
    #[doc(no_inline)]
    pub use crate::ConfigEntry;
    #[doc(no_inline)]
    pub use crate::ConfigSource;
    #[doc(no_inline)]
    pub use crate::Engine;
    #[doc(no_inline)]
    pub use crate::FileStore;
    #[doc(no_inline)]
    pub use crate::FsStore;
    #[doc(no_inline)]
    pub use crate::Options;
    #[doc(no_inline)]
    pub use crate::Reporter;
    #[doc(no_inline)]
    pub use crate::ScanResult;
    #[doc(no_inline)]
    pub use crate::TextEncoding;
    #[doc(no_inline)]
    pub use crate::Transform;
    #[doc(no_inline)]
    pub use crate::Version;
    #[doc(no_inline)]
    pub use crate::VersionError;
    #[doc(no_inline)]
    pub use crate::VersionPattern;
}
