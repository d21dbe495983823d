use std::{io, path::PathBuf};

/// Errors that occur when parsing or transforming a [`Version`](crate::Version).
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum VersionError {
    /// The text does not conform to the version grammar, e.g. `invalid.input`.
    #[error("The provided version string `{text}` is not supported")]
    Unparseable {
        /// The offending text
        text: String,
    },

    /// A number given as literal text could not be parsed as an integer.
    #[error("Expected `{text}` to be a number")]
    NotANumber {
        /// The offending text
        text: String,
    },

    /// A component position is outside of `1..=count`.
    #[error("Position `{position}` should be between 1 and {count}")]
    PositionOutOfRange {
        /// The requested one-based position
        position: i64,
        /// The number of components in the version
        count: usize,
    },

    /// Incrementing a number would exceed the largest representable value.
    #[error("Number at position `{position}` is too large to increment")]
    Overflow {
        /// The requested one-based position
        position: i64,
    },

    /// A number to assign is negative.
    #[error("Number `{number}` should not be negative")]
    NegativeNumber {
        /// The offending number
        number: i64,
    },
}

impl VersionError {
    /// Returns true if this error is about text that could not be read as a version or number.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Unparseable { .. } | Self::NotANumber { .. })
    }

    /// Returns true if this error is about a position or number outside of its allowed range.
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            Self::PositionOutOfRange { .. } | Self::Overflow { .. } | Self::NegativeNumber { .. }
        )
    }
}

/// Errors for patterns (regular expressions and file globs) that cannot be used for scanning.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum PatternError {
    /// The pattern is not a valid regular expression.
    #[error("Pattern `{pattern}` is not a valid regular expression: {reason}")]
    Invalid {
        /// The offending pattern
        pattern: String,
        /// Why the regex engine rejected it
        reason: String,
    },
}

/// Errors raised while applying a version operation across a set of files.
#[derive(thiserror::Error, Debug)]
pub enum BumpError {
    /// See [`VersionError`].
    #[error("{0}")]
    Version(#[from] VersionError),

    /// See [`PatternError`].
    #[error("{0}")]
    Pattern(#[from] PatternError),

    /// A rewritten line no longer yields the version that was written into it.
    #[error("The provided version `{version}` cannot be captured in the text `{text}` using the regex `{pattern}`. Please correct either the version or the regex")]
    Verification {
        /// The version that should have been found
        version: String,
        /// The rewritten line
        text: String,
        /// The pattern used to scan the line
        pattern: String,
    },

    /// More than one distinct version was found within a profile.
    #[error("Found different versions{} ({}).", profile_clause(.profile), .versions.join(", "))]
    InconsistentVersions {
        /// The profile that is inconsistent (empty for the default profile)
        profile: String,
        /// The distinct versions, in the order they were first seen
        versions: Vec<String>,
    },

    /// Reading, writing or enumerating a file failed.
    #[error("I/O error on `{}`: {source}", .path.display())]
    Io {
        /// The path being accessed
        path: PathBuf,
        /// The underlying error
        #[source]
        source: io::Error,
    },

    /// Text could not be decoded from, or encoded to, a file's encoding.
    #[error("Content of `{}` cannot be represented in encoding `{encoding}`", .path.display())]
    Encoding {
        /// The file being read or written
        path: PathBuf,
        /// The name of the encoding
        encoding: &'static str,
    },

    /// An encoding label or code page is not known.
    #[error("Unknown encoding `{label}`")]
    UnknownEncoding {
        /// The offending label
        label: String,
    },

    /// A configuration entry cannot be used.
    #[error("Invalid configuration: {reason}")]
    Config {
        /// What is wrong with the entry
        reason: String,
    },

    /// A profile filter was given, but no configuration entry belongs to it.
    #[error("Profile `{profile}` does not exist in the configuration")]
    ProfileNotFound {
        /// The requested profile
        profile: String,
    },
}

fn profile_clause(profile: &str) -> String {
    if profile.is_empty() {
        String::new()
    } else {
        format!(" in profile '{profile}'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(VersionError::Unparseable { text: "x".into() }.is_format_error());
        assert!(VersionError::NotANumber { text: "x".into() }.is_format_error());
        assert!(VersionError::NegativeNumber { number: -1 }.is_range_error());
        let range = VersionError::PositionOutOfRange {
            position: 0,
            count: 3,
        };
        assert!(range.is_range_error());
        assert!(!range.is_format_error());
    }

    #[test]
    fn test_inconsistent_message() {
        let err = BumpError::InconsistentVersions {
            profile: String::new(),
            versions: vec!["1.2.3".into(), "1.2.4".into()],
        };
        assert_eq!("Found different versions (1.2.3, 1.2.4).", err.to_string());

        let err = BumpError::InconsistentVersions {
            profile: "nuspec".into(),
            versions: vec!["1.0".into(), "2.0".into()],
        };
        assert_eq!(
            "Found different versions in profile 'nuspec' (1.0, 2.0).",
            err.to_string()
        );
    }
}
