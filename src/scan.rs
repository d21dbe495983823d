use crate::{
    error::{BumpError, PatternError, VersionError},
    version::Version,
};
use core::fmt::{self, Display};
use regex::Regex;
use tracing::warn;

/// Name of the capture group that holds the version.
pub const VERSION_GROUP: &str = "version";

/// Default name of the capture group that holds the marker.
pub const MARKER_GROUP: &str = "marker";

/// The result of scanning a single line for a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResult<'l> {
    /// The `version` group participated in the match and holds a valid version.
    Found {
        /// The parsed version
        version: Version,
        /// The text of the marker group, or an empty string if it did not participate
        marker: &'l str,
    },
    /// The line does not match, or the `version` group did not participate in the match.
    NotFound,
}

impl<'l> ScanResult<'l> {
    /// Returns the found version, if any.
    pub fn version(&self) -> Option<&Version> {
        match self {
            ScanResult::Found { version, .. } => Some(version),
            ScanResult::NotFound => None,
        }
    }
}

/// A compiled, user-supplied regular expression used to locate versions in lines of text.
///
/// The pattern must define a named group `version` (e.g. `(?<version>\d+\.\d+\.\d+)`) to find
/// anything. An optional group named `marker` (or a custom name, see
/// [`VersionPattern::with_marker_group`]) captures text used to describe where a version was
/// found.
///
/// # Examples
///
/// ```
/// use versync::{ScanResult, VersionPattern};
///
/// let pattern = VersionPattern::new(r"(?<marker>AssemblyVersion)\D*(?<version>\d+(\.\d+)*)").unwrap();
/// let result = pattern.scan(r#"[assembly: AssemblyVersion("1.0.0.0")]"#).unwrap();
/// if let ScanResult::Found { version, marker } = result {
///     assert_eq!("1.0.0.0", version.to_string());
///     assert_eq!("AssemblyVersion", marker);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct VersionPattern {
    regex: Regex,
    marker_group: String,
}

impl VersionPattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// - Returns a [`PatternError::Invalid`] if `pattern` is not a valid regular expression.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern).map_err(|err| PatternError::Invalid {
            pattern: pattern.to_owned(),
            reason: err.to_string(),
        })?;

        if !regex
            .capture_names()
            .any(|name| name == Some(VERSION_GROUP))
        {
            warn!(pattern, "pattern has no `{VERSION_GROUP}` group and can never find a version");
        }

        Ok(Self {
            regex,
            marker_group: MARKER_GROUP.to_owned(),
        })
    }

    /// Uses the group named `name` instead of `marker` to capture markers.
    pub fn with_marker_group(mut self, name: impl Into<String>) -> Self {
        self.marker_group = name.into();
        self
    }

    /// The pattern text.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Scans `line` for a version.
    ///
    /// Not finding a version is not an error. Finding one that cannot be parsed is: it means the
    /// pattern captures more (or less) than a version.
    ///
    /// # Errors
    ///
    /// - Returns a [`VersionError::Unparseable`] if the `version` group matched text that is not
    ///   a valid version.
    pub fn scan<'l>(&self, line: &'l str) -> Result<ScanResult<'l>, VersionError> {
        let Some(captures) = self.regex.captures(line) else {
            return Ok(ScanResult::NotFound);
        };
        let Some(version_match) = captures.name(VERSION_GROUP) else {
            return Ok(ScanResult::NotFound);
        };

        let version = Version::parse(version_match.as_str())?;
        let marker = captures
            .name(&self.marker_group)
            .map_or("", |marker| marker.as_str());

        Ok(ScanResult::Found { version, marker })
    }

    /// Checks that scanning `line` yields exactly `expected`.
    ///
    /// This is used after a version has been replaced in a line, to make sure the pattern would
    /// find the new version again.
    ///
    /// # Errors
    ///
    /// - Returns a [`BumpError::Verification`] if no version, a different version, or an
    ///   unparseable version is found.
    pub fn verify(&self, line: &str, expected: &Version) -> Result<(), BumpError> {
        match self.scan(line) {
            Ok(ScanResult::Found { version, .. }) if &version == expected => Ok(()),
            _ => Err(BumpError::Verification {
                version: expected.to_string(),
                text: line.trim().to_owned(),
                pattern: self.as_str().to_owned(),
            }),
        }
    }
}

impl Display for VersionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiles `pattern` and scans `line` with it. Prefer [`VersionPattern::scan`] when scanning
/// more than one line.
pub fn scan_line<'l>(line: &'l str, pattern: &str) -> Result<ScanResult<'l>, BumpError> {
    Ok(VersionPattern::new(pattern)?.scan(line)?)
}
