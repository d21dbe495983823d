use crate::{
    encoding::TextEncoding,
    error::BumpError,
    glob::Glob,
    scan::{VersionPattern, MARKER_GROUP},
};

/// The profile of entries that do not name one.
pub const DEFAULT_PROFILE: &str = "";

/// Describes a set of files and how versions are found in them.
///
/// ```
/// use versync::{ConfigEntry, TextEncoding};
///
/// let entry = ConfigEntry::new("**/*.rc")
///     .with_regex(r"FILEVERSION (?<version>\d+(,\d+)*)")
///     .with_encoding(TextEncoding::utf16le())
///     .with_profile("native");
/// assert_eq!("native", entry.profile);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    /// Selects the files of this entry, see [`Glob`].
    pub glob: String,
    /// Groups entries for reporting and for consistency checks. Empty for the default profile.
    pub profile: String,
    /// The encoding used to read and write the selected files.
    pub encoding: TextEncoding,
    /// The regular expression that locates versions. If empty, a template is used, see
    /// [`ConfigEntry::resolve`].
    pub regex: String,
    /// The name of the capture group holding the marker.
    pub marker_group: String,
}

impl ConfigEntry {
    /// Creates an entry for `glob` in the default profile, with UTF-8 encoding and no regex.
    pub fn new(glob: impl Into<String>) -> Self {
        Self {
            glob: glob.into(),
            profile: DEFAULT_PROFILE.to_owned(),
            encoding: TextEncoding::default(),
            regex: String::new(),
            marker_group: MARKER_GROUP.to_owned(),
        }
    }

    /// Sets the regex.
    pub fn with_regex(mut self, regex: impl Into<String>) -> Self {
        self.regex = regex.into();
        self
    }

    /// Sets the profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Sets the encoding.
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the name of the marker group.
    pub fn with_marker_group(mut self, marker_group: impl Into<String>) -> Self {
        self.marker_group = marker_group.into();
        self
    }

    /// Validates this entry and fills in defaults.
    ///
    /// An entry without a regex takes its regex and encoding from the built-in template for its
    /// glob's file type:
    ///
    /// | Glob suffix       | Finds                                              | Encoding |
    /// |-------------------|----------------------------------------------------|----------|
    /// | `.csproj`         | `<Version>1.2.3</Version>`                         | UTF-8    |
    /// | `.nuspec`         | `<version>1.2.3</version>`                         | UTF-8    |
    /// | `AssemblyInfo.cs` | `[assembly: AssemblyVersion("1.2.3.4")]`           | UTF-8    |
    /// | `.rc`             | `FILEVERSION 1,2,3,4`, `"ProductVersion", "1.2.3.4"` | UTF-16LE |
    ///
    /// # Errors
    ///
    /// - Returns a [`BumpError::Config`] if the glob is empty, or no regex is given and there is
    ///   no template for the glob.
    pub fn resolve(self) -> Result<Self, BumpError> {
        if self.glob.trim().is_empty() {
            return Err(BumpError::Config {
                reason: "Glob cannot be empty".to_owned(),
            });
        }

        if !self.regex.trim().is_empty() {
            return Ok(self);
        }

        let template = Template::find(&self.glob).ok_or_else(|| BumpError::Config {
            reason: format!("Could not find a template for glob `{}`", self.glob),
        })?;

        Ok(Self {
            regex: template.regex.to_owned(),
            encoding: template.encoding(),
            marker_group: MARKER_GROUP.to_owned(),
            ..self
        })
    }

    /// Compiles the glob of this entry.
    pub fn compile_glob(&self) -> Result<Glob, BumpError> {
        Ok(Glob::new(&self.glob)?)
    }

    /// Compiles the regex of this entry.
    pub fn compile_pattern(&self) -> Result<VersionPattern, BumpError> {
        Ok(VersionPattern::new(&self.regex)?.with_marker_group(self.marker_group.as_str()))
    }
}

/// Default settings for well-known file types.
struct Template {
    suffix: &'static str,
    regex: &'static str,
    encoding: fn() -> TextEncoding,
}

// checked in order, so more specific suffixes come first
static TEMPLATES: [Template; 4] = [
    Template {
        suffix: ".csproj",
        regex: r"<(?<marker>[Vv]ersion)>(?<version>\d+\.\d+\.\d+.*)</[Vv]ersion>",
        encoding: TextEncoding::utf8,
    },
    Template {
        suffix: ".nuspec",
        regex: r"<(?<marker>[Vv]ersion)>(?<version>\d+\.\d+\.\d+.*)</[Vv]ersion>",
        encoding: TextEncoding::utf8,
    },
    Template {
        suffix: "AssemblyInfo.cs",
        regex: r"(?<marker>Assembly(File)?Version)\D*(?<version>\d+\.\d+\.\d+\.\d+)",
        encoding: TextEncoding::utf8,
    },
    Template {
        suffix: ".rc",
        regex: r#"(?<marker>FILEVERSION|PRODUCTVERSION|FileVersion|ProductVersion)[", ]*(?<version>\d+[.,]\d+[.,]\d+[.,]\d+)"#,
        encoding: TextEncoding::utf16le,
    },
];

impl Template {
    fn find(glob: &str) -> Option<&'static Template> {
        let glob = glob.trim().to_lowercase();
        TEMPLATES
            .iter()
            .find(|template| glob.ends_with(&template.suffix.to_lowercase()))
    }

    fn encoding(&self) -> TextEncoding {
        (self.encoding)()
    }
}

/// Supplies the configuration entries for an operation, in processing order.
pub trait ConfigSource {
    /// Returns the entries. They are resolved (see [`ConfigEntry::resolve`]) before use.
    fn entries(&self) -> Result<Vec<ConfigEntry>, BumpError>;
}

impl ConfigSource for [ConfigEntry] {
    fn entries(&self) -> Result<Vec<ConfigEntry>, BumpError> {
        Ok(self.to_vec())
    }
}

impl ConfigSource for Vec<ConfigEntry> {
    fn entries(&self) -> Result<Vec<ConfigEntry>, BumpError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::ScanResult;
    use rstest::rstest;

    #[test]
    fn test_keeps_explicit_regex() {
        let entry = ConfigEntry::new("*.txt")
            .with_regex(r"(?<version>\d+)")
            .with_encoding(TextEncoding::utf16be());
        assert_eq!(entry.clone(), entry.resolve().unwrap());
    }

    #[test]
    fn test_empty_glob() {
        let entry = ConfigEntry::new("  ").with_regex(r"(?<version>\d+)");
        assert!(matches!(entry.resolve(), Err(BumpError::Config { .. })));
    }

    #[test]
    fn test_no_template() {
        let entry = ConfigEntry::new("*.txt");
        assert!(matches!(entry.resolve(), Err(BumpError::Config { .. })));
    }

    #[rstest]
    #[case("**/*.csproj", "  <Version>1.2.3-beta</Version>", "1.2.3-beta", "Version")]
    #[case("*.NUSPEC", "<version>4.5.6</version>", "4.5.6", "version")]
    #[case(
        "**/AssemblyInfo.cs",
        r#"[assembly: AssemblyFileVersion("10.2.3.4")]"#,
        "10.2.3.4",
        "AssemblyFileVersion"
    )]
    #[case("res/*.rc", " FILEVERSION 1,0,0,12", "1,0,0,12", "FILEVERSION")]
    #[case("*.rc", r#"   VALUE "ProductVersion", "1.0.0.12""#, "1.0.0.12", "ProductVersion")]
    fn test_templates(
        #[case] glob: &str,
        #[case] line: &str,
        #[case] expected_version: &str,
        #[case] expected_marker: &str,
    ) {
        let entry = ConfigEntry::new(glob).resolve().unwrap();
        let pattern = entry.compile_pattern().unwrap();
        match pattern.scan(line).unwrap() {
            ScanResult::Found { version, marker } => {
                assert_eq!(expected_version, version.to_string());
                assert_eq!(expected_marker, marker);
            }
            ScanResult::NotFound => panic!("no version found in `{line}`"),
        }
    }

    #[test]
    fn test_template_encoding() {
        let rc = ConfigEntry::new("*.rc").resolve().unwrap();
        assert_eq!(TextEncoding::utf16le(), rc.encoding);
        let csproj = ConfigEntry::new("*.csproj")
            .with_encoding(TextEncoding::utf16be())
            .resolve()
            .unwrap();
        assert_eq!(TextEncoding::utf8(), csproj.encoding);
    }
}
