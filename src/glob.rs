use crate::error::PatternError;
use regex::Regex;

/// A file selector such as `**/AssemblyInfo.cs` or `src/*.rc`.
///
/// - `*` matches any run of characters (including separators), `?` matches one character.
/// - `/**/` matches zero or more directories.
/// - `/` and `\` both match either path separator.
/// - The glob is anchored at the end of the path only, so `AssemblyInfo.cs` matches that file
///   in any directory.
///
/// Globs are matched against paths relative to the working directory and prefixed with `./`,
/// e.g. `./src/version.h`.
///
/// ```
/// use versync::Glob;
///
/// let glob = Glob::new("**/Bumpy/**/AssemblyInfo.cs").unwrap();
/// assert!(glob.is_match("./Source/Bumpy/Properties/AssemblyInfo.cs"));
/// assert!(!glob.is_match("./Source/Bumpy.Test/Properties/AssemblyInfo.cs"));
/// ```
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: String,
    regex: Regex,
}

impl Glob {
    /// Translates `pattern` into a matcher.
    ///
    /// # Errors
    ///
    /// - Returns a [`PatternError::Invalid`] if the translated pattern cannot be compiled.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let unified = pattern.replace('\\', "/");
        // order matters: `**/` must be translated before separators are
        let translated = regex::escape(&unified)
            .replace(r"\*", ".*")
            .replace(r"\?", ".")
            .replace("/.*.*/", "/(.*.*/)?")
            .replace('/', r"[\\/]");

        let regex = Regex::new(&format!("{translated}$")).map_err(|err| PatternError::Invalid {
            pattern: pattern.to_owned(),
            reason: err.to_string(),
        })?;

        Ok(Self {
            pattern: pattern.to_owned(),
            regex,
        })
    }

    /// Returns true if `path` is selected by this glob.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// The glob as it was written.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("./Source/Bumpy/Properties/AssemblyInfo.cs", true)]
    #[case("./Bumpy/Properties/AssemblyInfo.cs", true)]
    #[case("./Bumpy/AssemblyInfo.cs", true)]
    #[case("./Source/Bumpy.Test/Properties/AssemblyInfo.cs", false)]
    #[case("./Bumpy.Test/Properties/AssemblyInfo.cs", false)]
    fn test_nested_wildcards(#[case] path: &str, #[case] expected: bool) {
        let glob = Glob::new("**/Bumpy/**/AssemblyInfo.cs").unwrap();
        assert_eq!(expected, glob.is_match(path));
    }

    #[rstest]
    #[case("./AssemblyInfo.cs", true)]
    #[case("./Source/Bumpy/Properties/AssemblyInfo.cs", true)]
    #[case("./FooAssemblyInfo.cs", false)]
    #[case("./AssemblyInfo.cs.backup", false)]
    fn test_any_directory(#[case] path: &str, #[case] expected: bool) {
        let glob = Glob::new("**/AssemblyInfo.cs").unwrap();
        assert_eq!(expected, glob.is_match(path));
    }

    #[test]
    fn test_precise() {
        let glob = Glob::new("AssemblyInfo.cs").unwrap();
        assert!(glob.is_match("AssemblyInfo.cs"));
        assert!(glob.is_match("./Source/Bumpy/Properties/AssemblyInfo.cs"));
        assert!(glob.is_match("./FooAssemblyInfo.cs"));
        assert!(!glob.is_match("./AssemblyInfo.cs.backup"));
        // `.` is literal
        assert!(!glob.is_match("./AssemblyInfoXcs"));
    }

    #[rstest]
    #[case("Properties/AssemblyInfo.cs")]
    #[case(r"Properties\AssemblyInfo.cs")]
    fn test_separators(#[case] pattern: &str) {
        let glob = Glob::new(pattern).unwrap();
        assert!(glob.is_match("./Properties/AssemblyInfo.cs"));
        assert!(glob.is_match(r".\Properties\AssemblyInfo.cs"));
    }

    #[test]
    fn test_single_char_and_extension() {
        let glob = Glob::new("*.?sproj").unwrap();
        assert!(glob.is_match("./src/app.csproj"));
        assert!(glob.is_match("./app.fsproj"));
        assert!(!glob.is_match("./app.vcxproj"));
    }
}
