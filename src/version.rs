use crate::error::VersionError;
use core::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
    str::FromStr,
};

/// The character that separates the numbers of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `.`, as in `1.2.3`
    Dot,
    /// `,`, as in `1,2,3,4`. Found in resource files.
    Comma,
}

impl Delimiter {
    /// Returns the delimiter as a character.
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Dot => '.',
            Delimiter::Comma => ',',
        }
    }

    fn is_delimiter_byte(byte: u8) -> bool {
        byte == b'.' || byte == b','
    }
}

/// A version found in a text file, such as `1.2.3`, `1.2.3-beta+build.7`, `01.01.2018` or
/// `1,0,0,0`.
///
/// A version is a non-empty sequence of numbers, each with a display width that remembers its
/// zero-padding, followed by an optional free-form label. Versions are immutable: every operation
/// (see [`Version::increment`], [`Version::assign`] and [`Version::with_label`]) returns a new
/// one.
///
/// Two versions are equal if and only if their formatted text is equal. Numerically equal
/// versions with different padding are therefore different versions.
///
/// # Examples
///
/// ```
/// use versync::Version;
///
/// let version: Version = "1.2.3-beta".parse().unwrap();
/// assert_eq!(&[1, 2, 3], version.numbers());
/// assert_eq!("-beta", version.label());
/// assert_eq!("1.2.3-beta", version.to_string());
///
/// let padded = Version::parse("01.2.3").unwrap();
/// assert_ne!(Version::parse("1.2.3").unwrap(), padded);
/// ```
#[derive(Debug, Clone)]
pub struct Version {
    numbers: Vec<u64>,
    widths: Vec<usize>,
    label: String,
    delimiter: Delimiter,
}

impl Version {
    /// Creates a version from its parts.
    ///
    /// Returns `None` if `numbers` is empty, if `numbers` and `widths` differ in length, or if
    /// any width is zero.
    pub fn new(
        numbers: Vec<u64>,
        widths: Vec<usize>,
        label: impl Into<String>,
        delimiter: Delimiter,
    ) -> Option<Self> {
        if numbers.is_empty() || numbers.len() != widths.len() || widths.contains(&0) {
            return None;
        }
        Some(Self {
            numbers,
            widths,
            label: label.into(),
            delimiter,
        })
    }

    /// Builds a version from parts whose invariants the caller has already checked.
    pub(crate) fn from_parts(
        numbers: Vec<u64>,
        widths: Vec<usize>,
        label: String,
        delimiter: Delimiter,
    ) -> Self {
        debug_assert!(!numbers.is_empty() && numbers.len() == widths.len());
        Self {
            numbers,
            widths,
            label,
            delimiter,
        }
    }

    /// Parses a version from text.
    ///
    /// The text must consist of one or more groups of digits separated by `.` or `,`, directly
    /// followed by a (possibly empty) label made of ASCII letters, digits, `_`, `-`, `+` and `.`.
    ///
    /// If the numbers contain a `,` but no `.`, the delimiter is `,`. Otherwise, it is `.`.
    ///
    /// # Errors
    ///
    /// - Returns a [`VersionError::Unparseable`] if the text does not match the grammar, or a
    ///   number does not fit into a `u64`.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let unparseable = || VersionError::Unparseable {
            text: text.to_owned(),
        };

        let bytes = text.as_bytes();
        let numbers_end = numbers_len(bytes);
        if numbers_end == 0 {
            return Err(unparseable());
        }

        let (numbers_text, label) = text.split_at(numbers_end);
        if !label.bytes().all(is_label_byte) {
            return Err(unparseable());
        }

        // resource files write versions as `1,0,0,0`. this is the only case we treat commas as
        // the delimiter.
        let delimiter = if numbers_text.contains(',') && !numbers_text.contains('.') {
            Delimiter::Comma
        } else {
            Delimiter::Dot
        };

        let mut numbers = Vec::new();
        let mut widths = Vec::new();
        for group in numbers_text.split(delimiter.as_char()) {
            // a group like `1,0` when the delimiter is `.` fails here
            let number = group.parse::<u64>().map_err(|_| unparseable())?;
            numbers.push(number);
            widths.push(group.len());
        }

        Ok(Self::from_parts(numbers, widths, label.to_owned(), delimiter))
    }

    /// The numbers of this version, most significant first.
    pub fn numbers(&self) -> &[u64] {
        &self.numbers
    }

    /// The minimum display width of each number. Numbers narrower than their width are padded
    /// with leading zeros.
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// The free-form suffix of this version, e.g. `-beta`. May be empty.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The delimiter used to join the numbers.
    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// The number of components (numbers) in this version.
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    /// Always false: a version has at least one component.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Returns the length of the leading `digits ((. | ,) digits)*` run of `bytes`.
fn numbers_len(bytes: &[u8]) -> usize {
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = digits_from(0);
    if end == 0 {
        return 0;
    }

    // a delimiter only belongs to the numbers if more digits follow it. otherwise, it is part of
    // the label (`.`) or unparseable (`,`).
    while end < bytes.len() && Delimiter::is_delimiter_byte(bytes[end]) {
        let digits = digits_from(end + 1);
        if digits == 0 {
            break;
        }
        end += 1 + digits;
    }
    end
}

fn is_label_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'+' | b'.')
}

impl FromStr for Version {
    type Err = VersionError;

    /// Same as [`Version::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Version {
    /// Formats the numbers zero-padded to their widths, joined by the delimiter, followed by the
    /// label. This is the exact inverse of [`Version::parse`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (number, width)) in self.numbers.iter().zip(&self.widths).enumerate() {
            if idx > 0 {
                write!(f, "{}", self.delimiter.as_char())?;
            }
            write!(f, "{:0width$}", number, width = width)?;
        }
        f.write_str(&self.label)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}
