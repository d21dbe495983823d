use crate::{error::VersionError, version::Version};
use core::fmt::{self, Display};

/// Number of decimal digits needed to display `number`.
fn digit_count(number: u64) -> usize {
    number.checked_ilog10().map_or(1, |log| log as usize + 1)
}

impl Version {
    /// Converts a one-based position into an index into the numbers of this version.
    fn index_of(&self, position: i64) -> Result<usize, VersionError> {
        let count = self.len();
        usize::try_from(position)
            .ok()
            .filter(|position| (1..=count).contains(position))
            .map(|position| position - 1)
            .ok_or(VersionError::PositionOutOfRange { position, count })
    }

    /// Returns a new version where the number at the one-based `position` is incremented by one.
    ///
    /// The width of the incremented number grows if the new value needs more digits, but never
    /// shrinks. If `cascade` is true, all numbers after `position` are reset to `0` without
    /// padding. Otherwise, they are kept as they are.
    ///
    /// # Example
    ///
    /// ```
    /// use versync::Version;
    ///
    /// let version = Version::parse("2.2.99.02").unwrap();
    /// assert_eq!("2.3.0.0", version.increment(2, true).unwrap().to_string());
    /// assert_eq!("2.2.100.02", version.increment(3, false).unwrap().to_string());
    /// ```
    ///
    /// # Errors
    ///
    /// - Returns a [`VersionError::PositionOutOfRange`] if `position` is not between 1 and the
    ///   number of components.
    /// - Returns a [`VersionError::Overflow`] if the number is already `u64::MAX`.
    pub fn increment(&self, position: i64, cascade: bool) -> Result<Self, VersionError> {
        let index = self.index_of(position)?;
        let mut numbers = self.numbers().to_vec();
        let mut widths = self.widths().to_vec();

        numbers[index] = numbers[index]
            .checked_add(1)
            .ok_or(VersionError::Overflow { position })?;
        widths[index] = widths[index].max(digit_count(numbers[index]));

        if cascade {
            numbers[index + 1..].fill(0);
            widths[index + 1..].fill(1);
        }

        Ok(Self::from_parts(
            numbers,
            widths,
            self.label().to_owned(),
            self.delimiter(),
        ))
    }

    /// Returns a new version where the number at the one-based `position` is replaced.
    ///
    /// `formatted_number` is the literal text of the new number, so its padding is kept: `"009"`
    /// assigns the value 9 with a width of 3.
    ///
    /// # Example
    ///
    /// ```
    /// use versync::Version;
    ///
    /// let version = Version::parse("1.1.1").unwrap();
    /// assert_eq!("009.1.1", version.assign(1, "009").unwrap().to_string());
    /// ```
    ///
    /// # Errors
    ///
    /// - Returns a [`VersionError::NotANumber`] if `formatted_number` is not an integer.
    /// - Returns a [`VersionError::PositionOutOfRange`] if `position` is not between 1 and the
    ///   number of components.
    /// - Returns a [`VersionError::NegativeNumber`] if `formatted_number` is negative.
    pub fn assign(&self, position: i64, formatted_number: &str) -> Result<Self, VersionError> {
        let number = formatted_number
            .parse::<i64>()
            .map_err(|_| VersionError::NotANumber {
                text: formatted_number.to_owned(),
            })?;
        let index = self.index_of(position)?;
        let number = u64::try_from(number).map_err(|_| VersionError::NegativeNumber { number })?;

        let mut numbers = self.numbers().to_vec();
        let mut widths = self.widths().to_vec();
        numbers[index] = number;
        widths[index] = formatted_number.len();

        Ok(Self::from_parts(
            numbers,
            widths,
            self.label().to_owned(),
            self.delimiter(),
        ))
    }

    /// Returns a new version with its label replaced. An empty label removes it.
    ///
    /// ```
    /// use versync::Version;
    ///
    /// let version = Version::parse("1.1.1-alpha").unwrap();
    /// assert_eq!("1.1.1-beta", version.with_label("-beta").to_string());
    /// assert_eq!("1.1.1", version.with_label("").to_string());
    /// ```
    pub fn with_label(&self, label: impl Into<String>) -> Self {
        Self::from_parts(
            self.numbers().to_vec(),
            self.widths().to_vec(),
            label.into(),
            self.delimiter(),
        )
    }
}

/// A version operation that can be applied to every version found in a set of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Increment the number at a one-based position. See [`Version::increment`].
    Increment {
        /// One-based position of the number to increment
        position: i64,
        /// Whether following numbers are reset to zero
        cascade: bool,
    },
    /// Replace the number at a one-based position. See [`Version::assign`].
    Assign {
        /// One-based position of the number to replace
        position: i64,
        /// Literal text of the new number, including any padding
        number: String,
    },
    /// Replace the label. See [`Version::with_label`].
    Label(String),
    /// Discard the found version and write this one instead.
    Write(Version),
}

impl Transform {
    /// Applies this operation to `version`, returning the new version.
    pub fn apply(&self, version: &Version) -> Result<Version, VersionError> {
        match self {
            Transform::Increment { position, cascade } => version.increment(*position, *cascade),
            Transform::Assign { position, number } => version.assign(*position, number),
            Transform::Label(label) => Ok(version.with_label(label.as_str())),
            Transform::Write(replacement) => Ok(replacement.clone()),
        }
    }
}

impl Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Increment {
                position,
                cascade: true,
            } => write!(f, "increment {position}"),
            Transform::Increment {
                position,
                cascade: false,
            } => write!(f, "increment-only {position}"),
            Transform::Assign { position, number } => write!(f, "assign {position} {number}"),
            Transform::Label(label) => write!(f, "label `{label}`"),
            Transform::Write(version) => write!(f, "write {version}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "2.2.2.2", "3.0.0.0", true)]
    #[case(2, "2.2.2.2", "2.3.0.0", true)]
    #[case(3, "2.2.2.2", "2.2.3.0", true)]
    #[case(4, "2.2.2.2", "2.2.2.3", true)]
    #[case(4, "2.2.2.2+bar", "2.2.2.3+bar", true)]
    #[case(1, "2.2.2.2", "3.2.2.2", false)]
    #[case(2, "2.2.2.2", "2.3.2.2", false)]
    #[case(3, "2.2.2.2", "2.2.3.2", false)]
    #[case(4, "2.2.2.2", "2.2.2.3", false)]
    #[case(4, "2.2.2.2+bar", "2.2.2.3+bar", false)]
    #[case(4, "2.2.2.002", "2.2.2.003", false)]
    #[case(4, "2.2.2.09", "2.2.2.10", false)]
    #[case(3, "2.2.99.2", "2.2.100.2", false)]
    #[case(2, "2.2.99.2", "2.3.0.0", true)]
    #[case(1, "2,2,2,2", "3,0,0,0", true)]
    #[case(1, "099", "100", true)]
    #[case(1, "1.02.003", "2.0.0", true)]
    #[case(1, "1.02.003", "2.02.003", false)]
    fn test_increment(
        #[case] position: i64,
        #[case] original: &str,
        #[case] expected: &str,
        #[case] cascade: bool,
    ) {
        let version = Version::parse(original).unwrap();
        let next = version.increment(position, cascade).unwrap();
        assert_eq!(expected, next.to_string());
    }

    #[test]
    fn test_increment_resets_widths() {
        let version = Version::parse("3.04.0005").unwrap();
        let next = version.increment(1, true).unwrap();
        assert_eq!(&[4, 0, 0], next.numbers());
        assert_eq!(&[1, 1, 1], next.widths());
        // the original is untouched
        assert_eq!("3.04.0005", version.to_string());
    }

    #[rstest]
    #[case(-1)]
    #[case(0)]
    #[case(5)]
    fn test_increment_out_of_range(#[case] position: i64) {
        let version = Version::parse("2.2.2.2").unwrap();
        assert_eq!(
            Err(VersionError::PositionOutOfRange { position, count: 4 }),
            version.increment(position, true)
        );
    }

    #[rstest]
    #[case(1, "1.1.1", "9.1.1", "9")]
    #[case(2, "1.1.1", "1.9.1", "9")]
    #[case(3, "1.1.1", "1.1.9", "9")]
    #[case(1, "1.1.1-foo", "9.1.1-foo", "9")]
    #[case(1, "1.1.1", "009.1.1", "009")]
    #[case(1, "1,1,1", "9,1,1", "9")]
    #[case(2, "1.0042.1", "1.7.1", "7")]
    fn test_assign(
        #[case] position: i64,
        #[case] original: &str,
        #[case] expected: &str,
        #[case] number: &str,
    ) {
        let version = Version::parse(original).unwrap();
        let next = version.assign(position, number).unwrap();
        assert_eq!(expected, next.to_string());
    }

    #[test]
    fn test_assign_width_is_literal_length() {
        let version = Version::parse("1.2345.6").unwrap();
        let next = version.assign(2, "009").unwrap();
        assert_eq!(9, next.numbers()[1]);
        assert_eq!(3, next.widths()[1]);
    }

    #[test]
    fn test_assign_err() {
        let version = Version::parse("2.2.2").unwrap();

        assert!(version.assign(0, "-1").unwrap_err().is_range_error());
        assert_eq!(
            Err(VersionError::PositionOutOfRange {
                position: -1,
                count: 3
            }),
            version.assign(-1, "0")
        );
        assert_eq!(
            Err(VersionError::NegativeNumber { number: -1 }),
            version.assign(1, "-1")
        );
        assert_eq!(
            Err(VersionError::NotANumber {
                text: "not a number".to_owned()
            }),
            version.assign(1, "not a number")
        );
    }

    #[rstest]
    #[case("1.1.1", "1.1.1", "")]
    #[case("1.1.1", "1.1.1-beta", "-beta")]
    #[case("1.1.1-alpha", "1.1.1-beta", "-beta")]
    #[case("1.1.1-alpha", "1.1.1", "")]
    #[case("1,1,1", "1,1,1-beta", "-beta")]
    fn test_label(#[case] original: &str, #[case] expected: &str, #[case] label: &str) {
        let version = Version::parse(original).unwrap();
        assert_eq!(expected, version.with_label(label).to_string());
    }

    #[test]
    fn test_transform_apply() {
        let version = Version::parse("1.2.3").unwrap();
        let args = [
            (
                Transform::Increment {
                    position: 2,
                    cascade: true,
                },
                "1.3.0",
            ),
            (
                Transform::Increment {
                    position: 2,
                    cascade: false,
                },
                "1.3.3",
            ),
            (
                Transform::Assign {
                    position: 3,
                    number: "10".to_owned(),
                },
                "1.2.10",
            ),
            (Transform::Label("-rc1".to_owned()), "1.2.3-rc1"),
            (
                Transform::Write(Version::parse("8.15.7").unwrap()),
                "8.15.7",
            ),
        ];

        for (transform, expected) in args {
            assert_eq!(expected, transform.apply(&version).unwrap().to_string());
        }
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(1, digit_count(0));
        assert_eq!(1, digit_count(9));
        assert_eq!(2, digit_count(10));
        assert_eq!(20, digit_count(u64::MAX));
    }
}
