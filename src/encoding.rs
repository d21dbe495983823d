use crate::error::BumpError;
use core::fmt::{self, Display};
use encoding_rs::{Encoding, REPLACEMENT, UTF_16BE, UTF_16LE, UTF_8};

/// The character encoding of a file.
///
/// Encodings are looked up by [WHATWG label](https://encoding.spec.whatwg.org/#names-and-labels)
/// (e.g. `utf-8`, `utf-16le`, `windows-1252`) or by Windows code page number (e.g. `65001`,
/// `1200`).
///
/// ```
/// use versync::TextEncoding;
///
/// assert_eq!(TextEncoding::utf16le(), "1200".parse().unwrap());
/// assert_eq!("UTF-8", TextEncoding::from_label("utf8").unwrap().name());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    /// UTF-8, the default encoding.
    pub fn utf8() -> Self {
        Self(UTF_8)
    }

    /// UTF-16, little endian. Code page 1200.
    pub fn utf16le() -> Self {
        Self(UTF_16LE)
    }

    /// UTF-16, big endian. Code page 1201.
    pub fn utf16be() -> Self {
        Self(UTF_16BE)
    }

    /// Looks up an encoding by label or code page number.
    ///
    /// # Errors
    ///
    /// - Returns a [`BumpError::UnknownEncoding`] if the label is not known.
    pub fn from_label(label: &str) -> Result<Self, BumpError> {
        let trimmed = label.trim();
        let encoding = match trimmed.parse::<u16>() {
            Ok(code_page) => code_page_label(code_page)
                .and_then(|label| Encoding::for_label(label.as_bytes())),
            Err(_) => Encoding::for_label(trimmed.as_bytes()),
        };

        match encoding {
            // labels of encodings that are unsafe to decode map to the replacement encoding
            Some(encoding) if encoding != REPLACEMENT => Ok(Self(encoding)),
            _ => Err(BumpError::UnknownEncoding {
                label: label.to_owned(),
            }),
        }
    }

    /// The canonical name of this encoding, e.g. `UTF-8`.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    fn bom(&self) -> &'static [u8] {
        if self.0 == UTF_8 {
            b"\xEF\xBB\xBF"
        } else if self.0 == UTF_16LE {
            b"\xFF\xFE"
        } else if self.0 == UTF_16BE {
            b"\xFE\xFF"
        } else {
            b""
        }
    }

    /// Decodes `bytes` into text, returning the text and whether it started with a byte order
    /// mark (which is not part of the text).
    ///
    /// Returns `None` if `bytes` are malformed for this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<(String, bool)> {
        let bom = self.bom();
        let (bytes, has_bom) = match bytes.strip_prefix(bom) {
            Some(rest) if !bom.is_empty() => (rest, true),
            _ => (bytes, false),
        };

        self.0
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| (text.into_owned(), has_bom))
    }

    /// Encodes `text`, prefixed with a byte order mark if `bom` is true and this encoding has
    /// one.
    ///
    /// Returns `None` if `text` contains characters this encoding cannot represent.
    pub fn encode(&self, text: &str, bom: bool) -> Option<Vec<u8>> {
        let mut bytes = Vec::with_capacity(text.len() + 3);
        if bom {
            bytes.extend_from_slice(self.bom());
        }

        // encoding_rs only decodes UTF-16: its encoder would emit UTF-8.
        if self.0 == UTF_16LE {
            bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
        } else if self.0 == UTF_16BE {
            bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
        } else {
            let (encoded, _, had_unmappable) = self.0.encode(text);
            if had_unmappable {
                return None;
            }
            bytes.extend_from_slice(&encoded);
        }

        Some(bytes)
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}

impl core::str::FromStr for TextEncoding {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

impl Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps common Windows code pages to WHATWG labels.
fn code_page_label(code_page: u16) -> Option<String> {
    let label = match code_page {
        65001 => "utf-8".to_owned(),
        1200 => "utf-16le".to_owned(),
        1201 => "utf-16be".to_owned(),
        874 | 1250..=1258 => format!("windows-{code_page}"),
        28591..=28599 => format!("iso-8859-{}", code_page - 28590),
        932 => "shift_jis".to_owned(),
        936 => "gbk".to_owned(),
        949 => "euc-kr".to_owned(),
        950 => "big5".to_owned(),
        20866 => "koi8-r".to_owned(),
        _ => return None,
    };
    Some(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("utf-8", "UTF-8")]
    #[case(" UTF8 ", "UTF-8")]
    #[case("65001", "UTF-8")]
    #[case("1200", "UTF-16LE")]
    #[case("utf-16", "UTF-16LE")]
    #[case("1201", "UTF-16BE")]
    #[case("1252", "windows-1252")]
    #[case("28592", "ISO-8859-2")]
    #[case("latin1", "windows-1252")]
    fn test_from_label(#[case] label: &str, #[case] name: &str) {
        assert_eq!(name, TextEncoding::from_label(label).unwrap().name());
    }

    #[rstest]
    #[case("klingon")]
    #[case("12345")]
    #[case("iso-2022-kr")]
    fn test_unknown_label(#[case] label: &str) {
        assert!(matches!(
            TextEncoding::from_label(label),
            Err(BumpError::UnknownEncoding { .. })
        ));
    }

    #[test]
    fn test_utf8_bom() {
        let utf8 = TextEncoding::utf8();
        assert_eq!(
            Some(("1.0".to_owned(), true)),
            utf8.decode(b"\xEF\xBB\xBF1.0")
        );
        assert_eq!(Some(("1.0".to_owned(), false)), utf8.decode(b"1.0"));
        assert_eq!(Some(b"\xEF\xBB\xBF1.0".to_vec()), utf8.encode("1.0", true));
        assert_eq!(None, utf8.decode(b"\xFF1.0"));
    }

    #[test]
    fn test_utf16() {
        let le = TextEncoding::utf16le();
        let bytes = le.encode("1,0", true).unwrap();
        assert_eq!(b"\xFF\xFE1\x00,\x000\x00".to_vec(), bytes);
        assert_eq!(Some(("1,0".to_owned(), true)), le.decode(&bytes));

        let be = TextEncoding::utf16be();
        let bytes = be.encode("1", false).unwrap();
        assert_eq!(b"\x001".to_vec(), bytes);
        assert_eq!(Some(("1".to_owned(), false)), be.decode(&bytes));
    }

    #[test]
    fn test_unmappable() {
        let latin = TextEncoding::from_label("windows-1252").unwrap();
        assert_eq!(Some(b"caf\xE9".to_vec()), latin.encode("café", false));
        assert_eq!(None, latin.encode("日本", false));
    }
}
