use crate::{encoding::TextEncoding, error::BumpError, glob::Glob};
use std::{
    fs,
    io,
    path::{Component, Path, PathBuf},
};
use tracing::debug;
use walkdir::WalkDir;

/// The terminator of a line, kept so files are written back byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
    /// The last line of a file that does not end with a newline.
    None,
}

impl LineEnding {
    /// The terminator text.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::None => "",
        }
    }
}

/// The decoded content of a text file, split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    path: PathBuf,
    lines: Vec<String>,
    endings: Vec<LineEnding>,
    encoding: TextEncoding,
    bom: bool,
}

impl FileContent {
    /// Splits `text` into lines. Line terminators are not part of the lines, but are remembered.
    pub fn from_text(
        path: impl Into<PathBuf>,
        text: &str,
        encoding: TextEncoding,
        bom: bool,
    ) -> Self {
        let (lines, endings) = text
            .split_inclusive('\n')
            .map(|line| {
                if let Some(line) = line.strip_suffix("\r\n") {
                    (line.to_owned(), LineEnding::CrLf)
                } else if let Some(line) = line.strip_suffix('\n') {
                    (line.to_owned(), LineEnding::Lf)
                } else {
                    (line.to_owned(), LineEnding::None)
                }
            })
            .unzip();

        Self {
            path: path.into(),
            lines,
            endings,
            encoding,
            bom,
        }
    }

    /// The file this content belongs to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The lines of the file, without terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The encoding the file was read with.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Whether the file started with a byte order mark.
    pub fn has_bom(&self) -> bool {
        self.bom
    }

    /// Returns the same file with its lines replaced. Line terminators are kept per line; lines
    /// beyond the original ones end with `\n`.
    pub fn with_lines(&self, lines: Vec<String>) -> Self {
        let mut endings = self.endings.clone();
        if let Some(last) = endings.last_mut().filter(|_| lines.len() > self.lines.len()) {
            *last = LineEnding::Lf;
        }
        endings.resize(lines.len(), LineEnding::Lf);

        Self {
            path: self.path.clone(),
            lines,
            endings,
            encoding: self.encoding,
            bom: self.bom,
        }
    }

    /// Joins the lines and their terminators back into the full text.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .zip(&self.endings)
            .flat_map(|(line, ending)| [line.as_str(), ending.as_str()])
            .collect()
    }

    /// Decodes `bytes` read from `path`.
    ///
    /// # Errors
    ///
    /// - Returns a [`BumpError::Encoding`] if `bytes` are malformed for `encoding`.
    pub fn decode(
        path: impl Into<PathBuf>,
        bytes: &[u8],
        encoding: TextEncoding,
    ) -> Result<Self, BumpError> {
        let path = path.into();
        match encoding.decode(bytes) {
            Some((text, bom)) => Ok(Self::from_text(path, &text, encoding, bom)),
            None => Err(BumpError::Encoding {
                path,
                encoding: encoding.name(),
            }),
        }
    }

    /// Encodes the full text with the encoding (and byte order mark) the file was read with.
    ///
    /// # Errors
    ///
    /// - Returns a [`BumpError::Encoding`] if the text cannot be represented in the encoding.
    pub fn encode(&self) -> Result<Vec<u8>, BumpError> {
        self.encoding
            .encode(&self.text(), self.bom)
            .ok_or_else(|| BumpError::Encoding {
                path: self.path.clone(),
                encoding: self.encoding.name(),
            })
    }
}

/// Access to the files that versions are read from and written to.
pub trait FileStore {
    /// Returns the files below `root` selected by `glob`, in a stable order.
    fn list_files(&self, root: &Path, glob: &Glob) -> Result<Vec<PathBuf>, BumpError>;

    /// Reads and decodes a whole file.
    fn read(&self, path: &Path, encoding: TextEncoding) -> Result<FileContent, BumpError>;

    /// Replaces a whole file with `content`, encoded the way it was read.
    fn write(&mut self, content: &FileContent) -> Result<(), BumpError>;
}

/// A [`FileStore`] backed by the file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStore;

impl FileStore for FsStore {
    fn list_files(&self, root: &Path, glob: &Glob) -> Result<Vec<PathBuf>, BumpError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|err| BumpError::Io {
                path: err.path().unwrap_or(root).to_path_buf(),
                source: io::Error::from(err),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if glob.is_match(&format!("./{}", relative_display(root, entry.path()))) {
                files.push(entry.into_path());
            }
        }
        files.sort();

        debug!(glob = glob.as_str(), count = files.len(), "selected files");
        Ok(files)
    }

    fn read(&self, path: &Path, encoding: TextEncoding) -> Result<FileContent, BumpError> {
        let bytes = fs::read(path).map_err(|source| BumpError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        FileContent::decode(path, &bytes, encoding)
    }

    fn write(&mut self, content: &FileContent) -> Result<(), BumpError> {
        let bytes = content.encode()?;
        debug!(path = %content.path().display(), bytes = bytes.len(), "writing file");
        fs::write(content.path(), bytes).map_err(|source| BumpError::Io {
            path: content.path().to_path_buf(),
            source,
        })
    }
}

/// Returns `path` relative to `root`, joined with `/` regardless of platform.
pub fn relative_display(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::CurDir => None,
            other => Some(other.as_os_str().to_string_lossy()),
        })
        .collect();
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("one")]
    #[case("one\ntwo\n")]
    #[case("one\r\ntwo\nthree")]
    #[case("\n\n")]
    #[case("mixed\r\n\r\nend\r\n")]
    fn test_text_round_trip(#[case] text: &str) {
        let content = FileContent::from_text("f", text, TextEncoding::utf8(), false);
        assert_eq!(text, content.text());
    }

    #[test]
    fn test_lines_have_no_terminators() {
        let content = FileContent::from_text("f", "a\r\nb\nc", TextEncoding::utf8(), false);
        assert_eq!(["a", "b", "c"], content.lines());
    }

    #[test]
    fn test_with_lines_keeps_endings() {
        let content = FileContent::from_text("f", "1.0\r\nx\n1.0", TextEncoding::utf8(), true);
        let replaced = content.with_lines(vec!["2.0".into(), "x".into(), "2.0".into()]);
        assert_eq!("2.0\r\nx\n2.0", replaced.text());
        assert!(replaced.has_bom());

        let grown = content.with_lines(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        assert_eq!("a\r\nb\nc\nd\n", grown.text());
    }

    #[test]
    fn test_decode_encode() {
        let bytes = b"\xFF\xFEv\x001\x00\r\x00\n\x00";
        let content = FileContent::decode("f.rc", bytes, TextEncoding::utf16le()).unwrap();
        assert_eq!(["v1"], content.lines());
        assert!(content.has_bom());
        assert_eq!(bytes.to_vec(), content.encode().unwrap());
    }

    #[test]
    fn test_decode_malformed() {
        let err = FileContent::decode("f", b"\xC3\x28", TextEncoding::utf8()).unwrap_err();
        assert!(matches!(err, BumpError::Encoding { encoding: "UTF-8", .. }));
    }

    #[test]
    fn test_relative_display() {
        let root = Path::new("/work");
        assert_eq!(
            "src/a.txt",
            relative_display(root, Path::new("/work/src/a.txt"))
        );
        assert_eq!("a.txt", relative_display(Path::new("."), Path::new("./a.txt")));
    }
}
