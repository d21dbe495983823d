use crate::{
    config::{ConfigEntry, ConfigSource, DEFAULT_PROFILE},
    error::{BumpError, VersionError},
    glob::Glob,
    ops::Transform,
    scan::{ScanResult, VersionPattern},
    store::{relative_display, FileContent, FileStore},
    version::Version,
};
use itertools::Itertools;
use std::path::PathBuf;
use tracing::{debug, info};

/// Emitted before anything else when changes are not persisted.
pub const NO_OP_BANNER: &str = "(NO-OP MODE: Will not persist changes to disk)";

/// Receives the report of an operation, one line per event, in processing order.
pub trait Reporter {
    /// Reports one line.
    fn emit(&mut self, line: &str);
}

impl<F: FnMut(&str)> Reporter for F {
    fn emit(&mut self, line: &str) {
        self(line)
    }
}

/// Settings shared by all operations of an [`Engine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// The directory that globs are evaluated in, and that reported paths are relative to.
    pub working_dir: PathBuf,
    /// If true, changes are reported but never written.
    pub no_op: bool,
    /// If set, only entries of this profile are processed.
    pub profile: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            no_op: false,
            profile: None,
        }
    }
}

/// The result of transforming the versions of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutcome {
    /// The lines as they were read.
    pub original_lines: Vec<String>,
    /// The lines with versions replaced. Same length as `original_lines`.
    pub new_lines: Vec<String>,
    /// Whether any line contained a version.
    pub version_found: bool,
    /// Whether any line changed.
    pub dirty: bool,
}

/// A resolved configuration entry with its glob and pattern compiled.
struct Prepared {
    entry: ConfigEntry,
    glob: Glob,
    pattern: VersionPattern,
}

/// Finds versions in the files described by configuration entries, and rewrites them.
///
/// Every operation processes entries in configuration order, files in the order the
/// [`FileStore`] lists them, and lines top to bottom. Reports are emitted to the [`Reporter`] in
/// exactly that order.
///
/// A file is only written if a version was found in it and at least one version changed. It is
/// written as a whole, after all of its lines were transformed and verified. Errors abort the
/// operation; files written before the error stay written.
///
/// # Example
///
/// ```no_run
/// use versync::{ConfigEntry, Engine, FsStore, Options, Transform};
///
/// let entries = vec![ConfigEntry::new("**/*.csproj")];
/// let mut engine = Engine::new(FsStore, |line: &str| println!("{line}"), Options::default());
/// engine
///     .apply_transform(&entries, &Transform::Increment { position: 2, cascade: true })
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct Engine<S, R> {
    store: S,
    reporter: R,
    options: Options,
}

impl<S: FileStore, R: Reporter> Engine<S, R> {
    /// Creates an engine.
    pub fn new(store: S, reporter: R, options: Options) -> Self {
        Self {
            store,
            reporter,
            options,
        }
    }

    /// The options of this engine.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Consumes the engine, returning its store and reporter.
    pub fn into_parts(self) -> (S, R) {
        (self.store, self.reporter)
    }

    fn prepare<C: ConfigSource + ?Sized>(&self, source: &C) -> Result<Vec<Prepared>, BumpError> {
        let mut prepared = Vec::new();

        for entry in source.entries()? {
            let entry = entry.resolve()?;
            if let Some(profile) = &self.options.profile {
                if &entry.profile != profile {
                    continue;
                }
            }
            prepared.push(Prepared {
                glob: entry.compile_glob()?,
                pattern: entry.compile_pattern()?,
                entry,
            });
        }

        if let Some(profile) = &self.options.profile {
            if prepared.is_empty() {
                return Err(BumpError::ProfileNotFound {
                    profile: profile.clone(),
                });
            }
        }

        Ok(prepared)
    }

    fn enter_profile(&mut self, current: &mut String, profile: &str) {
        if current != profile {
            *current = profile.to_owned();
            self.reporter.emit(&format!("[{profile}]"));
        }
    }

    fn files(&self, prepared: &Prepared) -> Result<Vec<PathBuf>, BumpError> {
        info!(
            glob = prepared.glob.as_str(),
            profile = prepared.entry.profile.as_str(),
            encoding = prepared.entry.encoding.name(),
            "processing entry"
        );
        self.store
            .list_files(&self.options.working_dir, &prepared.glob)
    }

    fn read(&self, path: &std::path::Path, prepared: &Prepared) -> Result<FileContent, BumpError> {
        debug!(path = %path.display(), "reading file");
        self.store.read(path, prepared.entry.encoding)
    }

    /// Reports every version found, as `<path> (<marker>): <version>`.
    pub fn list<C: ConfigSource + ?Sized>(&mut self, source: &C) -> Result<(), BumpError> {
        let entries = self.prepare(source)?;
        let mut current_profile = DEFAULT_PROFILE.to_owned();

        for prepared in &entries {
            self.enter_profile(&mut current_profile, &prepared.entry.profile);

            for path in self.files(prepared)? {
                let content = self.read(&path, prepared)?;
                let display = relative_display(&self.options.working_dir, &path);
                let mut version_found = false;

                for (idx, line) in content.lines().iter().enumerate() {
                    if let ScanResult::Found { version, marker } = prepared.pattern.scan(line)? {
                        version_found = true;
                        let marker = marker_or_line_number(marker, idx + 1);
                        self.reporter
                            .emit(&format!("{display} ({marker}): {version}"));
                    }
                }

                if !version_found {
                    self.reporter.emit(&format!("{display}: no version found"));
                }
            }
        }

        Ok(())
    }

    /// Replaces every version found with `transform(version)`, reporting each as
    /// `<path> (<marker>): <old> -> <new>`.
    ///
    /// After a version is replaced in a line, the line is scanned again and must yield the new
    /// version. Otherwise, the operation fails with a [`BumpError::Verification`] and the file is
    /// not written.
    pub fn apply<C, F>(&mut self, source: &C, mut transform: F) -> Result<(), BumpError>
    where
        C: ConfigSource + ?Sized,
        F: FnMut(&Version) -> Result<Version, VersionError>,
    {
        let entries = self.prepare(source)?;
        let mut current_profile = DEFAULT_PROFILE.to_owned();

        if self.options.no_op {
            self.reporter.emit(NO_OP_BANNER);
        }

        for prepared in &entries {
            self.enter_profile(&mut current_profile, &prepared.entry.profile);

            for path in self.files(prepared)? {
                let content = self.read(&path, prepared)?;
                let display = relative_display(&self.options.working_dir, &path);
                let outcome =
                    self.transform_file(&prepared.pattern, &content, &display, &mut transform)?;

                if !outcome.version_found {
                    self.reporter.emit(&format!("{display}: no version found"));
                } else if !outcome.dirty {
                    debug!(path = %path.display(), "unchanged, not writing");
                } else if self.options.no_op {
                    debug!(path = %path.display(), "no-op mode, not writing");
                } else {
                    self.store.write(&content.with_lines(outcome.new_lines))?;
                }
            }
        }

        Ok(())
    }

    /// Same as [`Engine::apply`], with the operation given as a [`Transform`].
    pub fn apply_transform<C: ConfigSource + ?Sized>(
        &mut self,
        source: &C,
        transform: &Transform,
    ) -> Result<(), BumpError> {
        info!(%transform, no_op = self.options.no_op, "applying transform");
        self.apply(source, |version| transform.apply(version))
    }

    fn transform_file<F>(
        &mut self,
        pattern: &VersionPattern,
        content: &FileContent,
        display: &str,
        transform: &mut F,
    ) -> Result<TransformOutcome, BumpError>
    where
        F: FnMut(&Version) -> Result<Version, VersionError>,
    {
        let mut new_lines = Vec::with_capacity(content.lines().len());
        let mut version_found = false;
        let mut dirty = false;

        for (idx, line) in content.lines().iter().enumerate() {
            let ScanResult::Found {
                version: old_version,
                marker,
            } = pattern.scan(line)?
            else {
                new_lines.push(line.clone());
                continue;
            };

            version_found = true;
            let new_version = transform(&old_version)?;

            let new_line = if new_version == old_version {
                line.clone()
            } else {
                // replace exactly the captured text, not whatever the pattern would match now
                let new_line =
                    line.replacen(&old_version.to_string(), &new_version.to_string(), 1);
                pattern.verify(&new_line, &new_version)?;
                dirty = true;
                new_line
            };

            let marker = marker_or_line_number(marker, idx + 1);
            self.reporter.emit(&format!(
                "{display} ({marker}): {old_version} -> {new_version}"
            ));
            new_lines.push(new_line);
        }

        Ok(TransformOutcome {
            original_lines: content.lines().to_vec(),
            new_lines,
            version_found,
            dirty,
        })
    }

    /// Checks that all versions within each profile are identical.
    ///
    /// For each profile, in the order profiles first appear, the version is reported on its own
    /// for the default profile, or as `<profile>: <version>` otherwise. Profiles without any
    /// version are not reported.
    ///
    /// # Errors
    ///
    /// - Returns a [`BumpError::InconsistentVersions`] with all distinct versions of the first
    ///   profile that has more than one.
    pub fn ensure<C: ConfigSource + ?Sized>(&mut self, source: &C) -> Result<(), BumpError> {
        let entries = self.prepare(source)?;
        let mut versions_per_profile: Vec<(String, Vec<Version>)> = Vec::new();

        for prepared in &entries {
            let profile = prepared.entry.profile.as_str();
            let slot = match versions_per_profile
                .iter()
                .position(|(name, _)| name == profile)
            {
                Some(slot) => slot,
                None => {
                    versions_per_profile.push((profile.to_owned(), Vec::new()));
                    versions_per_profile.len() - 1
                }
            };

            for path in self.files(prepared)? {
                let content = self.read(&path, prepared)?;
                for line in content.lines() {
                    if let ScanResult::Found { version, .. } = prepared.pattern.scan(line)? {
                        versions_per_profile[slot].1.push(version);
                    }
                }
            }
        }

        for (profile, versions) in versions_per_profile {
            let distinct: Vec<&Version> = versions.iter().unique().collect();

            match distinct.as_slice() {
                [] => debug!(profile = profile.as_str(), "no versions found"),
                [version] if profile.is_empty() => self.reporter.emit(&version.to_string()),
                [version] => self.reporter.emit(&format!("{profile}: {version}")),
                _ => {
                    return Err(BumpError::InconsistentVersions {
                        versions: distinct.iter().map(ToString::to_string).collect(),
                        profile,
                    })
                }
            }
        }

        Ok(())
    }
}

fn marker_or_line_number(marker: &str, line_number: usize) -> String {
    if marker.is_empty() {
        line_number.to_string()
    } else {
        marker.to_owned()
    }
}
