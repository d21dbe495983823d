use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use versync::{BumpError, ConfigEntry, Engine, FsStore, Options, TextEncoding, Transform, Version};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    selection: Selection,

    /// The directory to search for files. Reported paths are relative to it.
    #[arg(short, long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Report changes without writing them.
    #[arg(short, long, global = true)]
    no_op: bool,
}

/// Which files to look at, and how to find versions in them.
#[derive(Args, Debug)]
struct Selection {
    /// Selects files, e.g. `**/*.csproj`. Repeat to select more files. Each glob uses the same
    /// regex, encoding and profile.
    #[arg(short, long, global = true)]
    glob: Vec<String>,

    /// The regex locating versions. It must define a group `version`, and may define a group
    /// `marker`. Omit to use the template for the glob's file type.
    #[arg(short, long, global = true, default_value = "")]
    regex: String,

    /// The encoding of the selected files, as a label (`utf-16le`) or code page (`1200`). Omit
    /// to use UTF-8 or the template's encoding.
    #[arg(short, long, global = true, value_parser = TextEncoding::from_label)]
    encoding: Option<TextEncoding>,

    /// The profile that the selected files belong to.
    #[arg(short, long, global = true, default_value = "")]
    profile: String,
}

impl Selection {
    fn entries(&self) -> Result<Vec<ConfigEntry>, BumpError> {
        if self.glob.is_empty() {
            return Err(BumpError::Config {
                reason: "At least one `--glob` is required".to_owned(),
            });
        }

        Ok(self
            .glob
            .iter()
            .map(|glob| {
                let entry = ConfigEntry::new(glob.as_str())
                    .with_regex(self.regex.as_str())
                    .with_profile(self.profile.as_str());
                match self.encoding {
                    Some(encoding) => entry.with_encoding(encoding),
                    None => entry,
                }
            })
            .collect())
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lists the versions found in the selected files
    List,

    /// Increments the number at a one-based position, resetting all following numbers to zero
    Increment {
        /// The position of the number to increment
        #[arg(allow_negative_numbers = true)]
        position: i64,
    },

    /// Increments the number at a one-based position, leaving all other numbers unchanged
    IncrementOnly {
        /// The position of the number to increment
        #[arg(allow_negative_numbers = true)]
        position: i64,
    },

    /// Replaces the number at a one-based position. Padding is kept, e.g. `007`
    Assign {
        /// The position of the number to replace
        #[arg(allow_negative_numbers = true)]
        position: i64,

        /// The new number
        #[arg(allow_hyphen_values = true)]
        number: String,
    },

    /// Replaces every version found with VERSION
    Write {
        /// The version to write, e.g. `1.2.3-rc.1`
        #[arg(value_name = "VERSION")]
        new_version: String,
    },

    /// Replaces the label of every version found. Use an empty string to remove labels
    Label {
        /// The new label, including its leading separator, e.g. `-beta`
        #[arg(allow_hyphen_values = true)]
        label: String,
    },

    /// Checks that all versions within each profile are identical, and prints them
    Ensure,
}

impl Commands {
    /// The operation of a rewriting command, or `None` for the read-only commands.
    fn transform(&self) -> Result<Option<Transform>, BumpError> {
        let transform = match self {
            Commands::List | Commands::Ensure => return Ok(None),
            Commands::Increment { position } => Transform::Increment {
                position: *position,
                cascade: true,
            },
            Commands::IncrementOnly { position } => Transform::Increment {
                position: *position,
                cascade: false,
            },
            Commands::Assign { position, number } => Transform::Assign {
                position: *position,
                number: number.clone(),
            },
            Commands::Write { new_version } => Transform::Write(Version::parse(new_version)?),
            Commands::Label { label } => Transform::Label(label.clone()),
        };
        Ok(Some(transform))
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = do_work(cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn do_work(cli: Cli) -> Result<(), BumpError> {
    let entries = cli.selection.entries()?;
    let options = Options {
        working_dir: cli.dir,
        no_op: cli.no_op,
        profile: None,
    };
    let mut engine = Engine::new(FsStore, |line: &str| println!("{line}"), options);

    match (&cli.command, cli.command.transform()?) {
        (_, Some(transform)) => engine.apply_transform(&entries, &transform),
        (Commands::Ensure, None) => engine.ensure(&entries),
        (_, None) => engine.list(&entries),
    }
}
