/*!
 * Configuration handling for ctxfile
 */

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_complete::Shell;

use crate::ensure;
use crate::error::Result;
use crate::fileset::ExpandOptions;

/// Verbosity of diagnostic output on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Option<tracing::Level> {
        match self {
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Silent => None,
        }
    }
}

/// Command-line arguments for ctxfile
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "ctxfile",
    version = env!("CARGO_PKG_VERSION"),
    about = "Bundle files into one markdown document with a file tree",
    long_about = "Collects the given files (directories are expanded recursively) and produces a markdown document with an ASCII tree of their layout followed by each file's contents in fenced code blocks."
)]
pub struct Args {
    /// Files or directories to include, in order
    pub paths: Vec<String>,

    /// Write the document to this file
    #[clap(short, long)]
    pub output: Option<String>,

    /// Folder the tree and headings are relative to (default: common ancestor)
    #[clap(long)]
    pub root: Option<String>,

    /// Drop a file from the selection after expansion (repeatable)
    #[clap(long, value_name = "PATH")]
    pub exclude: Vec<String>,

    /// Copy the document to the system clipboard
    #[clap(long)]
    pub clip: bool,

    /// Also print the document to stdout when writing a file or copying
    #[clap(long)]
    pub stdout: bool,

    /// Skip files matched by .gitignore when expanding directories
    #[clap(long)]
    pub respect_gitignore: bool,

    /// Additional ignore file name to honour with --respect-gitignore
    #[clap(long, requires = "respect_gitignore")]
    pub gitignore_path: Option<String>,

    /// Comma-separated list of file or directory name patterns to skip
    #[clap(long, value_delimiter = ',')]
    pub ignore_patterns: Vec<String>,

    /// Comma-separated list of file name patterns to keep (others are skipped)
    #[clap(long, value_delimiter = ',')]
    pub include_patterns: Vec<String>,

    /// Do not print the summary report
    #[clap(short, long)]
    pub quiet: bool,

    /// Diagnostic log level
    #[clap(long, value_enum, default_value_t = LogLevel::default())]
    pub log_level: LogLevel,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Input files and directories
    pub inputs: Vec<PathBuf>,

    /// Output file, if any
    pub output_file: Option<PathBuf>,

    /// Explicit root folder
    pub root: Option<PathBuf>,

    /// Files removed from the selection
    pub excludes: Vec<PathBuf>,

    /// Copy output to clipboard
    pub clip: bool,

    /// Print output to stdout
    pub stdout: bool,

    /// Print the summary report
    pub report: bool,

    /// Directory expansion filters
    pub expand: ExpandOptions,

    /// Diagnostic log level
    pub log_level: LogLevel,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        let output_file = args.output.map(PathBuf::from);
        // stdout is the sink of last resort
        let stdout = args.stdout || (output_file.is_none() && !args.clip);

        Self {
            inputs: args.paths.into_iter().map(PathBuf::from).collect(),
            output_file,
            root: args.root.map(PathBuf::from),
            excludes: args.exclude.into_iter().map(PathBuf::from).collect(),
            clip: args.clip,
            stdout,
            report: !args.quiet,
            expand: ExpandOptions {
                respect_gitignore: args.respect_gitignore,
                gitignore_path: args.gitignore_path.map(PathBuf::from),
                ignore_patterns: args.ignore_patterns,
                include_patterns: args.include_patterns,
            },
            log_level: args.log_level,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(root) = &self.root {
            ensure!(
                root.is_dir(),
                Config,
                "Root folder not found: {}",
                root.display()
            );
        }

        if let Some(parent) = self.output_file.as_ref().and_then(|p| p.parent()) {
            ensure!(
                parent.as_os_str().is_empty() || parent.is_dir(),
                Config,
                "Output directory not found: {}",
                parent.display()
            );
        }

        Ok(())
    }

    /// Human-readable list of where the document goes
    pub fn destination(&self) -> String {
        let mut sinks = Vec::new();
        if let Some(path) = &self.output_file {
            sinks.push(path.display().to_string());
        }
        if self.clip {
            sinks.push("clipboard".to_string());
        }
        if self.stdout {
            sinks.push("stdout".to_string());
        }
        sinks.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Config {
        let args = Args::parse_from(std::iter::once("ctxfile").chain(args.iter().copied()));
        Config::from_args(args)
    }

    #[test]
    fn test_stdout_is_default_sink() {
        let config = parse(&["a.txt"]);
        assert!(config.stdout);
        assert!(!config.clip);
        assert_eq!(config.destination(), "stdout");
    }

    #[test]
    fn test_output_and_clip_replace_stdout() {
        let config = parse(&["-o", "out.md", "--clip", "src"]);
        assert!(!config.stdout);
        assert_eq!(config.destination(), "out.md, clipboard");

        let config = parse(&["--clip", "--stdout", "src"]);
        assert!(config.stdout);
    }

    #[test]
    fn test_pattern_lists_and_excludes() {
        let config = parse(&[
            "--ignore-patterns",
            "target,*.log",
            "--include-patterns",
            "*.rs",
            "--exclude",
            "src/gen.rs",
            "--exclude",
            "src/old.rs",
            "src",
        ]);

        assert_eq!(config.expand.ignore_patterns, vec!["target", "*.log"]);
        assert_eq!(config.expand.include_patterns, vec!["*.rs"]);
        assert_eq!(
            config.excludes,
            vec![PathBuf::from("src/gen.rs"), PathBuf::from("src/old.rs")]
        );
        assert_eq!(config.inputs, vec![PathBuf::from("src")]);
    }

    #[test]
    fn test_log_level_default_and_silent() {
        assert_eq!(parse(&[]).log_level, LogLevel::Warn);
        assert_eq!(LogLevel::Silent.to_tracing_level(), None);
        assert_eq!(
            parse(&["--log-level", "debug"]).log_level.to_tracing_level(),
            Some(tracing::Level::DEBUG)
        );
    }

    #[test]
    fn test_validate_root_and_output() -> Result<()> {
        let temp_dir = tempdir()?;

        let mut config = parse(&["a.txt"]);
        config.root = Some(temp_dir.path().to_path_buf());
        config.output_file = Some(temp_dir.path().join("out.md"));
        config.validate()?;

        config.root = Some(temp_dir.path().join("missing"));
        assert!(config.validate().is_err());

        config.root = None;
        config.output_file = Some(temp_dir.path().join("no_dir").join("out.md"));
        assert!(config.validate().is_err());

        config.output_file = Some(PathBuf::from("relative.md"));
        config.validate()?;
        Ok(())
    }
}
