/*!
 * Command-line interface for ctxfile
 */

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use ctxfile::clipboard::copy_to_clipboard;
use ctxfile::config::{Args, Config};
use ctxfile::document::DocumentBuilder;
use ctxfile::error::Result;
use ctxfile::fileset::FileSetManager;
use ctxfile::report::{GenerationReport, ReportFormat, Reporter};
use ctxfile::types::AddResult;

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "ctxfile", &mut io::stdout());
        return Ok(());
    }

    let config = Config::from_args(args);
    setup_tracing(&config);
    debug!("Configuration: {:?}", config);

    config.validate()?;

    let start_time = Instant::now();

    // Collect the selection
    let mut file_set = FileSetManager::with_options(config.expand.clone());
    let mut selection = AddResult::default();
    for input in &config.inputs {
        let result = if input.is_dir() {
            file_set.add_directory(input)?
        } else {
            file_set.add_files([input])
        };
        selection.merge(result);
    }

    if selection.skipped > 0 {
        eprintln!("{}", selection);
    }

    for exclude in &config.excludes {
        if !file_set.remove_file(exclude) {
            warn!("Excluded path not in selection: {}", exclude.display());
        }
    }

    if let Some(root) = &config.root {
        file_set.set_root_override(root);
        eprintln!("Root folder set to: {}", root.display());
    }

    // Build the document
    let progress = if config.report && file_set.len() > 1 && io::stderr().is_terminal() {
        let progress = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len}")
        {
            progress.set_style(style);
        }
        progress.set_prefix("Reading");
        progress.enable_steady_tick(Duration::from_millis(100));
        progress
    } else {
        ProgressBar::hidden()
    };

    let builder = DocumentBuilder::new(progress.clone());
    let document = builder.generate(&file_set);
    progress.finish_and_clear();
    let document = document?;

    // Deliver it
    if let Some(path) = &config.output_file {
        fs::write(path, &document.text)?;
        info!("Wrote {}", path.display());
    }

    if config.clip {
        copy_to_clipboard(&document.text)?;
        eprintln!("Markdown has been copied to clipboard.");
    }

    if config.stdout {
        let mut stdout = io::stdout().lock();
        stdout.write_all(document.text.as_bytes())?;
        stdout.flush()?;
    }

    if config.report {
        let report = GenerationReport {
            destination: config.destination(),
            root: file_set.current_root().map(|r| r.to_path_buf()),
            duration: start_time.elapsed(),
            selection,
            statistics: document.statistics,
        };
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    }

    Ok(())
}

fn setup_tracing(config: &Config) {
    if let Some(level) = config.log_level.to_tracing_level() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .without_time()
            .compact()
            .init();
    }
}
