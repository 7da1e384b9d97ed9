use std::path::Path;

use anyhow::Context;
use clap::ArgAction;
use folio::{BookConfig, Composition, TreeWalker, domain::ModuleFactExtractor};
use terminal::Colorize;

mod check;
mod compose;
mod outline;
mod terminal;

/// Assemble a numbered textbook from its chapter configuration.
#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.command.run()
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Compose the book and write its index, reference table and chapter map
    Compose(compose::Command),

    /// Walk the book and report problems without writing anything
    Check(check::Command),

    /// Print the table of contents with module numbers
    Outline(outline::Command),
}

impl Command {
    fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Compose(command) => command.run(),
            Self::Check(command) => command.run(),
            Self::Outline(command) => command.run(),
        }
    }
}

/// Module appended after the chapters of non-slide builds.
const GRADEBOOK: &str = "Gradebook";

fn load_config(path: &Path) -> anyhow::Result<BookConfig> {
    BookConfig::load(path).with_context(|| format!("cannot load book {}", path.display()))
}

/// Walks the chapters of `config`, then the gradebook if the build has one.
fn walk_book<E: ModuleFactExtractor>(
    config: &BookConfig,
    extractor: E,
    slides: bool,
) -> anyhow::Result<Composition> {
    let mut walker =
        TreeWalker::new(extractor, config.start_chap_num).assuming(config.assumed_topics());

    walker.walk(&config.chapters)?;
    if config.gradebook && !slides {
        walker.visit_trailing_module(GRADEBOOK)?;
    }

    Ok(walker.finish())
}

fn report_missing_exercises(missing: &[String]) {
    if missing.is_empty() {
        return;
    }
    tracing::warn!("{} exercises are not listed in the config file", missing.len());
    println!();
    println!("{}", "Exercises Not Listed in Config File:".warning());
    for exercise in missing {
        println!("  {exercise}");
    }
}
