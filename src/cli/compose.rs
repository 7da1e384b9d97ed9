use std::path::PathBuf;

use anyhow::Context;
use folio::{
    RstExtractor,
    storage::{BookWriter, IndexHeader},
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Path to the book configuration (JSON, YAML or TOML)
    config: PathBuf,

    /// Directory to write the book to, overriding the configured one
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Build slides: the gradebook is left out
    #[arg(long, short)]
    slides: bool,
}

impl Command {
    #[instrument(level = "debug", skip(self), fields(config = %self.config.display()))]
    pub fn run(self) -> anyhow::Result<()> {
        let config = super::load_config(&self.config)?;
        let extractor =
            RstExtractor::new(config.source_dir()).suppress_todo(config.suppress_todo);

        println!("Configuring {}", self.config.display());
        let composition = super::walk_book(&config, &extractor, self.slides)?;

        super::report_missing_exercises(&composition.missing_exercises);

        let book_dir = self.output.unwrap_or_else(|| config.output_dir());
        let generated = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        let header = IndexHeader {
            title: &config.title,
            start_ordinal: config.start_chap_num,
            generated: &generated,
        };

        let written = BookWriter::new(book_dir.clone())
            .write(&composition, &header)
            .with_context(|| format!("cannot write book to {}", book_dir.display()))?;

        println!();
        println!(
            "{}",
            format!(
                "Composed {} modules into {}",
                composition.modules().count(),
                book_dir.display()
            )
            .success()
        );
        for path in written {
            let shown = path.strip_prefix(&book_dir).unwrap_or(&path);
            println!("  {}", format!("Wrote: {}", shown.display()).dim());
        }
        if !composition.images.is_empty() {
            println!(
                "  {}",
                format!("{} images referenced", composition.images.len()).dim()
            );
        }

        Ok(())
    }
}
