use std::path::PathBuf;

use folio::{
    Composition,
    Identity,
    domain::{NoFacts, ReferenceRegistry, ReferenceToken, TocEntry},
};
use serde::Serialize;
use tracing::instrument;

use super::terminal::{Colorize, has_room_for_numbers};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Path to the book configuration (JSON, YAML or TOML)
    config: PathBuf,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Leave out the gradebook, as slide builds do
    #[arg(long, short)]
    slides: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct Outline<'a> {
    toc: &'a [TocEntry],
    appendix: Vec<&'a str>,
    references: &'a ReferenceRegistry,
}

impl Command {
    #[instrument(level = "debug", skip(self), fields(config = %self.config.display()))]
    pub fn run(self) -> anyhow::Result<()> {
        let config = super::load_config(&self.config)?;
        let composition = super::walk_book(&config, NoFacts, self.slides)?;

        match self.output {
            OutputFormat::Table => Self::output_table(&composition),
            OutputFormat::Json => Self::output_json(&composition)?,
        }

        Ok(())
    }

    fn output_table(composition: &Composition) {
        let numbered = has_room_for_numbers();
        let number_of = |name: &str| {
            composition
                .references
                .get(name)
                .and_then(ReferenceToken::target)
                .unwrap_or_default()
                .to_string()
        };

        for entry in &composition.toc {
            match entry {
                TocEntry::Heading { title, depth } => {
                    println!("{}{}", "  ".repeat(*depth), title.heading());
                }
                TocEntry::Module { identity, depth } => {
                    let indent = "  ".repeat(*depth);
                    if numbered {
                        println!("{indent}{} {identity}", number_of(identity.as_str()).dim());
                    } else {
                        println!("{indent}{identity}");
                    }
                }
            }
        }

        for identity in &composition.appendix {
            println!("{identity}");
        }
    }

    fn output_json(composition: &Composition) -> anyhow::Result<()> {
        let outline = Outline {
            toc: &composition.toc,
            appendix: composition.appendix.iter().map(Identity::as_str).collect(),
            references: &composition.references,
        };
        println!("{}", serde_json::to_string_pretty(&outline)?);
        Ok(())
    }
}
