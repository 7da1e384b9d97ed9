use std::path::PathBuf;

use folio::{Composition, RstExtractor, domain::NoFacts};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Path to the book configuration (JSON, YAML or TOML)
    config: PathBuf,

    /// Only check the chapter tree; module sources are not read
    #[arg(long)]
    structure_only: bool,

    /// Fail when modules reference exercises missing from the config
    #[arg(long)]
    strict: bool,
}

impl Command {
    #[instrument(level = "debug", skip(self), fields(config = %self.config.display()))]
    pub fn run(self) -> anyhow::Result<()> {
        let config = super::load_config(&self.config)?;

        let composition = if self.structure_only {
            super::walk_book(&config, NoFacts, false)?
        } else {
            let extractor =
                RstExtractor::new(config.source_dir()).suppress_todo(config.suppress_todo);
            super::walk_book(&config, &extractor, false)?
        };

        Self::report(&composition);

        let missing = composition.missing_exercises.len();
        if self.strict && missing > 0 {
            anyhow::bail!("{missing} exercises are not listed in the config file");
        }

        Ok(())
    }

    fn report(composition: &Composition) {
        let modules = composition.modules().count();
        let empty_sections: Vec<&str> = composition.references.unresolved().collect();

        if composition.missing_exercises.is_empty() && empty_sections.is_empty() {
            println!(
                "{}",
                format!("✅ {modules} modules, no problems detected.").success()
            );
            return;
        }

        println!("{modules} modules");
        super::report_missing_exercises(&composition.missing_exercises);

        if !empty_sections.is_empty() {
            println!();
            println!("{}", "Sections without modules:".warning());
            for section in empty_sections {
                println!("  {section}");
            }
        }

        let todos = composition.todos.len();
        if todos > 0 {
            println!();
            println!("{}", format!("{todos} to-do annotations").dim());
        }
    }
}
