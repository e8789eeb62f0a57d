//! # FGD Generator
//!
//! Turns the JSON class definitions of a Half-Life mod into game definition
//! files (`.fgd`) for the Hammer and J.A.C.K. level editors, once per
//! language declared in `sentences.json`.
//!
//! ## Pipeline
//!
//! 1. Load every record under `<source>/base` and `<source>/entities`
//!    into a [`RecordStore`].
//! 2. Load and audit the [`SentenceTable`].
//! 3. Classify the placeable entities.
//! 4. For each (language, dialect) pair, resolve entities and their bases
//!    in dependency order and render them into one file.
//!
//! ## Module Overview
//!
//! - [`config`] - Configuration management
//! - [`logging`] - Subscriber setup
//! - [`dialect`] - Editor dialects and type remapping
//! - [`classifier`] - Entity classification
//! - [`emitter`] - FGD text rendering
//! - [`resolver`] - Dependency-ordered emission
//! - [`orchestrator`] - The language × dialect cross product
//! - [`writer`] - Output sinks

pub mod classifier;
pub mod config;
pub mod dialect;
pub mod emitter;
pub mod logging;
pub mod orchestrator;
pub mod resolver;
pub mod writer;

pub use config::{Config, LogFormat};
pub use dialect::Dialect;
pub use orchestrator::{GenerationOrchestrator, GenerationReport, OutputLayout, PassSummary};
pub use writer::{FgdWriter, FsWriter, MemoryWriter};

use fgd_common::{FgdError, RecordStore, Result, SentenceIssue, SentenceTable, SENTENCES_FILE};

/// Run a full generation from `config.source_dir`, handing every file to `writer`.
pub fn generate(config: &Config, writer: &mut dyn FgdWriter) -> Result<GenerationReport> {
    if !config.source_dir.is_dir() {
        return Err(FgdError::Config(format!(
            "source directory {} does not exist",
            config.source_dir.display()
        )));
    }

    let sentences = SentenceTable::load(&config.source_dir.join(SENTENCES_FILE));
    log_sentence_issues(&sentences.audit());

    let store = RecordStore::load_dir(&config.source_dir);

    let layout = OutputLayout::new(&config.output_dir, &config.file_prefix);
    let orchestrator = GenerationOrchestrator::new(&store, &sentences, layout);
    tracing::info!(
        entities = orchestrator.classification().len(),
        languages = sentences.languages().len(),
        "Starting generation"
    );

    Ok(orchestrator.run(writer))
}

fn log_sentence_issues(issues: &[SentenceIssue]) {
    for issue in issues {
        match issue {
            SentenceIssue::Missing { key, language } => {
                tracing::warn!(key = %key, language = %language, "Missing translation")
            }
            SentenceIssue::Empty { key, language } => {
                tracing::warn!(key = %key, language = %language, "Empty translation")
            }
        }
    }

    if !issues.is_empty() {
        tracing::warn!(count = issues.len(), "Sentence table has translation gaps");
    }
}
