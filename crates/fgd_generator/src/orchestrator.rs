//! Runs the (language × dialect) cross product.
//!
//! Every pass starts from a fresh copy of the master table, so the
//! destructive resolver never sees records removed by an earlier pass.

use std::path::{Path, PathBuf};

use fgd_common::{RecordStore, SentenceTable};

use crate::classifier::Classification;
use crate::dialect::Dialect;
use crate::emitter::{header, ClassEmitter};
use crate::resolver::{ClassResolver, PassContext, PassOutput};
use crate::writer::FgdWriter;

/// Where generated files go: `<output_dir>/<language>/<file_prefix>-<dialect>.fgd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub output_dir: PathBuf,
    pub file_prefix: String,
}

impl OutputLayout {
    pub fn new(output_dir: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_prefix: file_prefix.into(),
        }
    }

    pub fn path(&self, language: &str, dialect: Dialect) -> PathBuf {
        self.output_dir
            .join(language)
            .join(format!("{}-{}.fgd", self.file_prefix, dialect.as_str()))
    }
}

/// Outcome of one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub language: String,
    pub dialect: Dialect,
    pub path: PathBuf,
    pub blocks: usize,
    pub leftovers: Vec<String>,
    /// Set when the file could not be written.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub passes: Vec<PassSummary>,
}

impl GenerationReport {
    pub fn failures(&self) -> impl Iterator<Item = &PassSummary> {
        self.passes.iter().filter(|pass| pass.error.is_some())
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

pub struct GenerationOrchestrator<'a> {
    store: &'a RecordStore,
    sentences: &'a SentenceTable,
    classification: Classification,
    order: Vec<String>,
    layout: OutputLayout,
}

impl<'a> GenerationOrchestrator<'a> {
    pub fn new(store: &'a RecordStore, sentences: &'a SentenceTable, layout: OutputLayout) -> Self {
        let classification = Classification::classify(store);
        let order = classification.emission_order(store);
        Self {
            store,
            sentences,
            classification,
            order,
            layout,
        }
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Render one file. Does no I/O.
    pub fn run_pass(&self, language: &str, dialect: Dialect) -> PassOutput {
        let emitter = ClassEmitter::new(dialect, self.sentences.resolver(language));
        let resolver = ClassResolver::new(&self.classification, emitter);
        let mut ctx = PassContext::new(self.store, header(dialect));

        for name in &self.order {
            resolver.resolve(name, &mut ctx);
        }

        let output = ctx.finish();
        if !output.leftovers.is_empty() {
            tracing::info!(
                language,
                dialect = %dialect,
                count = output.leftovers.len(),
                classes = ?output.leftovers,
                "Classes not referenced by any entity were not written"
            );
        }
        output
    }

    /// Render every (language, dialect) pair and hand each file to `writer`.
    /// A failed write is logged and recorded in the report; the remaining
    /// passes still run.
    pub fn run(&self, writer: &mut dyn FgdWriter) -> GenerationReport {
        let mut report = GenerationReport::default();

        for language in self.sentences.languages() {
            for dialect in Dialect::ALL {
                tracing::info!("Generating FGD \"{}\" for program {}", language, dialect);

                let output = self.run_pass(language, dialect);
                let path = self.layout.path(language, dialect);
                let error = write_output(writer, &path, &output.text);

                tracing::debug!(
                    path = %path.display(),
                    blocks = output.blocks.len(),
                    "Pass finished"
                );

                report.passes.push(PassSummary {
                    language: language.clone(),
                    dialect,
                    path,
                    blocks: output.blocks.len(),
                    leftovers: output.leftovers,
                    error,
                });
            }
        }

        report
    }
}

fn write_output(writer: &mut dyn FgdWriter, path: &Path, text: &str) -> Option<String> {
    match writer.write(path, text) {
        Ok(()) => None,
        Err(e) => {
            tracing::error!("Failed to write {}: {}", path.display(), e);
            Some(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use fgd_common::{ClassKind, ClassRecord, FgdError, Keyvalue, Result};

    use crate::writer::MemoryWriter;

    fn store() -> RecordStore {
        let mut mandatory = ClassRecord::new("Mandatory", ClassKind::Base);
        mandatory.keyvalues = Some(vec![Keyvalue::new("targetname", "target_source")]);

        let mut light = ClassRecord::new("light", ClassKind::Point);
        light.bases = vec!["Targetx".into()];
        light.keyvalues = Some(vec![Keyvalue::new("origin", "vector")]);

        [mandatory, light, ClassRecord::new("Targetx", ClassKind::Base)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_output_layout() {
        let layout = OutputLayout::new("out", "halflife-unified");
        assert_eq!(
            layout.path("spanish", Dialect::Jack),
            PathBuf::from("out/spanish/halflife-unified-jack.fgd")
        );
    }

    #[test]
    fn test_every_language_and_dialect_is_written() {
        let store = store();
        let mut sentences = SentenceTable::new();
        sentences.set_languages(vec!["english".into(), "spanish".into()]);

        let layout = OutputLayout::new("fgd", "test");
        let orchestrator = GenerationOrchestrator::new(&store, &sentences, layout);
        let mut writer = MemoryWriter::new();
        let report = orchestrator.run(&mut writer);

        assert!(report.is_success());
        assert_eq!(report.passes.len(), 4);
        assert_eq!(writer.files().len(), 4);

        for pass in &report.passes {
            assert_eq!(pass.blocks, 4);
            assert!(pass.leftovers.is_empty());
        }

        let hammer = writer.get(Path::new("fgd/english/test-hammer.fgd")).unwrap();
        let jack = writer.get(Path::new("fgd/english/test-jack.fgd")).unwrap();
        assert!(hammer.starts_with(&header(Dialect::Hammer)));
        assert!(hammer.contains("\torigin(string) : \"\" : \"\" : \"\""));
        assert!(jack.contains("\torigin(vector) : \"\" : \"\" : \"\""));
    }

    #[test]
    fn test_passes_are_independent() {
        let store = store();
        let sentences = SentenceTable::new();
        let layout = OutputLayout::new("fgd", "test");
        let orchestrator = GenerationOrchestrator::new(&store, &sentences, layout);

        let first = orchestrator.run_pass("english", Dialect::Jack);
        let second = orchestrator.run_pass("english", Dialect::Jack);
        assert_eq!(first, second);
        assert_eq!(first.blocks, vec!["Mandatory", "Targetx", "base_light", "light"]);
        assert_eq!(orchestrator.classification().len(), 1);
    }

    struct FailingWriter;

    impl FgdWriter for FailingWriter {
        fn write(&mut self, _path: &Path, _contents: &str) -> Result<()> {
            Err(FgdError::Config("read-only".into()))
        }
    }

    #[test]
    fn test_write_failures_are_reported() {
        let store = store();
        let sentences = SentenceTable::new();
        let layout = OutputLayout::new("fgd", "test");
        let orchestrator = GenerationOrchestrator::new(&store, &sentences, layout);

        let report = orchestrator.run(&mut FailingWriter);
        assert!(!report.is_success());
        assert_eq!(report.failures().count(), 2);
        assert_eq!(orchestrator.layout().file_prefix, "test");
    }
}
