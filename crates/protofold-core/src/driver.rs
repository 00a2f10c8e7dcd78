//! Per-file pipeline: model → registry → classifications → emitters
//!
//! Every schema file is analyzed on its own. Nothing is shared between files,
//! so [`Driver::analyze_all`] and [`Driver::run_all`] fan out across threads
//! and still return results in input order. A file that fails to build fails
//! alone.

use crate::classify::{Classification, Classifier, ServiceClassification};
use crate::config::GeneratorConfig;
use crate::error::{SchemaError, SchemaResult};
use crate::model::SchemaModel;
use crate::registry::EntityRegistry;
use crate::schema::FileDescriptor;
use protofold_fragment::Fragment;
use rayon::prelude::*;
use serde::Serialize;

/// Everything known about one schema file after analysis.
///
/// This is what emitters receive. It is read-only.
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    file: String,
    package: String,

    #[serde(skip)]
    stem: String,

    #[serde(skip)]
    output_base: String,

    #[serde(skip)]
    model: SchemaModel,

    entities: EntityRegistry,
    services: Vec<ServiceClassification>,

    #[serde(skip)]
    config: GeneratorConfig,
}

impl FileAnalysis {
    /// Build model, registry and classifications for `file`.
    pub fn build(file: &FileDescriptor, config: &GeneratorConfig) -> SchemaResult<Self> {
        let model = SchemaModel::build(file)?;
        let registry = EntityRegistry::build(&model, config);
        let services = Classifier::new(&model, &registry, config).classify_model();

        Ok(Self {
            file: model.file.clone(),
            package: model.package.clone(),
            stem: file.stem().to_string(),
            output_base: file.output_base(),
            model,
            entities: registry,
            services,
            config: config.clone(),
        })
    }

    /// Schema file name as given by the loader
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// File name without directories or extension
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Relative path without extension, see [`FileDescriptor::output_base`]
    pub fn output_base(&self) -> &str {
        &self.output_base
    }

    pub fn model(&self) -> &SchemaModel {
        &self.model
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.entities
    }

    pub fn services(&self) -> &[ServiceClassification] {
        &self.services
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Look up the classification of `service.method`
    pub fn classification(&self, service: &str, method: &str) -> Option<&Classification> {
        self.services
            .iter()
            .find(|s| s.service == service)?
            .methods
            .iter()
            .find(|m| m.method == method)
            .map(|m| &m.classification)
    }

    /// Serialize the analysis (entities and classifications) as pretty JSON
    pub fn to_json(&self) -> SchemaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One output file produced by an emitter, still unrendered.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub name: String,
    pub content: Fragment,
}

impl GeneratedFile {
    pub fn new(name: impl Into<String>, content: Fragment) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    pub fn render(&self) -> RenderedFile {
        RenderedFile {
            name: self.name.clone(),
            content: self.content.render(),
        }
    }
}

/// A generated file after rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub name: String,
    pub content: String,
}

/// A target-specific code generator.
///
/// Emitters receive the finished analysis of one file and describe their
/// output as fragments; the driver does the rendering. Output file naming is
/// entirely up to the emitter.
///
/// # Example
///
/// ```
/// use protofold_core::prelude::*;
/// use protofold_fragment::Fragment;
///
/// struct EntityList;
///
/// impl Emitter for EntityList {
///     fn name(&self) -> &str {
///         "entity-list"
///     }
///
///     fn emit(&self, analysis: &FileAnalysis) -> SchemaResult<Vec<GeneratedFile>> {
///         let body = analysis
///             .registry()
///             .iter()
///             .map(|e| Fragment::line(&e.name))
///             .collect();
///         Ok(vec![GeneratedFile::new(format!("{}.txt", analysis.stem()), body)])
///     }
/// }
/// ```
pub trait Emitter: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    /// Produce the output files for one analyzed schema file
    fn emit(&self, analysis: &FileAnalysis) -> SchemaResult<Vec<GeneratedFile>>;
}

/// Runs the pipeline for schema files.
pub struct Driver {
    config: GeneratorConfig,
    emitters: Vec<Box<dyn Emitter>>,
}

impl Driver {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            emitters: Vec::new(),
        }
    }

    /// Register an emitter; emitters run in registration order
    pub fn with_emitter(mut self, emitter: impl Emitter + 'static) -> Self {
        self.emitters.push(Box::new(emitter));
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Names of the registered emitters, in run order
    pub fn emitter_names(&self) -> Vec<&str> {
        self.emitters.iter().map(|e| e.name()).collect()
    }

    /// Analyze one file
    pub fn analyze(&self, file: &FileDescriptor) -> SchemaResult<FileAnalysis> {
        match FileAnalysis::build(file, &self.config) {
            Ok(analysis) => {
                tracing::info!(
                    file = %file.name,
                    entities = analysis.registry().len(),
                    methods = analysis.model().methods().count(),
                    "file analyzed"
                );
                Ok(analysis)
            }
            Err(err) => {
                tracing::warn!(file = %file.name, error = %err, "file analysis failed");
                Err(err)
            }
        }
    }

    /// Analyze files in parallel; results keep input order
    pub fn analyze_all(&self, files: &[FileDescriptor]) -> Vec<SchemaResult<FileAnalysis>> {
        files.par_iter().map(|file| self.analyze(file)).collect()
    }

    /// Analyze one file and run every emitter over it
    pub fn run(&self, file: &FileDescriptor) -> SchemaResult<Vec<RenderedFile>> {
        let analysis = self.analyze(file)?;
        self.emit(&analysis)
    }

    /// [`run`](Self::run) for many files in parallel; results keep input order
    pub fn run_all(&self, files: &[FileDescriptor]) -> Vec<SchemaResult<Vec<RenderedFile>>> {
        files.par_iter().map(|file| self.run(file)).collect()
    }

    /// Run every emitter over an existing analysis and render the output
    pub fn emit(&self, analysis: &FileAnalysis) -> SchemaResult<Vec<RenderedFile>> {
        let mut rendered = Vec::new();
        for emitter in &self.emitters {
            let files = emitter.emit(analysis).map_err(|err| match err {
                SchemaError::EmitterError { .. } => err,
                other => SchemaError::EmitterError {
                    emitter: emitter.name().to_string(),
                    message: other.to_string(),
                },
            })?;
            tracing::debug!(
                file = %analysis.file(),
                emitter = emitter.name(),
                outputs = files.len(),
                "emitter finished"
            );
            rendered.extend(files.iter().map(GeneratedFile::render));
        }
        Ok(rendered)
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("config", &self.config)
            .field("emitters", &self.emitter_names())
            .finish()
    }
}
