//! Reference emitters: a plain-text report and a JSON dump

use protofold_core::{
    Emitter, Entity, FileAnalysis, GeneratedFile, IdField, MethodClassification, SchemaResult,
    ServiceClassification,
};
use protofold_fragment::{Fragment, fold_map, join, when, when_some};

/// Human-readable summary of entities and method classifications
#[derive(Debug, Default)]
pub struct ReportEmitter;

impl ReportEmitter {
    fn entity(entity: &Entity) -> Fragment {
        let id = match &entity.id_field {
            IdField::Resolved { name, .. } => name.as_str(),
            IdField::Unresolved => "<unresolved>",
        };
        Fragment::line(format!(
            "{} collection={} id={}",
            entity.name, entity.collection, id
        ))
    }

    fn method(method: &MethodClassification) -> Fragment {
        let c = &method.classification;
        Fragment::lit(format!(
            "{}({}) -> {}: {}",
            method.method, method.input_type, method.output_type, c
        )) + when_some(c.id_field(), |f| Fragment::lit(format!(" by {f}")))
            + Fragment::line("")
    }

    fn service(service: &ServiceClassification, unit: &str) -> Fragment {
        Fragment::line(format!("{}:", service.service))
            + fold_map(&service.methods, Self::method).indent_with(unit)
    }

    pub fn render(analysis: &FileAnalysis) -> Fragment {
        let unit = analysis.config().indent_unit.as_str();
        let registry = analysis.registry();
        let services = analysis.services();

        let header = Fragment::line(format!("# {}", analysis.file()))
            + when(
                !analysis.package().is_empty(),
                Fragment::line(format!("package: {}", analysis.package())),
            );
        let entities = Fragment::line(format!("entities ({}):", registry.len()))
            + fold_map(registry.iter(), Self::entity).indent_with(unit);
        let services = Fragment::line(format!("services ({}):", services.len()))
            + join(
                services.iter().map(|s| Self::service(s, unit)),
                Fragment::blank(),
            )
            .indent_with(unit);

        join([header, entities, services], Fragment::blank())
    }
}

impl Emitter for ReportEmitter {
    fn name(&self) -> &str {
        "report"
    }

    fn emit(&self, analysis: &FileAnalysis) -> SchemaResult<Vec<GeneratedFile>> {
        Ok(vec![GeneratedFile::new(
            format!("{}.report.txt", analysis.output_base()),
            Self::render(analysis),
        )])
    }
}

/// The analysis (entities and classifications) as pretty JSON
#[derive(Debug, Default)]
pub struct JsonEmitter;

impl Emitter for JsonEmitter {
    fn name(&self) -> &str {
        "json"
    }

    fn emit(&self, analysis: &FileAnalysis) -> SchemaResult<Vec<GeneratedFile>> {
        let json = analysis.to_json()?;
        Ok(vec![GeneratedFile::new(
            format!("{}.analysis.json", analysis.output_base()),
            Fragment::line(json),
        )])
    }
}
