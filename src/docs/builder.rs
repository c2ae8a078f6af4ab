use super::parse::{
    parse_dependencies, parse_log_format, parse_project_profile, parse_topic, parse_workflow,
};
use super::{DocDiagnostic, DocProblem, DocumentationModel, Topic};
use crate::config::PreflightConfig;
use crate::errors::Result;
use crate::io::DocumentationSource;
use std::path::{Path, PathBuf};

fn topic_path(config: &PreflightConfig, topic: Topic) -> &Path {
    match topic {
        Topic::PiiMasking => &config.docs.pii_masking,
        Topic::UploadValidation => &config.docs.upload_validation,
        Topic::CentralizedLogging => &config.docs.centralized_logging,
    }
}

fn topic_candidates(config: &PreflightConfig, topic: Topic) -> &[String] {
    match topic {
        Topic::PiiMasking => &config.topics.pii_symbols,
        Topic::UploadValidation => &config.topics.upload_symbols,
        Topic::CentralizedLogging => &config.topics.logging_symbols,
    }
}

fn missing(path: &Path, topic: Option<Topic>) -> DocDiagnostic {
    DocDiagnostic {
        path: path.to_path_buf(),
        topic,
        problem: DocProblem::Missing,
    }
}

fn malformed(path: &Path, topic: Option<Topic>, message: impl Into<String>) -> DocDiagnostic {
    DocDiagnostic {
        path: path.to_path_buf(),
        topic,
        problem: DocProblem::Malformed {
            message: message.into(),
        },
    }
}

fn record(model: &mut DocumentationModel, diagnostic: DocDiagnostic) {
    log::warn!("{}", diagnostic.to_error());
    model.diagnostics.push(diagnostic);
}

/// Read every known document and build the model.
///
/// Missing and malformed documents degrade the model and are recorded as
/// diagnostics; only unreadable documents fail.
pub fn build_documentation_model<D>(
    source: &D,
    config: &PreflightConfig,
) -> Result<DocumentationModel>
where
    D: DocumentationSource + ?Sized,
{
    let mut model = DocumentationModel::default();
    let docs = &config.docs;

    match source.read_document(&docs.project_file)? {
        Some(content) => {
            log::info!("Reading {}", docs.project_file.display());
            model.project = Some(parse_project_profile(&content));
        }
        None => record(&mut model, missing(&docs.project_file, None)),
    }

    match source.read_document(&docs.dependencies_file)? {
        Some(content) => match parse_dependencies(&content) {
            Ok(dependencies) => model.dependencies = dependencies,
            Err(e) => record(&mut model, malformed(&docs.dependencies_file, None, e)),
        },
        None => record(&mut model, missing(&docs.dependencies_file, None)),
    }

    match source.read_document(&docs.workflow)? {
        Some(content) => {
            log::info!("Reading workflow documentation");
            model.workflow = Some(parse_workflow(&content));
        }
        None => record(&mut model, missing(&docs.workflow, None)),
    }

    for topic in Topic::ALL {
        let path = topic_path(config, topic);
        model.topic_documents.insert(topic, PathBuf::from(path));

        let Some(content) = source.read_document(path)? else {
            record(&mut model, missing(path, Some(topic)));
            continue;
        };

        let candidates = topic_candidates(config, topic);
        match parse_topic(topic, &content, candidates) {
            Some(topic_config) => {
                log::info!(
                    "{}: required helper {}",
                    topic,
                    topic_config.required_symbol
                );
                model.topics.insert(topic, topic_config);
            }
            None => record(
                &mut model,
                malformed(
                    path,
                    Some(topic),
                    format!("names none of: {}", candidates.join(", ")),
                ),
            ),
        }

        if topic == Topic::CentralizedLogging {
            model.log_format = parse_log_format(&content);
        }
    }

    model.feature_directories = source.feature_directories(&docs.root)?;

    Ok(model)
}
