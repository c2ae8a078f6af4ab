//! Documentation-versus-code consistency checks.
//!
//! Two families of checks run here:
//!
//! - topic checks: every file that shows a topic's usage signal must mention
//!   the helper the topic document requires
//! - feature checks: names and endpoints documented in feature documents must
//!   exist in the code
//!
//! A topic without a usable document is skipped. It is asked about later
//! instead of being reported as a discrepancy.

mod features;

pub use features::{fenced_python_names, DocumentedName};

use crate::config::PreflightConfig;
use crate::core::Discrepancy;
use crate::docs::{DocumentationModel, Topic, TopicConfig};
use crate::errors::Result;
use crate::io::{read_sources, FeatureDocument, SourceTree};
use crate::rules::{usage_rule_for, Rule, RuleUnit};
use std::path::{Path, PathBuf};
use tracing::{debug, debug_span};

/// The documented rule, restated.
pub fn doc_statement(topic: Topic, symbol: &str) -> String {
    match topic {
        Topic::PiiMasking => format!("All PII should use {symbol}"),
        Topic::UploadValidation => format!("All file uploads should use {symbol}"),
        Topic::CentralizedLogging => format!("Use centralized logging with {symbol}"),
    }
}

pub fn suggestion(topic: Topic, config: &TopicConfig) -> String {
    let symbol = &config.required_symbol;
    match topic {
        Topic::PiiMasking => {
            let origin = config
                .import_origin
                .as_deref()
                .unwrap_or(topic.default_import_origin());
            format!("Add: from {origin} import {symbol}")
        }
        Topic::UploadValidation => format!("Add validation: {symbol}(uploaded_file)"),
        Topic::CentralizedLogging => format!("Replace with: logger = {symbol}(__name__)"),
    }
}

/// Whether any marker occurs in the path.
pub(crate) fn path_has_marker(path: &Path, markers: &[String]) -> bool {
    let text = path.to_string_lossy();
    markers.iter().any(|marker| text.contains(marker.as_str()))
}

pub struct ConsistencyChecker<'a> {
    model: &'a DocumentationModel,
    config: &'a PreflightConfig,
}

impl<'a> ConsistencyChecker<'a> {
    pub fn new(model: &'a DocumentationModel, config: &'a PreflightConfig) -> Self {
        Self { model, config }
    }

    /// Topic checks in topic order, then feature document checks in document order.
    pub fn check<T>(&self, tree: &T, documents: &[FeatureDocument]) -> Result<Vec<Discrepancy>>
    where
        T: SourceTree + ?Sized,
    {
        let mut discrepancies = self.check_topics(tree)?;
        discrepancies.extend(features::check_documents(tree, self.config, documents)?);
        Ok(discrepancies)
    }

    pub fn check_topics<T>(&self, tree: &T) -> Result<Vec<Discrepancy>>
    where
        T: SourceTree + ?Sized,
    {
        let mut discrepancies = Vec::new();
        for topic in Topic::ALL {
            match self.model.topic(topic) {
                Some(config) => discrepancies.extend(self.check_topic(tree, topic, config)?),
                None => debug!(%topic, "No usable policy, skipping usage check"),
            }
        }
        Ok(discrepancies)
    }

    fn topic_glob(&self, topic: Topic) -> &str {
        let consistency = &self.config.consistency;
        match topic {
            Topic::PiiMasking => &consistency.pii_glob,
            Topic::UploadValidation => &consistency.upload_glob,
            Topic::CentralizedLogging => &consistency.logging_glob,
        }
    }

    fn is_excluded(&self, topic: Topic, path: &Path) -> bool {
        let consistency = &self.config.consistency;
        path_has_marker(path, &consistency.test_markers)
            || (topic == Topic::CentralizedLogging
                && path_has_marker(path, &consistency.logging_exclusions))
    }

    fn check_topic<T>(
        &self,
        tree: &T,
        topic: Topic,
        config: &TopicConfig,
    ) -> Result<Vec<Discrepancy>>
    where
        T: SourceTree + ?Sized,
    {
        let _span = debug_span!("check_topic", %topic).entered();

        let paths: Vec<PathBuf> = tree
            .files_matching(self.topic_glob(topic))?
            .into_iter()
            .filter(|path| !self.is_excluded(topic, path))
            .collect();
        let sources = read_sources(tree, &paths)?;

        let rule = usage_rule_for(topic, config);
        let doc_file = self.model.topic_document(topic);

        Ok(sources
            .iter()
            .filter_map(|(path, text)| {
                let draft = rule.evaluate(&RuleUnit::Document { path, text })?;
                Some(Discrepancy {
                    doc_file: doc_file.clone(),
                    doc_statement: doc_statement(topic, &config.required_symbol),
                    observed: draft.description,
                    suggestion: suggestion(topic, config),
                    file: Some(path.clone()),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::build_documentation_model;
    use crate::io::MemoryProject;
    use pretty_assertions::assert_eq;

    fn project() -> MemoryProject {
        MemoryProject::new()
            .with_file(
                "docs/security/pii_masking.md",
                "Mask emails with GlobalPIIMasker\nfrom core.privacy import GlobalPIIMasker",
            )
            .with_file("docs/infrastructure/logging.md", "Always use get_logger")
            .with_file("accounts/views.py", "def show(u):\n    return u.email\n")
            .with_file(
                "accounts/forms.py",
                "from core.privacy import GlobalPIIMasker\nEMAIL = 1\n",
            )
            .with_file("accounts/tests/test_views.py", "assert u.email\nprint(u)\n")
            .with_file("accounts/migrations/0001.py", "print('migrating')\n")
            .with_file("accounts/tasks.py", "print('done')\n")
    }

    fn check(project: &MemoryProject) -> Vec<Discrepancy> {
        let config = PreflightConfig::default();
        let model = build_documentation_model(project, &config).unwrap();
        ConsistencyChecker::new(&model, &config)
            .check(project, &[])
            .unwrap()
    }

    #[test]
    fn test_topic_violations_in_topic_order() {
        let discrepancies = check(&project());
        let observed: Vec<_> = discrepancies.iter().map(|d| d.observed.as_str()).collect();
        assert_eq!(
            observed,
            vec![
                "views.py handles PII but doesn't import GlobalPIIMasker",
                "tasks.py uses print/basic logging instead of get_logger",
            ]
        );
        assert_eq!(
            discrepancies[0].suggestion,
            "Add: from core.privacy import GlobalPIIMasker"
        );
        assert_eq!(
            discrepancies[0].doc_file,
            PathBuf::from("docs/security/pii_masking.md")
        );
        assert_eq!(
            discrepancies[1].suggestion,
            "Replace with: logger = get_logger(__name__)"
        );
    }

    #[test]
    fn test_absent_topic_raises_nothing() {
        let views = "request.FILES['a']\nprint(x)\nemail = 1\n";
        let project = MemoryProject::new().with_file("shop/views.py", views);
        assert!(check(&project).is_empty());
    }

    #[test]
    fn test_documented_but_unmatched_upload_policy() {
        let project = MemoryProject::new()
            .with_file(
                "docs/validation/magika.md",
                "Uploads go through validate_with_magika",
            )
            .with_file("shop/views.py", "f = request.FILES['doc']\n")
            .with_file("shop/forms.py", "f = request.FILES['doc']\n");
        let discrepancies = check(&project);
        assert_eq!(discrepancies.len(), 1);
        assert_eq!(discrepancies[0].file, Some(PathBuf::from("shop/views.py")));
        assert_eq!(
            discrepancies[0].doc_statement,
            "All file uploads should use validate_with_magika"
        );
    }

    #[test]
    fn test_pii_suggestion_defaults_import_origin() {
        let config = TopicConfig {
            required_symbol: "mask_pii".to_string(),
            import_origin: None,
            flags: Default::default(),
        };
        assert_eq!(
            suggestion(Topic::PiiMasking, &config),
            "Add: from utils.pii import mask_pii"
        );
    }
}
