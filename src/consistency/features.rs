//! Feature documentation cross-checks.
//!
//! Feature documents live in `docs/<feature>/*.md`. Names defined in their
//! ```` ```python ```` samples must be defined in the feature's code; model
//! documents must match a model class; API documents must match the routes.

use super::path_has_marker;
use crate::config::PreflightConfig;
use crate::core::Discrepancy;
use crate::errors::Result;
use crate::io::{read_sources, FeatureDocument, SourceTree};
use crate::issue::parse_endpoints;
use once_cell::sync::Lazy;
use once_cell::unsync::OnceCell;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::debug_span;

static PYTHON_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```python(.*?)```").unwrap());

static DEF_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdef\s+(\w+)").unwrap());

static CLASS_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bclass\s+(\w+)").unwrap());

static MODEL_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bclass\s+(\w+)\s*\(.*Model").unwrap());

type Sources = Vec<(PathBuf, String)>;

/// A name defined in a documentation code sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentedName {
    Function(String),
    Class(String),
}

impl DocumentedName {
    pub fn name(&self) -> &str {
        match self {
            Self::Function(name) | Self::Class(name) => name,
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            Self::Function(_) => "def",
            Self::Class(_) => "class",
        }
    }
}

/// Functions then classes of each ```` ```python ```` block, block by block.
pub fn fenced_python_names(content: &str) -> Vec<DocumentedName> {
    PYTHON_FENCE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .flat_map(|block| {
            let block = block.as_str();
            let functions = DEF_NAME
                .captures_iter(block)
                .map(|caps| DocumentedName::Function(caps[1].to_string()));
            let classes = CLASS_NAME
                .captures_iter(block)
                .map(|caps| DocumentedName::Class(caps[1].to_string()));
            functions.chain(classes).collect::<Vec<_>>()
        })
        .collect()
}

fn defines(sources: &Sources, keyword: &str, name: &str) -> Result<bool> {
    let pattern = Regex::new(&format!(r"\b{}\s+{}\b", keyword, regex::escape(name)))?;
    Ok(sources.iter().any(|(_, text)| pattern.is_match(text)))
}

/// Lazily read source sets shared by every document of one run.
struct SourceCache<'t, T: ?Sized> {
    tree: &'t T,
    config: &'t PreflightConfig,
    implementations: BTreeMap<String, Sources>,
    models: OnceCell<Sources>,
    routes: OnceCell<Sources>,
}

impl<'t, T> SourceCache<'t, T>
where
    T: SourceTree + ?Sized,
{
    fn new(tree: &'t T, config: &'t PreflightConfig) -> Self {
        Self {
            tree,
            config,
            implementations: BTreeMap::new(),
            models: OnceCell::new(),
            routes: OnceCell::new(),
        }
    }

    fn read_globs(&self, globs: &[String]) -> Result<Sources> {
        let mut paths = BTreeSet::new();
        for glob in globs {
            paths.extend(self.tree.files_matching(glob)?);
        }
        let paths: Vec<PathBuf> = paths.into_iter().collect();
        read_sources(self.tree, &paths)
    }

    /// Non-test sources whose path mentions the feature, or all of them when none do.
    fn implementation(&mut self, feature: &str) -> Result<&Sources> {
        if !self.implementations.contains_key(feature) {
            let consistency = &self.config.consistency;
            let candidates: Vec<PathBuf> = self
                .tree
                .files_matching(&consistency.implementation_glob)?
                .into_iter()
                .filter(|path| !path_has_marker(path, &consistency.test_markers))
                .collect();

            let token = feature.to_lowercase();
            let scoped: Vec<PathBuf> = candidates
                .iter()
                .filter(|path| path.to_string_lossy().to_lowercase().contains(&token))
                .cloned()
                .collect();
            let chosen = if scoped.is_empty() {
                candidates
            } else {
                scoped
            };

            let sources = read_sources(self.tree, &chosen)?;
            self.implementations.insert(feature.to_string(), sources);
        }
        Ok(&self.implementations[feature])
    }

    fn models(&self) -> Result<&Sources> {
        self.models
            .get_or_try_init(|| self.read_globs(&self.config.scan.model_globs))
    }

    fn routes(&self) -> Result<&Sources> {
        self.routes
            .get_or_try_init(|| self.read_globs(&self.config.consistency.route_globs))
    }
}

pub(crate) fn check_documents<T>(
    tree: &T,
    config: &PreflightConfig,
    documents: &[FeatureDocument],
) -> Result<Vec<Discrepancy>>
where
    T: SourceTree + ?Sized,
{
    let mut cache = SourceCache::new(tree, config);
    let mut discrepancies = Vec::new();
    for document in documents {
        discrepancies.extend(check_document(&mut cache, document)?);
    }
    Ok(discrepancies)
}

fn check_document<T>(
    cache: &mut SourceCache<'_, T>,
    document: &FeatureDocument,
) -> Result<Vec<Discrepancy>>
where
    T: SourceTree + ?Sized,
{
    let _span = debug_span!("check_feature_document", path = %document.path.display()).entered();

    let mut discrepancies = Vec::new();
    let mut reported = BTreeSet::new();
    let doc_name = document.name.to_lowercase();

    let implementation = cache.implementation(&document.feature)?;
    for documented in fenced_python_names(&document.content) {
        let name = documented.name();
        if reported.contains(name) || defines(implementation, documented.keyword(), name)? {
            continue;
        }
        reported.insert(name.to_string());

        let (what, shown) = match &documented {
            DocumentedName::Function(_) => ("function", format!("{name}()")),
            DocumentedName::Class(_) => ("class", name.to_string()),
        };
        discrepancies.push(Discrepancy {
            doc_file: document.path.clone(),
            doc_statement: format!("{} documents {what} {shown}", document.name),
            observed: format!(
                "No `{} {name}` found in the {} implementation",
                documented.keyword(),
                document.feature
            ),
            suggestion: format!(
                "Implement {shown} or remove it from {}",
                document.path.display()
            ),
            file: None,
        });
    }

    if doc_name.contains("api") {
        let routes = cache.routes()?;
        for endpoint in parse_endpoints(&document.content) {
            let missing = endpoint
                .path
                .split('/')
                .filter(|segment| !segment.is_empty() && !segment.starts_with('{'))
                .find(|segment| !routes.iter().any(|(_, text)| text.contains(segment)));

            if let Some(segment) = missing {
                discrepancies.push(Discrepancy {
                    doc_file: document.path.clone(),
                    doc_statement: format!("{} documents endpoint {endpoint}", document.name),
                    observed: format!("`{segment}` is not routed in any routing file"),
                    suggestion: format!(
                        "Add a route for {endpoint} or update {}",
                        document.path.display()
                    ),
                    file: None,
                });
            }
        }
    } else if doc_name.contains("model") {
        let models = cache.models()?;
        for caps in MODEL_CLASS.captures_iter(&document.content) {
            let name = &caps[1];
            if reported.contains(name) || defines(models, "class", name)? {
                continue;
            }
            reported.insert(name.to_string());
            discrepancies.push(Discrepancy {
                doc_file: document.path.clone(),
                doc_statement: format!("{} documents model {name}", document.name),
                observed: format!("No `class {name}` found in any model file"),
                suggestion: format!(
                    "Add {name} to a models file or update {}",
                    document.path.display()
                ),
                file: None,
            });
        }
    }

    Ok(discrepancies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryProject;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn document(feature: &str, name: &str, content: &str) -> FeatureDocument {
        FeatureDocument {
            feature: feature.to_string(),
            name: name.to_string(),
            path: PathBuf::from(format!("docs/{feature}/{name}.md")),
            content: content.to_string(),
        }
    }

    fn check(tree: &MemoryProject, documents: &[FeatureDocument]) -> Vec<Discrepancy> {
        check_documents(tree, &PreflightConfig::default(), documents).unwrap()
    }

    #[test]
    fn test_fenced_python_names() {
        let content = indoc! {"
            Intro mentions def not_in_fence.

            ```python
            class Exporter:
                def run(self):
                    pass
            ```

            ```bash
            def ignored
            ```
        "};
        assert_eq!(
            fenced_python_names(content),
            vec![
                DocumentedName::Function("run".to_string()),
                DocumentedName::Class("Exporter".to_string()),
            ]
        );
    }

    #[test]
    fn test_documented_function_missing_from_feature_code() {
        let tree = MemoryProject::new()
            .with_file("user/services.py", "def export_user(u):\n    pass\n")
            .with_file("user/tests/test_services.py", "def import_user(): pass\n");
        let doc = document(
            "user",
            "implementation",
            "```python\ndef export_user(u): ...\ndef import_user(u): ...\n```",
        );
        let discrepancies = check(&tree, &[doc]);
        assert_eq!(discrepancies.len(), 1);
        assert_eq!(
            discrepancies[0].doc_statement,
            "implementation documents function import_user()"
        );
        assert_eq!(
            discrepancies[0].observed,
            "No `def import_user` found in the user implementation"
        );
    }

    #[test]
    fn test_feature_without_matching_paths_searches_everything() {
        let tree = MemoryProject::new().with_file("core/services.py", "class Exporter: pass\n");
        let doc = document("reports", "overview", "```python\nclass Exporter:\n```");
        assert!(check(&tree, &[doc]).is_empty());
    }

    #[test]
    fn test_model_document_requires_model_class() {
        let tree = MemoryProject::new()
            .with_file("shop/models.py", "class Order(models.Model):\n    pass\n");
        let doc = document(
            "shop",
            "models",
            "Orders: class Order(models.Model)\nRefunds: class Refund(models.Model)",
        );
        let discrepancies = check(&tree, &[doc]);
        assert_eq!(discrepancies.len(), 1);
        assert_eq!(
            discrepancies[0].doc_statement,
            "models documents model Refund"
        );
    }

    #[test]
    fn test_api_document_requires_routed_segments() {
        let tree = MemoryProject::new()
            .with_file("users/urls.py", "path('users/<int:id>/', views.detail)\n");
        let doc = document("user", "api", "GET /users/{id}\nPOST /users/{id}/export");
        let discrepancies = check(&tree, &[doc]);
        assert_eq!(discrepancies.len(), 1);
        assert_eq!(
            discrepancies[0].doc_statement,
            "api documents endpoint POST /users/{id}/export"
        );
        assert_eq!(
            discrepancies[0].observed,
            "`export` is not routed in any routing file"
        );
    }

    #[test]
    fn test_same_name_reported_once_per_document() {
        let tree = MemoryProject::new();
        let doc = document(
            "shop",
            "models",
            "```python\nclass Refund(models.Model):\n    pass\n```",
        );
        let discrepancies = check(&tree, &[doc]);
        assert_eq!(discrepancies.len(), 1);
    }
}
