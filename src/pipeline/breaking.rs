use super::outcome::BreakingChange;
use crate::config::ScanConfig;
use crate::errors::Result;
use crate::io::{read_sources, SourceTree};
use crate::issue::IssueModel;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Models the issue proposes that are already defined in a model file.
///
/// Reported in issue order, then file order.
pub fn detect_breaking_changes<T>(
    issue: &IssueModel,
    tree: &T,
    scan: &ScanConfig,
) -> Result<Vec<BreakingChange>>
where
    T: SourceTree + ?Sized,
{
    if issue.models.is_empty() {
        return Ok(Vec::new());
    }

    let mut paths = BTreeSet::new();
    for glob in &scan.model_globs {
        paths.extend(tree.files_matching(glob)?);
    }
    let paths: Vec<PathBuf> = paths.into_iter().collect();
    let sources = read_sources(tree, &paths)?;

    let mut changes = Vec::new();
    for model in &issue.models {
        let definition = Regex::new(&format!(r"\bclass\s+{}\b", regex::escape(model)))?;
        changes.extend(
            sources
                .iter()
                .filter(|(_, text)| definition.is_match(text))
                .map(|(path, _)| BreakingChange {
                    entity: model.clone(),
                    file: path.clone(),
                }),
        );
    }
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryProject;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_existing_model_is_breaking() {
        let tree = MemoryProject::new()
            .with_file("shop/models.py", "class Order(models.Model):\n    pass\n")
            .with_file("legacy/models.py", "class Order(Base):\n    pass\n")
            .with_file("shop/views.py", "class Invoice: pass\n");
        let issue = IssueModel::parse("Add model Invoice and model Order");
        let changes = detect_breaking_changes(&issue, &tree, &ScanConfig::default()).unwrap();
        assert_eq!(
            changes,
            vec![
                BreakingChange {
                    entity: "Order".to_string(),
                    file: PathBuf::from("legacy/models.py")
                },
                BreakingChange {
                    entity: "Order".to_string(),
                    file: PathBuf::from("shop/models.py")
                },
            ]
        );
    }

    #[test]
    fn test_prefix_of_existing_class_is_not_breaking() {
        let models = "class OrderItem(models.Model):\n    pass\n";
        let tree = MemoryProject::new().with_file("shop/models.py", models);
        let issue = IssueModel::parse("Add model Order");
        assert!(detect_breaking_changes(&issue, &tree, &ScanConfig::default())
            .unwrap()
            .is_empty());
    }
}
