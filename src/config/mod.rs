//! `.preflight.toml` configuration.
//!
//! Every field has a default, so an absent or partial file is valid. The file
//! is looked up from the project root upwards, mirroring how most tools find
//! their config.

mod core;
mod loader;

pub use self::core::{
    ConsistencyConfig, DocsConfig, OutputConfig, PreflightConfig, ScanConfig, TopicsConfig,
};
pub use self::loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config,
    CONFIG_FILE_NAME,
};

/// Default config written by `preflight init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Preflight Configuration

[docs]
root = "docs"
project_file = "CLAUDE.md"
dependencies_file = "pyproject.toml"
workflow = "docs/FEATURE_BRANCH_WORKFLOW.md"
pii_masking = "docs/security/pii_masking.md"
upload_validation = "docs/validation/magika.md"
centralized_logging = "docs/infrastructure/logging.md"

[topics]
pii_symbols = ["GlobalPIIMasker", "PIIMasker", "mask_pii"]
upload_symbols = ["validate_with_magika", "magika_validate", "MagikaValidator"]
logging_symbols = ["get_logger", "CentralizedLogger", "Logger.get"]

[scan]
model_globs = ["**/models.py"]
endpoint_globs = ["**/views.py", "**/urls.py", "**/serializers.py"]
disabled_rules = []

[consistency]
pii_glob = "**/*.py"
upload_glob = "**/views.py"
logging_glob = "**/*.py"
test_markers = ["test"]
logging_exclusions = ["migration"]
route_globs = ["**/urls.py"]
implementation_glob = "**/*.py"

[output]
discrepancy_preview = 5
severity_preview = 2
"#;
