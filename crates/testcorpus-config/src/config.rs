// crates/testcorpus-config/src/config.rs
// ============================================================================
// Module: Test Corpus Configuration
// Description: Configuration loading and validation for the corpus tools.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: testcorpus-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Resolution order is an explicit path, then `TESTCORPUS_CONFIG`, then
//! `testcorpus.toml` in the working directory; when none applies the built-in
//! defaults are used. Unknown keys and inconsistent tables fail closed.
//! Relative paths inside the file resolve against the file's directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use testcorpus_core::CategoryDefinition;
use testcorpus_core::CategoryKey;
use testcorpus_core::CategorySet;
use testcorpus_core::Classifier;
use testcorpus_core::CorpusError;
use testcorpus_core::FeatureClassifier;
use testcorpus_core::KeywordClassifier;
use testcorpus_core::KeywordRule;
use testcorpus_core::PatchField;
use testcorpus_core::PatternReportPatcher;
use testcorpus_core::VariantLayout;
use testcorpus_core::VariantTagLayout;
use testcorpus_core::runtime::DEFAULT_EXCLUDE_SUFFIX;
use testcorpus_core::runtime::DEFAULT_EXTENSION;
use testcorpus_core::runtime::DEFAULT_FEATURE_FIELD;
use testcorpus_core::runtime::DEFAULT_MAX_CONTAINER_BYTES;
use testcorpus_core::runtime::DEFAULT_SOURCE_DIR;
use testcorpus_core::runtime::PatchRule;
use testcorpus_core::runtime::ReaderOptions;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "testcorpus.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "TESTCORPUS_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum accepted container read limit in bytes.
pub(crate) const MAX_CONTAINER_BYTES_LIMIT: usize = 256 * 1024 * 1024;
/// Maximum number of declared categories per table.
pub(crate) const MAX_CATEGORIES: usize = 64;
/// Maximum number of table rows (keyword rules or feature mappings).
pub(crate) const MAX_TABLE_ROWS: usize = 512;
/// Maximum number of excluded suffixes.
pub(crate) const MAX_EXCLUDE_SUFFIXES: usize = 32;
/// Maximum number of variant tags.
pub(crate) const MAX_VARIANT_TAGS: usize = 32;
/// Maximum number of report rules.
pub(crate) const MAX_REPORT_RULES: usize = 128;
/// Maximum length of a report pattern.
pub(crate) const MAX_PATTERN_LENGTH: usize = 4096;
/// Default report path.
const DEFAULT_REPORT_PATH: &str = "README.md";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Test corpus configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorpusConfig {
    /// Corpus discovery and read limits.
    #[serde(default)]
    pub corpus: CorpusSection,
    /// Classification strategy and tables.
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Variant directory layout.
    #[serde(default)]
    pub variants: VariantsConfig,
    /// Report file and patch rules.
    #[serde(default)]
    pub report: ReportConfig,
    /// Directory relative paths resolve against (not serialized).
    #[serde(skip)]
    pub base_dir: PathBuf,
    /// File the configuration was loaded from (not serialized).
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl CorpusConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(resolved) = resolve_path(path)? else {
            let mut config = Self::default();
            config.validate()?;
            return Ok(config);
        };
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.base_dir = resolved.parent().map(Path::to_path_buf).unwrap_or_default();
        config.source = Some(resolved);
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.corpus.validate()?;
        self.classifier.validate()?;
        self.variants.validate()?;
        self.report.validate()?;
        let classifier = self.classifier.build()?;
        self.report.patcher(classifier.as_ref())?;
        Ok(())
    }

    /// Resolves a configured path against the config file directory.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Returns the resolved corpus root.
    #[must_use]
    pub fn corpus_root(&self) -> PathBuf {
        self.resolve(&self.corpus.root)
    }

    /// Returns the resolved variants root.
    #[must_use]
    pub fn variants_root(&self) -> PathBuf {
        self.resolve(&self.variants.root)
    }

    /// Returns the resolved report path.
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        self.resolve(&self.report.path)
    }
}

// ============================================================================
// SECTION: Corpus
// ============================================================================

/// Corpus discovery configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorpusSection {
    /// Corpus root directory.
    pub root: String,
    /// Container file extension, without the dot.
    pub extension: String,
    /// File name suffixes that are never containers.
    pub exclude_suffixes: Vec<String>,
    /// Per-container read limit in bytes.
    pub max_container_bytes: usize,
}

impl Default for CorpusSection {
    fn default() -> Self {
        Self {
            root: String::from("."),
            extension: String::from(DEFAULT_EXTENSION),
            exclude_suffixes: vec![String::from(DEFAULT_EXCLUDE_SUFFIX)],
            max_container_bytes: DEFAULT_MAX_CONTAINER_BYTES,
        }
    }
}

impl CorpusSection {
    /// Validates discovery settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("corpus.root", &self.root)?;
        let extension = self.extension.trim();
        if extension.is_empty() || extension.contains(['.', '/', '\\']) {
            return Err(ConfigError::Invalid(
                "corpus.extension must be a bare extension such as \"json\"".to_string(),
            ));
        }
        if self.exclude_suffixes.len() > MAX_EXCLUDE_SUFFIXES {
            return Err(ConfigError::Invalid("too many corpus.exclude_suffixes".to_string()));
        }
        if self.exclude_suffixes.iter().any(|suffix| suffix.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "corpus.exclude_suffixes entries must be non-empty".to_string(),
            ));
        }
        if self.max_container_bytes == 0 {
            return Err(ConfigError::Invalid(
                "corpus.max_container_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_container_bytes > MAX_CONTAINER_BYTES_LIMIT {
            return Err(ConfigError::Invalid("corpus.max_container_bytes too large".to_string()));
        }
        Ok(())
    }

    /// Returns reader options for this section.
    #[must_use]
    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            extension: self.extension.trim().to_string(),
            exclude_suffixes: self.exclude_suffixes.clone(),
            max_container_bytes: self.max_container_bytes,
        }
    }
}

// ============================================================================
// SECTION: Classifier
// ============================================================================

/// Classification strategy.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// File name and description keyword matching.
    #[default]
    Keyword,
    /// First-record metadata field lookup.
    Feature,
}

/// Category declaration in a custom table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    /// Stable category key.
    pub key: String,
    /// Display label.
    pub label: String,
}

/// One keyword rule in a custom table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct KeywordRuleConfig {
    /// Category assigned on match.
    pub category: String,
    /// Substrings that select the category.
    pub keywords: Vec<String>,
}

/// One feature mapping in a custom table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FeatureMappingConfig {
    /// Feature value (normalized before lookup).
    pub feature: String,
    /// Category assigned to the feature.
    pub category: String,
}

/// Custom keyword table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeywordTableConfig {
    /// Declared categories in report order.
    pub categories: Vec<CategoryConfig>,
    /// Ordered rules; earlier rules win.
    pub rules: Vec<KeywordRuleConfig>,
}

/// Custom feature table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureTableConfig {
    /// Declared categories in report order.
    pub categories: Vec<CategoryConfig>,
    /// Feature to category mappings.
    pub mappings: Vec<FeatureMappingConfig>,
}

/// Classifier configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Active strategy.
    pub strategy: Strategy,
    /// `meta` field read by the feature strategy.
    pub feature_field: String,
    /// Optional keyword table replacing the built-in one.
    pub keyword: Option<KeywordTableConfig>,
    /// Optional feature table replacing the built-in one.
    pub feature: Option<FeatureTableConfig>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            feature_field: String::from(DEFAULT_FEATURE_FIELD),
            keyword: None,
            feature: None,
        }
    }
}

impl ClassifierConfig {
    /// Validates table sizes; consistency is checked by building.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.feature_field.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "classifier.feature_field must be non-empty".to_string(),
            ));
        }
        if let Some(table) = &self.keyword {
            validate_table_size("classifier.keyword", &table.categories, table.rules.len())?;
        }
        if let Some(table) = &self.feature {
            validate_table_size("classifier.feature", &table.categories, table.mappings.len())?;
        }
        self.build_keyword()?;
        self.build_feature()?;
        Ok(())
    }

    /// Builds the classifier for the active strategy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the active table is inconsistent.
    pub fn build(&self) -> Result<Box<dyn Classifier>, ConfigError> {
        match self.strategy {
            Strategy::Keyword => Ok(Box::new(self.build_keyword()?)),
            Strategy::Feature => Ok(Box::new(self.build_feature()?)),
        }
    }

    /// Builds the keyword classifier from the custom or built-in table.
    fn build_keyword(&self) -> Result<KeywordClassifier, ConfigError> {
        let Some(table) = &self.keyword else {
            return KeywordClassifier::with_defaults().map_err(invalid("classifier.keyword"));
        };
        let categories = category_set(&table.categories).map_err(invalid("classifier.keyword"))?;
        let rules = table
            .rules
            .iter()
            .map(|rule| KeywordRule {
                category: CategoryKey::new(rule.category.as_str()),
                keywords: rule.keywords.iter().map(|keyword| keyword.to_lowercase()).collect(),
            })
            .collect();
        KeywordClassifier::new(categories, rules).map_err(invalid("classifier.keyword"))
    }

    /// Builds the feature classifier from the custom or built-in table.
    fn build_feature(&self) -> Result<FeatureClassifier, ConfigError> {
        let field = self.feature_field.trim();
        let Some(table) = &self.feature else {
            return FeatureClassifier::with_default_table(field)
                .map_err(invalid("classifier.feature"));
        };
        let categories = category_set(&table.categories).map_err(invalid("classifier.feature"))?;
        let mappings = table
            .mappings
            .iter()
            .map(|mapping| (mapping.feature.clone(), CategoryKey::new(mapping.category.as_str())))
            .collect();
        FeatureClassifier::new(categories, field, mappings).map_err(invalid("classifier.feature"))
    }
}

// ============================================================================
// SECTION: Variants
// ============================================================================

/// Variant tag placement.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct VariantTagConfig {
    /// Variant tag name.
    pub name: String,
    /// Output directory, relative to the variants root.
    pub dir: String,
    /// Consolidated file name in the source directory (default `api_<name>.json`).
    #[serde(default)]
    pub consolidated_file: Option<String>,
}

/// Variant layout configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VariantsConfig {
    /// Variants root directory.
    pub root: String,
    /// Source directory, relative to the variants root.
    pub source_dir: String,
    /// Remove sources whose residual becomes empty.
    pub remove_empty_sources: bool,
    /// Schema used when no consolidated input carries one.
    pub default_schema: Option<String>,
    /// Tag placements in request order.
    pub tags: Vec<VariantTagConfig>,
}

impl Default for VariantsConfig {
    fn default() -> Self {
        Self {
            root: String::from("."),
            source_dir: String::from(DEFAULT_SOURCE_DIR),
            remove_empty_sources: true,
            default_schema: None,
            tags: vec![
                VariantTagConfig {
                    name: String::from("proposed_behavior"),
                    dir: String::from("proposed"),
                    consolidated_file: None,
                },
                VariantTagConfig {
                    name: String::from("reference_compliant"),
                    dir: String::from("reference"),
                    consolidated_file: None,
                },
            ],
        }
    }
}

impl VariantsConfig {
    /// Validates paths and layout consistency.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("variants.root", &self.root)?;
        validate_path_string("variants.source_dir", &self.source_dir)?;
        if self.tags.len() > MAX_VARIANT_TAGS {
            return Err(ConfigError::Invalid("too many variants.tags entries".to_string()));
        }
        for tag in &self.tags {
            validate_path_string("variants.tags.dir", &tag.dir)?;
        }
        if let Some(schema) = &self.default_schema
            && schema.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "variants.default_schema must be non-empty when set".to_string(),
            ));
        }
        self.layout()?;
        Ok(())
    }

    /// Builds and validates the variant layout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the layout is inconsistent.
    pub fn layout(&self) -> Result<VariantLayout, ConfigError> {
        let tags = self
            .tags
            .iter()
            .map(|tag| {
                let mut layout = VariantTagLayout::new(tag.name.trim(), tag.dir.trim());
                if let Some(file) = &tag.consolidated_file {
                    layout.consolidated_file = file.trim().to_string();
                }
                layout
            })
            .collect();
        let layout = VariantLayout {
            source_dir: PathBuf::from(self.source_dir.trim()),
            tags,
            default_schema: self.default_schema.clone(),
            remove_empty_sources: self.remove_empty_sources,
        };
        layout.validate().map_err(invalid("variants"))?;
        Ok(layout)
    }
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// One report patch rule.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReportRuleConfig {
    /// Field name: `total_tests`, `total_files`, or `category:<key>`.
    pub field: String,
    /// Regex with exactly one capture group around the number.
    pub pattern: String,
}

/// Report configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Report file path.
    pub path: String,
    /// Custom rules; empty selects the strategy defaults.
    pub rules: Vec<ReportRuleConfig>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: String::from(DEFAULT_REPORT_PATH),
            rules: Vec::new(),
        }
    }
}

impl ReportConfig {
    /// Validates the report path and rule limits.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("report.path", &self.path)?;
        if self.rules.len() > MAX_REPORT_RULES {
            return Err(ConfigError::Invalid("too many report.rules entries".to_string()));
        }
        if self.rules.iter().any(|rule| rule.pattern.len() > MAX_PATTERN_LENGTH) {
            return Err(ConfigError::Invalid("report.rules pattern too long".to_string()));
        }
        Ok(())
    }

    /// Builds the report patcher for a classifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a rule is malformed or targets a
    /// category the classifier does not declare.
    pub fn patcher(&self, classifier: &dyn Classifier) -> Result<PatternReportPatcher, ConfigError> {
        if self.rules.is_empty() {
            return PatternReportPatcher::defaults_for(classifier).map_err(invalid("report"));
        }
        let rules = self
            .rules
            .iter()
            .map(|rule| {
                let field: PatchField = rule.field.parse()?;
                PatchRule::new(field, &rule.pattern)
            })
            .collect::<Result<Vec<_>, CorpusError>>()
            .map_err(invalid("report.rules"))?;
        PatternReportPatcher::new(rules, classifier.categories()).map_err(invalid("report.rules"))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path; `None` selects the built-in defaults.
fn resolve_path(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default_path = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default_path.is_file().then_some(default_path))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let path = Path::new(trimmed);
    for component in path.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates custom table sizes.
fn validate_table_size(
    section: &str,
    categories: &[CategoryConfig],
    rows: usize,
) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Invalid(format!("{section}.categories must be non-empty")));
    }
    if categories.len() > MAX_CATEGORIES {
        return Err(ConfigError::Invalid(format!("too many {section}.categories entries")));
    }
    if rows > MAX_TABLE_ROWS {
        return Err(ConfigError::Invalid(format!("too many {section} rows")));
    }
    Ok(())
}

/// Builds a category set from declarations.
fn category_set(categories: &[CategoryConfig]) -> Result<CategorySet, CorpusError> {
    CategorySet::new(
        categories
            .iter()
            .map(|category| CategoryDefinition::new(category.key.trim(), category.label.trim()))
            .collect(),
    )
}

/// Maps an engine error to an invalid-config error for a section.
fn invalid(section: &'static str) -> impl Fn(CorpusError) -> ConfigError {
    move |err| ConfigError::Invalid(format!("{section}: {err}"))
}
