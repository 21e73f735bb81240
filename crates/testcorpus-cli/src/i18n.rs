// crates/testcorpus-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Keep every CLI line translatable and consistently worded.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! Every line the `testcorpus` CLI prints comes from a small translation
//! catalog keyed by dotted message names. Engine diagnostics are passed
//! through as `{error}` arguments and are not translated.
//! All runtime output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - Variants are stable for CLI parsing and catalog lookup.
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "ca" => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
///
/// # Invariants
/// - Ordering is stable for deterministic presentation.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
/// - `value` is preformatted and should be safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries loaded into the localized message bundle.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "testcorpus {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.render_failed", "Failed to render output: {error}"),
    ("input.read_too_large", "Refusing to read {path} because it is {size} bytes (limit {limit})."),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid: {path}"),
    ("config.validate.defaults", "No config file found; built-in defaults are valid."),
    ("corpus.open_failed", "Failed to open corpus root {path}: {error}"),
    ("corpus.load_failed", "Failed to load corpus: {error}"),
    ("events.open_failed", "Failed to open event log {path}: {error}"),
    ("stats.header", "Corpus summary ({structure}):"),
    ("stats.category", "  {label}: {tests} tests in {files} files"),
    ("stats.total", "Total: {tests} tests in {files} files"),
    ("stats.skipped", "Skipped {count} unreadable containers."),
    ("stats.digest", "Summary digest: {digest}"),
    ("report.read_failed", "Failed to read report {path}: {error}"),
    ("report.write_failed", "Failed to write report {path}: {error}"),
    ("report.missing_file_name", "path has no file name"),
    ("report.patch_failed", "Failed to patch report: {error}"),
    ("report.change", "  {field}: {previous} -> {current}"),
    ("report.unmatched", "Report pattern for {field} not found."),
    ("report.up_to_date", "Report {path} is up to date."),
    ("report.updated", "Updated {count} counts in {path}."),
    ("report.stale", "Report {path} is stale ({count} counts differ)."),
    ("variants.plan_failed", "Failed to plan variant move: {error}"),
    ("variants.commit_failed", "Failed to apply variant move: {error}"),
    ("variants.write", "write  {path} ({records} records)"),
    ("variants.remove", "remove {path}"),
    (
        "variants.dropped",
        "Dropping {count} records from {container}: only unrequested variant tags.",
    ),
    (
        "variants.schema_mismatch",
        "Schema mismatch in {container}: expected {expected}, found {found}.",
    ),
    ("variants.dry_run", "Dry run; no files changed. Plan manifest:"),
    ("variants.nothing_to_do", "Nothing to move."),
    ("variants.retained", "Kept directory {path}: it still holds other files."),
    ("variants.committed", "Wrote {written} files, removed {files} files and {dirs} directories."),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Static Catalan catalog entries loaded into the localized message bundle.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "testcorpus {version}"),
    ("output.stream.stdout", "sortida estàndard"),
    ("output.stream.stderr", "sortida d'error"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    ("output.render_failed", "No s'ha pogut generar la sortida: {error}"),
    ("input.read_too_large", "No es llegirà {path} perquè té {size} bytes (límit {limit})."),
    ("config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    ("config.validate.ok", "Configuració vàlida: {path}"),
    (
        "config.validate.defaults",
        "No s'ha trobat cap fitxer de configuració; els valors per defecte són vàlids.",
    ),
    ("corpus.open_failed", "No s'ha pogut obrir l'arrel del corpus {path}: {error}"),
    ("corpus.load_failed", "No s'ha pogut carregar el corpus: {error}"),
    ("events.open_failed", "No s'ha pogut obrir el registre d'esdeveniments {path}: {error}"),
    ("stats.header", "Resum del corpus ({structure}):"),
    ("stats.category", "  {label}: {tests} proves en {files} fitxers"),
    ("stats.total", "Total: {tests} proves en {files} fitxers"),
    ("stats.skipped", "S'han omès {count} contenidors il·legibles."),
    ("stats.digest", "Resum criptogràfic: {digest}"),
    ("report.read_failed", "No s'ha pogut llegir l'informe {path}: {error}"),
    ("report.write_failed", "No s'ha pogut escriure l'informe {path}: {error}"),
    ("report.missing_file_name", "el camí no té nom de fitxer"),
    ("report.patch_failed", "No s'ha pogut actualitzar l'informe: {error}"),
    ("report.change", "  {field}: {previous} -> {current}"),
    ("report.unmatched", "No s'ha trobat el patró de l'informe per a {field}."),
    ("report.up_to_date", "L'informe {path} està al dia."),
    ("report.updated", "S'han actualitzat {count} recomptes a {path}."),
    ("report.stale", "L'informe {path} està desfasat ({count} recomptes difereixen)."),
    ("variants.plan_failed", "No s'ha pogut planificar el moviment de variants: {error}"),
    ("variants.commit_failed", "No s'ha pogut aplicar el moviment de variants: {error}"),
    ("variants.write", "escriure {path} ({records} registres)"),
    ("variants.remove", "eliminar {path}"),
    (
        "variants.dropped",
        "Es descarten {count} registres de {container}: només tenen etiquetes de variant no \
         sol·licitades.",
    ),
    (
        "variants.schema_mismatch",
        "Esquema diferent a {container}: s'esperava {expected}, s'ha trobat {found}.",
    ),
    ("variants.dry_run", "Simulació; no s'ha modificat cap fitxer. Manifest del pla:"),
    ("variants.nothing_to_do", "No hi ha res a moure."),
    ("variants.retained", "S'ha conservat el directori {path}: encara conté altres fitxers."),
    (
        "variants.committed",
        "S'han escrit {written} fitxers i s'han eliminat {files} fitxers i {dirs} directoris.",
    ),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser \
         inexacta.",
    ),
];

/// Returns the raw catalog entries for the requested locale.
#[cfg(test)]
pub(crate) const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Ca => CATALOG_CA,
    }
}

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Ca => CATALOG_CA_MAP.get_or_init(|| CATALOG_CA.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let locale = current_locale();
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
