// crates/testcorpus-core/src/runtime/patch.rs
// ============================================================================
// Module: Pattern Report Patcher
// Description: Regex rules that rewrite numbers embedded in report text.
// Purpose: Keep human-maintained reports in sync with the latest summary.
// Dependencies: regex, crate::interfaces
// ============================================================================

//! ## Overview
//! Each [`PatchRule`] pairs a summary field with a regex holding exactly one
//! capture group around the number to maintain. The patcher applies rules in
//! order to the first match only, replaces the captured digits when they
//! differ from the summary, and reports every change. The text is never
//! written here; persisting is the caller's decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;

use crate::CorpusError;
use crate::core::CategorySet;
use crate::core::Summary;
use crate::interfaces::Classifier;
use crate::interfaces::PatchChange;
use crate::interfaces::PatchField;
use crate::interfaces::PatchOutcome;
use crate::interfaces::ReportPatcher;
use crate::runtime::classify::FEATURE_STRUCTURE;

// ============================================================================
// SECTION: Default Patterns
// ============================================================================

/// Grand-total sentence used by keyword reports.
const TOTAL_TESTS_PATTERN: &str = r"includes \*\*(\d+) test cases\*\* total:";

// ============================================================================
// SECTION: Rules
// ============================================================================

/// One report rule.
#[derive(Debug, Clone)]
pub struct PatchRule {
    /// Summary field written into the capture group.
    pub field: PatchField,
    /// Compiled pattern with one capture group.
    pub pattern: Regex,
}

impl PatchRule {
    /// Compiles a rule.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Pattern`] when the regex is invalid or does not
    /// have exactly one capture group.
    pub fn new(field: PatchField, pattern: &str) -> Result<Self, CorpusError> {
        let pattern = Regex::new(pattern)
            .map_err(|err| CorpusError::Pattern(format!("{field}: {err}")))?;
        if pattern.captures_len() != 2 {
            return Err(CorpusError::Pattern(format!(
                "{field}: pattern must have exactly one capture group"
            )));
        }
        Ok(Self {
            field,
            pattern,
        })
    }
}

// ============================================================================
// SECTION: Patcher
// ============================================================================

/// Ordered regex rules applied to report text.
#[derive(Debug, Clone)]
pub struct PatternReportPatcher {
    /// Rules in application order.
    rules: Vec<PatchRule>,
}

impl PatternReportPatcher {
    /// Builds a patcher, checking category fields against the set.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Pattern`] when a rule targets an unknown
    /// category.
    pub fn new(rules: Vec<PatchRule>, categories: &CategorySet) -> Result<Self, CorpusError> {
        for rule in &rules {
            if let PatchField::Category(key) = &rule.field
                && !categories.contains(key)
            {
                return Err(CorpusError::Pattern(format!("unknown category in rule: {key}")));
            }
        }
        Ok(Self {
            rules,
        })
    }

    /// Builds the default rules for a classifier's structure.
    ///
    /// Keyword reports use `includes **N test cases** total:` and
    /// `### <Label> (N tests)` headings; feature reports use
    /// `**<Label>** (N tests)` entries. The `other` category has no rule.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Pattern`] when a generated pattern is invalid.
    pub fn defaults_for(classifier: &dyn Classifier) -> Result<Self, CorpusError> {
        let categories = classifier.categories();
        let feature_style = classifier.structure() == FEATURE_STRUCTURE;
        let mut rules = Vec::new();
        if !feature_style {
            rules.push(PatchRule::new(PatchField::TotalTests, TOTAL_TESTS_PATTERN)?);
        }
        for definition in categories.iter().filter(|definition| !definition.key.is_other()) {
            let label = regex::escape(&definition.label);
            let pattern = if feature_style {
                format!(r"\*\*{label}\*\* \((\d+) tests\)")
            } else {
                format!(r"### {label} \((\d+) tests\)")
            };
            rules.push(PatchRule::new(PatchField::Category(definition.key.clone()), &pattern)?);
        }
        Self::new(rules, categories)
    }

    /// Returns the rules in application order.
    #[must_use]
    pub fn rules(&self) -> &[PatchRule] {
        &self.rules
    }
}

impl ReportPatcher for PatternReportPatcher {
    fn patch(&self, text: &str, summary: &Summary) -> Result<PatchOutcome, CorpusError> {
        let mut patched = text.to_string();
        let mut changes = Vec::new();
        let mut unmatched = Vec::new();
        for rule in &self.rules {
            let Some(value) = rule.field.value(summary) else {
                return Err(CorpusError::Pattern(format!(
                    "summary has no value for {}",
                    rule.field
                )));
            };
            let Some(group) = rule.pattern.captures(&patched).and_then(|captures| captures.get(1))
            else {
                unmatched.push(rule.field.clone());
                continue;
            };
            let current = value.to_string();
            if group.as_str() == current {
                continue;
            }
            let previous = group.as_str().to_string();
            let range = group.range();
            patched.replace_range(range, &current);
            changes.push(PatchChange {
                field: rule.field.clone(),
                previous,
                current: value,
            });
        }
        Ok(PatchOutcome {
            text: patched,
            changes,
            unmatched,
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
