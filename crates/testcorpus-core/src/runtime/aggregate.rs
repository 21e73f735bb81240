// crates/testcorpus-core/src/runtime/aggregate.rs
// ============================================================================
// Module: Corpus Aggregator
// Description: Folds container record counts into a category summary.
// Purpose: Produce reproducible statistics for reports.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The aggregator visits containers in lexicographic location order, skips
//! those without records, classifies the rest, and adds each record count to
//! its category. It cannot fail once given loaded containers; load failures
//! are handled upstream by the reader's skip policy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::Container;
use crate::core::Summary;
use crate::interfaces::Classifier;
use crate::interfaces::CorpusEvent;
use crate::interfaces::EVENT_NAME_COLLISION;
use crate::interfaces::EventLevel;
use crate::interfaces::EventSink;

// ============================================================================
// SECTION: Aggregator
// ============================================================================

/// Aggregates containers under one classification strategy.
pub struct Aggregator<'a> {
    /// Active classification strategy.
    classifier: &'a dyn Classifier,
    /// Destination for collision events.
    sink: &'a dyn EventSink,
}

impl<'a> Aggregator<'a> {
    /// Creates an aggregator.
    #[must_use]
    pub const fn new(classifier: &'a dyn Classifier, sink: &'a dyn EventSink) -> Self {
        Self {
            classifier,
            sink,
        }
    }

    /// Builds a summary from the given containers.
    ///
    /// Input order does not matter; containers are visited by location.
    #[must_use]
    pub fn aggregate(&self, containers: &[Container]) -> Summary {
        let mut ordered: Vec<&Container> = containers.iter().collect();
        ordered.sort_by(|left, right| left.location.cmp(&right.location));
        let mut summary = Summary::new(self.classifier.structure(), self.classifier.categories());
        let mut seen = BTreeSet::new();
        for container in ordered {
            let count = container.len();
            if count == 0 {
                continue;
            }
            if !seen.insert(container.name.as_str()) {
                self.sink.record(
                    &CorpusEvent::new(EVENT_NAME_COLLISION, EventLevel::Warn)
                        .with_container(container.location.display().to_string())
                        .with_detail(format!("name {} already counted", container.name))
                        .with_count(count),
                );
            }
            let category = self.classifier.classify(container);
            summary.add_container(&category, &container.name, count);
        }
        summary
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, reason = "Unit tests use expect for setup clarity.")]

    use serde_json::json;

    use super::Aggregator;
    use crate::core::CategoryKey;
    use crate::core::Container;
    use crate::core::Record;
    use crate::interfaces::EVENT_NAME_COLLISION;
    use crate::runtime::classify::FeatureClassifier;
    use crate::runtime::classify::KeywordClassifier;
    use crate::runtime::sinks::MemoryEventSink;
    use crate::runtime::sinks::NoopEventSink;

    /// Builds `count` records tagged with a feature.
    fn records(feature: &str, count: usize) -> Vec<Record> {
        (0 .. count).map(|_| Record::new(json!({"meta": {"feature": feature}}))).collect()
    }

    #[test]
    fn feature_scenario_totals() {
        let classifier = FeatureClassifier::with_defaults().expect("classifier");
        let containers = vec![
            Container::new("basics.json").with_records(records("parsing", 3)),
            Container::new("errors.json").with_records(records("error-handling", 2)),
        ];
        let summary = Aggregator::new(&classifier, &NoopEventSink).aggregate(&containers);
        assert_eq!(summary.category_total(&CategoryKey::new("core-parsing")), 3);
        assert_eq!(summary.category_total(&CategoryKey::new("output-validation")), 2);
        assert_eq!(summary.total_tests, 5);
        assert_eq!(summary.total_files, 2);
    }

    #[test]
    fn empty_containers_do_not_count_as_files() {
        let classifier = KeywordClassifier::with_defaults().expect("classifier");
        let containers = vec![Container::new("core.json"), Container::new("basic.json")];
        let summary = Aggregator::new(&classifier, &NoopEventSink).aggregate(&containers);
        assert_eq!(summary.total_files, 0);
        assert_eq!(summary.total_tests, 0);
    }

    #[test]
    fn duplicate_names_merge_and_emit_event() {
        let classifier = KeywordClassifier::with_defaults().expect("classifier");
        let containers = vec![
            Container::new("a/core.json").with_records(records("x", 2)),
            Container::new("b/core.json").with_records(records("x", 1)),
        ];
        let sink = MemoryEventSink::new();
        let summary = Aggregator::new(&classifier, &sink).aggregate(&containers);
        let tally = summary.category(&CategoryKey::new("core")).expect("core");
        assert_eq!(tally.files.get("core"), Some(&3));
        assert_eq!(summary.total_tests, 3);
        assert_eq!(sink.count(EVENT_NAME_COLLISION), 1);
    }

    #[test]
    fn aggregation_is_order_independent_and_idempotent() {
        let classifier = KeywordClassifier::with_defaults().expect("classifier");
        let forward = vec![
            Container::new("core.json").with_records(records("x", 1)),
            Container::new("pretty.json").with_records(records("x", 4)),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();
        let aggregator = Aggregator::new(&classifier, &NoopEventSink);
        let first = aggregator.aggregate(&forward).to_json_bytes().expect("render");
        let second = aggregator.aggregate(&reversed).to_json_bytes().expect("render");
        assert_eq!(first, second);
    }
}
