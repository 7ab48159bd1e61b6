//! Entity filtering by chain name.
//!
//! Each element's `name` tag is compared, case-insensitively, against the
//! configured chain names using substring containment so that branch
//! qualifiers ("Countdown Mt Eden") still match ("Countdown"). When several
//! targets are contained in one name, the first in configured order wins;
//! overlaps are not reported.

use log::warn;

use crate::diagnostic::Diagnostic;
use crate::element::RawElement;
use crate::entity::{Entity, EntitySet};
use crate::normalise::{Classification, classify};

/// Case-insensitive substring matcher over an ordered list of chain names.
///
/// # Examples
/// ```
/// use catchment_core::ChainMatcher;
///
/// let matcher = ChainMatcher::new(["Countdown", "New World"]);
/// assert_eq!(matcher.matches("NEW WORLD Metro Queen St"), Some("new world"));
/// assert_eq!(matcher.matches("Four Square"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChainMatcher {
    targets: Vec<String>,
}

impl ChainMatcher {
    /// Build a matcher, lowercasing every target once.
    ///
    /// Targets are otherwise kept verbatim, surrounding whitespace included.
    /// Empty names are dropped since they would match every element.
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let targets = targets
            .into_iter()
            .map(|target| target.as_ref().to_lowercase())
            .filter(|target| !target.is_empty())
            .collect();
        Self { targets }
    }

    /// Return the first lowercased target contained in `name`.
    pub fn matches(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.targets
            .iter()
            .find(|target| name.contains(target.as_str()))
            .map(String::as_str)
    }

    /// Lowercased targets in configured order.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Whether no usable target was configured.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Entities kept by [`filter_entities`] and the elements it skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    /// Matched entities in source order.
    pub entities: EntitySet,
    /// Matched elements that could not become entities.
    pub diagnostics: Vec<Diagnostic>,
}

/// Keep the elements whose name matches a target chain.
///
/// Elements without tags or a `name` tag are ignored silently. Matching
/// elements that cannot be located, or that repeat an identifier, are
/// reported and skipped.
///
/// # Examples
/// ```
/// use catchment_core::{ChainMatcher, ElementId, RawElement, filter_entities};
///
/// let elements = vec![
///     RawElement::point(1, -36.88, 174.76).with_name("Countdown Mt Eden"),
///     RawElement::point(2, -36.80, 174.70).with_name("Four Square"),
/// ];
/// let outcome = filter_entities(&elements, &ChainMatcher::new(["Countdown"]));
/// assert_eq!(outcome.entities.len(), 1);
/// assert!(outcome.entities.get(&ElementId::node(1)).is_some());
/// ```
pub fn filter_entities(elements: &[RawElement], matcher: &ChainMatcher) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    for element in elements {
        let Some(name) = element.name() else {
            continue;
        };
        let Some(chain) = matcher.matches(name) else {
            continue;
        };
        let classification = classify(element);
        let Some((kind, location)) = classification.into_parts() else {
            if classification == Classification::Unclassifiable {
                outcome.record(Diagnostic::Unclassifiable {
                    id: element.id,
                    name: name.to_owned(),
                });
            }
            continue;
        };
        let entity = Entity {
            id: element.id,
            chain: chain.to_owned(),
            display_name: name.to_owned(),
            kind,
            location,
        };
        if let Err(rejected) = outcome.entities.insert(entity) {
            outcome.record(Diagnostic::DuplicateElement { id: rejected.id });
        }
    }
    outcome
}

impl FilterOutcome {
    fn record(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}
