// crates/directive-gate-core/src/runtime/registry.rs
// ============================================================================
// Module: Directive Gate Directive Registry
// Description: Intent-to-directive resolution with deterministic ordering.
// Purpose: Map classified intent and keywords to an ordered directive list.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Resolution unions the primary scenario group (the pain signal's group when
//! one exists, otherwise the decision type's group) with every group and
//! directive whose triggers match an intent keyword. The union is closed over
//! prerequisites and ordered topologically over prerequisite edges and the
//! matched groups' declared sequences. Ties break by declared catalog order.
//!
//! Resolution fails with `AmbiguousIntent` when nothing matches, or when two
//! matched groups declare opposite orders for the same pair of directives.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::core::DecisionError;
use crate::core::DecisionType;
use crate::core::DirectiveCatalog;
use crate::core::DirectiveId;
use crate::core::PainSignal;
use crate::core::ScenarioId;
use crate::core::ScenarioSpec;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// The single clarifying question asked on ambiguous intent.
pub const CLARIFYING_QUESTION: &str = "Which best matches what you're deciding right now?";

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Ordered directive list plus the groups that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Contributing scenario groups, primary first.
    pub scenarios: Vec<ScenarioId>,
    /// Directives in execution order.
    pub directives: Vec<DirectiveId>,
}

// ============================================================================
// SECTION: Directive Registry
// ============================================================================

/// Static, read-only directive registry.
///
/// # Invariants
/// - The catalog is validated and never mutated after construction.
#[derive(Debug, Clone)]
pub struct DirectiveRegistry {
    /// Validated catalog.
    catalog: DirectiveCatalog,
}

impl DirectiveRegistry {
    /// Wraps a validated catalog.
    #[must_use]
    pub const fn new(catalog: DirectiveCatalog) -> Self {
        Self {
            catalog,
        }
    }

    /// Returns the underlying catalog.
    #[must_use]
    pub const fn catalog(&self) -> &DirectiveCatalog {
        &self.catalog
    }

    /// Resolves intent into an ordered directive list.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::AmbiguousIntent`] when no group or directive
    /// matches, or when matched groups disagree on relative order.
    pub fn resolve(
        &self,
        decision_type: Option<DecisionType>,
        pain_signal: Option<PainSignal>,
        intent_keywords: &[String],
    ) -> Result<Resolution, DecisionError> {
        let keywords = normalize_keywords(intent_keywords);
        let groups = self.matched_groups(decision_type, pain_signal, &keywords);
        let keyword_directives: Vec<&DirectiveId> = self
            .catalog
            .directives()
            .iter()
            .filter(|directive| matches_any(&directive.triggers, &keywords))
            .map(|directive| &directive.id)
            .collect();
        if groups.is_empty() && keyword_directives.is_empty() {
            return Err(clarifying_question());
        }
        if has_order_conflict(&groups) {
            return Err(clarifying_question());
        }

        let mut selected: BTreeSet<DirectiveId> = BTreeSet::new();
        for directive in groups.iter().flat_map(|group| &group.directives).chain(keyword_directives) {
            selected.insert(directive.clone());
            selected.extend(self.catalog.transitive_prerequisites(directive));
        }

        let directives = self.order(&selected, &groups).ok_or_else(clarifying_question)?;
        Ok(Resolution {
            scenarios: groups.iter().map(|group| group.id.clone()).collect(),
            directives,
        })
    }

    /// Collects the primary group followed by keyword-matched groups.
    fn matched_groups(
        &self,
        decision_type: Option<DecisionType>,
        pain_signal: Option<PainSignal>,
        keywords: &[String],
    ) -> Vec<&ScenarioSpec> {
        let primary = pain_signal
            .and_then(|pain| self.catalog.scenario_for_pain(pain))
            .or_else(|| decision_type.and_then(|decision| self.catalog.scenario_for_decision(decision)));
        let mut groups: Vec<&ScenarioSpec> = primary.into_iter().collect();
        for scenario in self.catalog.scenarios() {
            if groups.iter().any(|group| group.id == scenario.id) {
                continue;
            }
            if matches_any(&scenario.triggers, keywords) {
                groups.push(scenario);
            }
        }
        groups
    }

    /// Orders the selected directives; `None` when the constraints are cyclic.
    fn order(
        &self,
        selected: &BTreeSet<DirectiveId>,
        groups: &[&ScenarioSpec],
    ) -> Option<Vec<DirectiveId>> {
        let mut successors: BTreeMap<&DirectiveId, BTreeSet<&DirectiveId>> = BTreeMap::new();
        let mut indegree: BTreeMap<&DirectiveId, usize> =
            selected.iter().map(|directive| (directive, 0)).collect();
        let mut add_edge = |from: &DirectiveId, to: &DirectiveId| -> Option<()> {
            let from = selected.get(from)?;
            let to = selected.get(to)?;
            if successors.entry(from).or_default().insert(to) {
                *indegree.get_mut(to)? += 1;
            }
            Some(())
        };

        for directive in selected {
            let spec = self.catalog.get(directive)?;
            for prerequisite in &spec.prerequisites {
                add_edge(prerequisite, directive)?;
            }
        }
        for group in groups {
            for pair in group.directives.windows(2) {
                if let [before, after] = pair {
                    add_edge(before, after)?;
                }
            }
        }

        let mut ready: BTreeSet<(usize, &DirectiveId)> = BTreeSet::new();
        for (directive, degree) in &indegree {
            if *degree == 0 {
                ready.insert((self.catalog.rank(directive)?, *directive));
            }
        }
        let mut ordered = Vec::with_capacity(selected.len());
        while let Some(next) = ready.pop_first() {
            let (_, directive) = next;
            ordered.push(directive.clone());
            for successor in successors.get(directive).into_iter().flatten() {
                let degree = indegree.get_mut(successor)?;
                *degree -= 1;
                if *degree == 0 {
                    ready.insert((self.catalog.rank(successor)?, *successor));
                }
            }
        }
        (ordered.len() == selected.len()).then_some(ordered)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the single clarifying question over all decision types.
#[must_use]
pub fn clarifying_question() -> DecisionError {
    DecisionError::AmbiguousIntent {
        question: CLARIFYING_QUESTION.to_string(),
        options: DecisionType::ALL.iter().map(|decision| decision.option_label().to_string()).collect(),
    }
}

/// Lowercases and trims keywords, dropping empties.
fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

/// Case-insensitive substring match in either direction.
fn matches_any(triggers: &[String], keywords: &[String]) -> bool {
    triggers.iter().any(|trigger| {
        let trigger = trigger.trim().to_lowercase();
        !trigger.is_empty()
            && keywords
                .iter()
                .any(|keyword| keyword.contains(&trigger) || trigger.contains(keyword.as_str()))
    })
}

/// Returns true when two groups order a shared pair of directives differently.
fn has_order_conflict(groups: &[&ScenarioSpec]) -> bool {
    let positions: Vec<BTreeMap<&DirectiveId, usize>> = groups
        .iter()
        .map(|group| group.directives.iter().enumerate().map(|(index, id)| (id, index)).collect())
        .collect();
    for (index, left) in positions.iter().enumerate() {
        for right in positions.iter().skip(index + 1) {
            let shared: Vec<&&DirectiveId> = left.keys().filter(|id| right.contains_key(*id)).collect();
            for (a_index, a) in shared.iter().enumerate() {
                for b in shared.iter().skip(a_index + 1) {
                    let (Some(la), Some(lb), Some(ra), Some(rb)) =
                        (left.get(**a), left.get(**b), right.get(**a), right.get(**b))
                    else {
                        continue;
                    };
                    if (la < lb) != (ra < rb) {
                        return true;
                    }
                }
            }
        }
    }
    false
}
