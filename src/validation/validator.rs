//! One-shot structural checks over a declared state graph.

use super::error::ValidationError;
use crate::core::{State, StateId, Transition};
use crate::graph::Graph;
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, warn};

/// Check the declarations and, if they are sound, flatten them into a
/// [`Graph`].
///
/// Checks run in a fixed order and the first error found is returned:
///
/// 1. state IDs are unique (depth-first, groups before their children)
/// 2. declared transition IDs are unique
/// 3. synthesized fallback transition IDs do not collide with any other
/// 4. no transition targets a group, then every source and target exists
/// 5. exactly one start state exists, at the top level
/// 6. every non-group, non-start state is the target of some transition
///
/// Nothing is built unless every check passes.
pub fn validate(states: Vec<State>, transitions: Vec<Transition>) -> Result<Graph, ValidationError> {
    let findings = inspect(&states, &transitions);
    if let Some(error) = findings.errors.into_iter().next() {
        warn!(%error, "state graph failed validation");
        return Err(error);
    }

    let mut all = transitions;
    all.extend(findings.fallbacks);
    let graph = Graph::assemble(states, all)?;
    debug!(
        states = graph.states().len(),
        transitions = graph.transitions().len(),
        start = %graph.start().id(),
        "state graph validated"
    );
    Ok(graph)
}

/// Run every check and accumulate ALL errors instead of stopping at the first.
///
/// The first accumulated error is always the one [`validate`] reports.
///
/// # Example
///
/// ```rust
/// use waystate::core::{State, Transition};
/// use waystate::validation::diagnose;
/// use stillwater::validation::Validation;
///
/// let states = vec![State::plain("orphan"), State::plain("orphan")];
/// let transitions: Vec<Transition> = Vec::new();
///
/// match diagnose(&states, &transitions) {
///     Validation::Failure(errors) => assert_eq!(errors.len(), 3),
///     Validation::Success(_) => unreachable!(),
/// }
/// ```
pub fn diagnose(
    states: &[State],
    transitions: &[Transition],
) -> Validation<(), NonEmptyVec<ValidationError>> {
    let checks: Vec<Validation<(), NonEmptyVec<ValidationError>>> = inspect(states, transitions)
        .errors
        .into_iter()
        .map(|error| Validation::fail(error))
        .collect();

    Validation::all_vec(checks).map(|_| ())
}

struct Findings {
    errors: Vec<ValidationError>,
    fallbacks: Vec<Transition>,
}

struct Flat<'a> {
    state: &'a State,
    parent: Option<&'a StateId>,
}

fn inspect(states: &[State], transitions: &[Transition]) -> Findings {
    let mut errors = Vec::new();

    let mut flat = Vec::new();
    let mut by_id = HashMap::new();
    flatten(states, None, &mut flat, &mut by_id, &mut errors);

    let mut seen = HashSet::new();
    let mut merged: Vec<&Transition> = Vec::new();
    for transition in transitions {
        if seen.insert(transition.id()) {
            merged.push(transition);
        } else {
            errors.push(ValidationError::DuplicateTransition(transition.id().clone()));
        }
    }

    let fallbacks: Vec<Transition> = flat
        .iter()
        .filter_map(|entry| Transition::fallback_for(entry.state))
        .collect();
    for fallback in &fallbacks {
        if seen.insert(fallback.id()) {
            merged.push(fallback);
        } else {
            errors.push(ValidationError::DuplicateTransition(fallback.id().clone()));
        }
    }

    for transition in &merged {
        let target = transition.target();
        if by_id.get(target.as_str()).is_some_and(|state: &&State| state.is_group()) {
            errors.push(ValidationError::GroupTarget {
                transition: transition.id().clone(),
                target: target.clone(),
            });
        }
    }

    for transition in &merged {
        if transition.sources().is_empty() {
            errors.push(ValidationError::NoSources(transition.id().clone()));
        }
        let referenced = transition
            .sources()
            .iter()
            .chain(std::iter::once(transition.target()));
        for id in referenced {
            if !by_id.contains_key(id.as_str()) {
                errors.push(ValidationError::UnknownState {
                    transition: transition.id().clone(),
                    state: id.clone(),
                });
            }
        }
    }

    let starts: Vec<&Flat> = flat.iter().filter(|entry| entry.state.is_start()).collect();
    match starts.as_slice() {
        [] => errors.push(ValidationError::MissingStartState),
        [only] => {
            if let Some(group) = only.parent {
                errors.push(ValidationError::NestedStartState {
                    state: only.state.id().clone(),
                    group: group.clone(),
                });
            }
        }
        many => errors.push(ValidationError::MultipleStartStates(
            many.iter().map(|entry| entry.state.id().clone()).collect(),
        )),
    }

    let targets: HashSet<&str> = merged.iter().map(|t| t.target().as_str()).collect();
    for entry in &flat {
        let state = entry.state;
        if !state.is_group() && !state.is_start() && !targets.contains(state.id().as_str()) {
            errors.push(ValidationError::UnreachableState(state.id().clone()));
        }
    }

    Findings { errors, fallbacks }
}

fn flatten<'a>(
    states: &'a [State],
    parent: Option<&'a StateId>,
    flat: &mut Vec<Flat<'a>>,
    by_id: &mut HashMap<&'a str, &'a State>,
    errors: &mut Vec<ValidationError>,
) {
    for state in states {
        if by_id.contains_key(state.id().as_str()) {
            errors.push(ValidationError::DuplicateState(state.id().clone()));
        } else {
            by_id.insert(state.id().as_str(), state);
            flat.push(Flat { state, parent });
        }
        flatten(state.children(), Some(state.id()), flat, by_id, errors);
    }
}
