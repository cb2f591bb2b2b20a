//! Property-based tests for graph validation and trigger resolution.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated graphs.

use proptest::prelude::*;
use std::collections::HashSet;
use waystate::core::{State, Transition};
use waystate::engine::StateManager;
use waystate::validation::{validate, ValidationError};

/// A flat chain `s0 (start), s1, .., sn` where every state is reachable by an
/// action from the start, plus forward-only triggers with fixed outcomes.
#[derive(Clone, Debug)]
struct Chain {
    len: usize,
    triggers: Vec<(usize, usize, bool)>,
}

impl Chain {
    fn states(&self) -> Vec<State> {
        (0..self.len)
            .map(|i| {
                if i == 0 {
                    State::start("s0")
                } else {
                    State::plain(format!("s{i}"))
                }
            })
            .collect()
    }

    fn transitions(&self) -> Vec<Transition> {
        let actions = (1..self.len)
            .map(|i| Transition::action(format!("enter{i}"), ["s0"], format!("s{i}")));
        let triggers = self.triggers.iter().enumerate().map(|(n, &(from, to, fires))| {
            Transition::trigger(
                format!("t{n}"),
                format!("s{from}"),
                format!("s{to}"),
                move || fires,
            )
        });
        actions.chain(triggers).collect()
    }

    fn manager(&self) -> StateManager {
        StateManager::new(self.states(), self.transitions())
    }
}

prop_compose! {
    fn arbitrary_chain()(len in 2..8usize)
        (triggers in prop::collection::vec((0..len, 0..len, any::<bool>()), 0..12), len in Just(len))
        -> Chain
    {
        let triggers = triggers
            .into_iter()
            .filter_map(|(a, b, fires)| match a.cmp(&b) {
                std::cmp::Ordering::Less => Some((a, b, fires)),
                std::cmp::Ordering::Greater => Some((b, a, fires)),
                std::cmp::Ordering::Equal => None,
            })
            .collect();
        Chain { len, triggers }
    }
}

proptest! {
    #[test]
    fn exactly_one_top_level_start_is_required(top in 0..3usize, nested in 0..3usize) {
        let mut states: Vec<State> = (0..top).map(|i| State::start(format!("top{i}"))).collect();
        let mut members: Vec<State> = (0..nested).map(|i| State::start(format!("nested{i}"))).collect();
        members.push(State::plain("member"));
        states.push(State::group("g", members));
        let transitions = vec![Transition::action("stay", ["member"], "member")];

        let result = validate(states, transitions);

        match (top + nested, nested) {
            (0, _) => prop_assert_eq!(result.unwrap_err(), ValidationError::MissingStartState),
            (1, 0) => prop_assert!(result.is_ok()),
            (1, _) => prop_assert_eq!(
                result.unwrap_err(),
                ValidationError::NestedStartState { state: "nested0".into(), group: "g".into() }
            ),
            (total, _) => match result {
                Err(ValidationError::MultipleStartStates(ids)) => prop_assert_eq!(ids.len(), total),
                other => prop_assert!(false, "expected multiple starts, got {:?}", other.err()),
            },
        }
    }

    #[test]
    fn duplicate_state_ids_are_rejected(count in 1..6usize, pick in any::<prop::sample::Index>()) {
        let dup = format!("x{}", pick.index(count));
        let members: Vec<State> = (0..count).map(|i| State::plain(format!("x{i}"))).collect();
        let states = vec![
            State::start("start"),
            State::group("g", members),
            State::plain(dup.clone()),
        ];
        let transitions: Vec<Transition> = (0..count)
            .map(|i| Transition::action(format!("to{i}"), ["start"], format!("x{i}")))
            .collect();

        prop_assert_eq!(
            validate(states, transitions).unwrap_err(),
            ValidationError::DuplicateState(dup.into())
        );
    }

    #[test]
    fn declared_id_colliding_with_fallback_is_rejected(count in 1..5usize, pick in any::<prop::sample::Index>()) {
        let clash = pick.index(count);
        let mut states = vec![State::start("start")];
        states.extend((0..count).map(|i| State::plain(format!("c{i}")).when(|| true, "start")));
        let mut transitions: Vec<Transition> = (0..count)
            .map(|i| Transition::action(format!("to{i}"), ["start"], format!("c{i}")))
            .collect();
        transitions.push(Transition::action(format!("c{clash}::fallback"), ["start"], "c0"));

        prop_assert_eq!(
            validate(states, transitions).unwrap_err(),
            ValidationError::DuplicateTransition(format!("c{clash}::fallback").into())
        );
    }

    #[test]
    fn targeting_any_group_is_rejected(depth in 1..5usize, pick in any::<prop::sample::Index>(), known_source in any::<bool>()) {
        let mut nested = State::plain("leaf");
        for level in (0..depth).rev() {
            nested = State::group(format!("g{level}"), vec![nested]);
        }
        let target = format!("g{}", pick.index(depth));
        let source = if known_source { "start" } else { "ghost" };
        let states = vec![State::start("start"), nested];
        let transitions = vec![
            Transition::action("enter", ["start"], "leaf"),
            Transition::action("bad", [source], target.clone()),
        ];

        prop_assert_eq!(
            validate(states, transitions).unwrap_err(),
            ValidationError::GroupTarget { transition: "bad".into(), target: target.into() }
        );
    }

    #[test]
    fn first_untargeted_state_is_unreachable(reached in prop::collection::vec(any::<bool>(), 1..8)) {
        let mut states = vec![State::start("start")];
        states.extend((0..reached.len()).map(|i| State::plain(format!("p{i}"))));
        let transitions: Vec<Transition> = reached
            .iter()
            .enumerate()
            .filter(|(_, &hit)| hit)
            .map(|(i, _)| Transition::action(format!("to{i}"), ["start"], format!("p{i}")))
            .collect();

        let result = validate(states, transitions);

        match reached.iter().position(|&hit| !hit) {
            None => prop_assert!(result.is_ok()),
            Some(first) => prop_assert_eq!(
                result.unwrap_err(),
                ValidationError::UnreachableState(format!("p{first}").into())
            ),
        }
    }

    #[test]
    fn resolution_is_deterministic(chain in arbitrary_chain()) {
        let mut first = chain.manager();
        let mut second = chain.manager();
        first.initialize().unwrap();
        second.initialize().unwrap();

        prop_assert_eq!(first.current_id(), second.current_id());
        prop_assert!(!first.reevaluate().unwrap());
        prop_assert_eq!(first.current_id(), second.current_id());
    }

    #[test]
    fn settled_state_has_no_firing_trigger(chain in arbitrary_chain()) {
        let mut manager = chain.manager();
        manager.initialize().unwrap();
        let current = manager.current_id().unwrap().clone();

        let firing: HashSet<String> = chain
            .triggers
            .iter()
            .filter(|&&(_, _, fires)| fires)
            .map(|&(from, _, _)| format!("s{from}"))
            .collect();
        prop_assert!(!firing.contains(current.as_str()));
    }

    #[test]
    fn attempt_to_current_state_changes_nothing(chain in arbitrary_chain()) {
        let quiet = Chain {
            len: chain.len,
            triggers: chain.triggers.iter().map(|&(a, b, _)| (a, b, false)).collect(),
        };
        let mut manager = quiet.manager();
        manager.initialize().unwrap();
        let before = manager.current_id().unwrap().clone();

        prop_assert!(!manager.attempt_transition(before.as_str()).unwrap());
        prop_assert_eq!(manager.current_id().unwrap(), &before);
    }
}
