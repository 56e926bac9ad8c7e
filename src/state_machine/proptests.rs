//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_state() -> impl Strategy<Value = ConvState> {
    prop::sample::select(ConvState::ALL.to_vec())
}

fn arb_intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        Just(Intent::Greet),
        Just(Intent::RequestForward),
        Just(Intent::Depart),
        Just(Intent::Unrecognized),
        "[A-Za-z][A-Za-z ]{0,20}".prop_map(Intent::NameText),
    ]
}

/// Free text, including keywords in odd casing and padding
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ \t]{0,3}(hi|HI|Hi|forward|FORWARD|left|Left)[ \t\n]{0,3}",
        "[A-Za-z0-9 ]{0,30}",
    ]
}

fn rank(state: ConvState) -> u8 {
    match state {
        ConvState::New => 0,
        ConvState::AwaitingName => 1,
        ConvState::AwaitingAction => 2,
        ConvState::Forwarded | ConvState::Left => 3,
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_transition_is_deterministic(state in arb_state(), intent in arb_intent()) {
        let a = transition(state, intent.clone());
        let b = transition(state, intent);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_terminal_states_absorb_everything(state in arb_state(), intent in arb_intent()) {
        prop_assume!(state.is_terminal());
        let result = transition(state, intent);
        prop_assert_eq!(result.new_state, state);
        prop_assert_eq!(result.captured_name, None);
    }

    #[test]
    fn prop_progression_never_moves_backwards(state in arb_state(), intent in arb_intent()) {
        let result = transition(state, intent);
        prop_assert!(rank(result.new_state) >= rank(state));
        prop_assert!(rank(result.new_state) <= rank(state) + 1);
    }

    #[test]
    fn prop_name_is_captured_exactly_on_name_transition(state in arb_state(), intent in arb_intent()) {
        let result = transition(state, intent.clone());
        let expected = state == ConvState::AwaitingName && matches!(intent, Intent::NameText(_));
        prop_assert_eq!(result.captured_name.is_some(), expected);
        if expected {
            prop_assert_eq!(result.new_state, ConvState::AwaitingAction);
        }
    }

    #[test]
    fn prop_classify_then_transition_keeps_name_invariant(
        texts in proptest::collection::vec(arb_text(), 0..12)
    ) {
        let classifier = Classifier::default();
        let mut state = ConvState::New;
        let mut captured: Option<String> = None;

        for text in texts {
            let intent = classifier.classify(&text, state);
            let result = transition(state, intent);
            if let Some(name) = result.captured_name {
                prop_assert!(captured.is_none(), "name captured twice");
                prop_assert!(!name.is_empty());
                captured = Some(name);
            }
            state = result.new_state;
            prop_assert_eq!(captured.is_some(), state.has_captured_name());
        }
    }

    #[test]
    fn prop_classification_ignores_case_and_padding(state in arb_state(), word in "(hi|forward|left)") {
        let classifier = Classifier::default();
        let padded = format!("  {}\t", word.to_uppercase());
        prop_assert_eq!(classifier.classify(&padded, state), classifier.classify(&word, state));
    }
}
