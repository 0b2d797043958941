// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for the routing and tiering invariants.

use entrsphere_core::ChatMessage;
use entrsphere_router::{
    record_answer, Category, ContextAnalyzer, QuestionCatalog, Route, RouteClassifier,
    SignalVector, TierSelector,
};
use proptest::prelude::*;

fn weight() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), 0.0f64..10.0, (0u32..6).prop_map(f64::from)]
}

fn vector() -> impl Strategy<Value = SignalVector> {
    (weight(), weight(), weight(), weight())
        .prop_map(|(a, b, c, d)| SignalVector::from_weights(a, b, c, d))
}

/// (question index, option index or an out-of-range option) pairs.
fn answers() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0usize..5, 0usize..6), 0..20)
}

proptest! {
    #[test]
    fn weights_never_decrease(steps in answers()) {
        let catalog = QuestionCatalog::default();
        let mut signals = SignalVector::new();
        for (qi, oi) in steps {
            let question = catalog.get(qi).unwrap();
            let option_id = question
                .options
                .get(oi)
                .map(|o| o.id.clone())
                .unwrap_or_else(|| "unknown".to_string());
            let before = signals;
            let known = record_answer(&mut signals, question, &option_id);
            for c in Category::ALL {
                prop_assert!(signals[c] >= before[c]);
                prop_assert!(signals[c] >= 0.0);
            }
            if !known {
                prop_assert_eq!(signals, before);
            }
        }
    }

    #[test]
    fn weight_equals_contribution_count(steps in answers()) {
        let catalog = QuestionCatalog::default();
        let mut signals = SignalVector::new();
        let mut expected = [0.0f64; 4];
        for (qi, oi) in steps {
            let question = catalog.get(qi).unwrap();
            if let Some(option) = question.options.get(oi) {
                for c in &option.signals {
                    expected[Category::ALL.iter().position(|x| x == c).unwrap()] += 1.0;
                }
                record_answer(&mut signals, question, &option.id);
            }
        }
        for (i, c) in Category::ALL.iter().enumerate() {
            prop_assert_eq!(signals[*c], expected[i]);
        }
    }

    #[test]
    fn route_resolution_is_total_and_deterministic(v in vector()) {
        let classifier = RouteClassifier::default();
        let first = classifier.resolve(&v);
        prop_assert_eq!(first, classifier.resolve(&v));
        prop_assert!(matches!(first, Route::A | Route::B | Route::C | Route::D));
    }

    #[test]
    fn two_more_c_signals_always_win(v in vector()) {
        let mut boosted = v;
        boosted.add(Category::C, 2.0);
        prop_assert_eq!(RouteClassifier::default().resolve(&boosted), Route::C);
    }

    #[test]
    fn tier_selection_is_deterministic(
        v in vector(),
        lines in prop::collection::vec("[a-z ]{0,40}", 0..12),
    ) {
        let history: Vec<ChatMessage> = lines.into_iter().map(ChatMessage::user).collect();
        let analyzer = ContextAnalyzer::default();
        let selector = TierSelector::default();
        let first = analyzer.analyze(&history, &v);
        let second = analyzer.analyze(&history, &v);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(selector.select(&first), selector.select(&second));
        prop_assert_eq!(first.turn_count, history.len());
    }
}
