//! Property-based tests for the structural engine
//!
//! Generates balanced Clojure-like buffers and checks the invariants every
//! operation must keep: lossless lexing, balance preservation, slurp/barf
//! round trips and grow/shrink symmetry.

use paredit_core::{
    edit::{
        apply_edits, delete, kill, slurp, splice, transpose, wrap, EditOutcome, EditSelection,
        PareditMode,
    },
    is_balanced,
    navigation::ExpansionStack,
    SexpTokenizer, TokenStream,
};
use proptest::prelude::*;

type Operation = fn(&str, EditSelection) -> EditOutcome;

const OPERATIONS: &[(&str, Operation)] = &[
    ("forward_slurp", slurp::forward_slurp),
    ("backward_slurp", slurp::backward_slurp),
    ("forward_barf", slurp::forward_barf),
    ("backward_barf", slurp::backward_barf),
    ("splice", splice::splice),
    ("splice_killing_forward", splice::splice_killing_forward),
    ("splice_killing_backward", splice::splice_killing_backward),
    ("raise", splice::raise),
    ("convolute", splice::convolute),
    ("split", splice::split),
    ("kill_forward_list", kill::kill_forward_list),
    ("kill_backward_list", kill::kill_backward_list),
    ("kill_sexp_forward", kill::kill_sexp_forward),
    ("kill_sexp_backward", kill::kill_sexp_backward),
    ("transpose", transpose::transpose),
    ("wrap_round", |source, selection| {
        wrap::wrap_around(source, selection, "(", ")")
    }),
    ("delete_backward", |source, selection| {
        delete::delete_backward(source, selection, PareditMode::Strict)
    }),
    ("delete_forward", |source, selection| {
        delete::delete_forward(source, selection, PareditMode::Strict)
    }),
    ("close_paren", |source, selection| {
        delete::close(source, selection.active, ')')
    }),
];

/// Generate a leaf form
fn arb_leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9?!-]{0,6}",
        "[0-9]{1,3}",
        ":[a-z]{1,4}",
        Just("\"s\\\"t\"".to_string()),
        Just("\"\"".to_string()),
        Just("\\(".to_string()),
    ]
}

/// Generate a balanced form with nested lists of every bracket kind
fn arb_form() -> impl Strategy<Value = String> {
    arb_leaf().prop_recursive(4, 48, 5, |inner| {
        (
            prop::collection::vec(inner, 0..5),
            prop_oneof![
                Just(("(", ")")),
                Just(("[", "]")),
                Just(("{", "}")),
                Just(("#{", "}")),
                Just(("'(", ")")),
                Just(("@(", ")")),
            ],
            prop_oneof![Just(" "), Just("\n  "), Just(" ;c\n ")],
        )
            .prop_map(|(items, (open, close), separator)| {
                format!("{open}{}{close}", items.join(separator))
            })
    })
}

/// Generate a balanced buffer of a few top-level forms
fn arb_buffer() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_form(), 1..4).prop_map(|forms| forms.join("\n\n"))
}

fn applied(source: &str, outcome: EditOutcome) -> Option<(String, EditSelection)> {
    let plan = outcome.into_plan()?;
    let text = apply_edits(source, &plan.edits).ok()?;
    Some((text, plan.selection))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_lexing_is_lossless(text in "\\PC{0,64}") {
        let joined: String = SexpTokenizer::new(&text)
            .tokenize_all()
            .iter()
            .map(|token| token.span)
            .collect();
        prop_assert_eq!(joined, text);
    }

    #[test]
    fn prop_generated_buffers_are_balanced(buffer in arb_buffer()) {
        prop_assert!(is_balanced(&buffer));
    }

    #[test]
    fn prop_operations_preserve_balance(buffer in arb_buffer()) {
        for caret in 0..=buffer.len() {
            for (name, operation) in OPERATIONS {
                let outcome = operation(&buffer, EditSelection::caret(caret));
                if let Some((result, selection)) = applied(&buffer, outcome) {
                    prop_assert!(
                        is_balanced(&result),
                        "{} at {} unbalanced {:?} into {:?}", name, caret, buffer, result
                    );
                    prop_assert!(selection.active <= result.len());
                    prop_assert!(result.is_char_boundary(selection.active));
                }
            }
        }
    }

    #[test]
    fn prop_forward_slurp_then_barf_round_trips(buffer in arb_buffer()) {
        for caret in 0..=buffer.len() {
            let slurped = applied(&buffer, slurp::forward_slurp(&buffer, EditSelection::caret(caret)));
            let Some((slurped, selection)) = slurped else { continue };
            let barfed = applied(&slurped, slurp::forward_barf(&slurped, selection));
            prop_assert_eq!(
                barfed.map(|(text, _)| text),
                Some(buffer.clone()),
                "caret {}", caret
            );
        }
    }

    #[test]
    fn prop_grow_then_shrink_retraces(buffer in arb_buffer(), seed in any::<prop::sample::Index>()) {
        let stream = TokenStream::new(&buffer);
        let caret = seed.index(buffer.len() + 1);
        let mut stack = ExpansionStack::new();
        let mut path = vec![EditSelection::caret(caret)];
        while let Some(next) = stack.grow(&stream, path[path.len() - 1]) {
            prop_assert!(next.span().encloses(path[path.len() - 1].span()));
            path.push(next);
        }
        while path.len() > 1 {
            let current = path.pop().unwrap_or_default();
            prop_assert_eq!(stack.shrink(current), path.last().copied());
        }
        prop_assert!(stack.len() <= 1);
    }
}
