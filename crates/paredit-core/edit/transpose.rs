//! Swap the sexps on either side of the caret

use crate::cursor::TokenStream;
use crate::navigation::{sexp_after, sexp_before};

use super::{checked_plan, EditOutcome, EditSelection, TextEdit};

/// Exchange the previous and next sexps, leaving the caret after both
///
/// `(a |b)` becomes `(b a|)`. Not applicable inside a string, comment or atom,
/// or when either neighbour is missing.
#[must_use]
pub fn transpose(source: &str, selection: EditSelection) -> EditOutcome {
    let stream = TokenStream::new(source);
    let caret = selection.active;
    let cursor = stream.cursor_at(caret);
    if cursor.is_interior() && cursor.token().is_some_and(|token| !token.is_whitespace()) {
        return EditOutcome::NotApplicable;
    }
    let (Some(before), Some(after)) = (sexp_before(&stream, caret), sexp_after(&stream, caret))
    else {
        return EditOutcome::NotApplicable;
    };
    if before.end > after.start {
        return EditOutcome::NotApplicable;
    }
    let (Some(before_text), Some(after_text)) = (before.slice(source), after.slice(source)) else {
        return EditOutcome::NotApplicable;
    };

    let edits = vec![
        TextEdit::replace(before, after_text),
        TextEdit::replace(after, before_text),
    ];
    checked_plan(&stream, edits, EditSelection::caret(after.end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::apply_edits;
    use pretty_assertions::assert_eq;

    fn swapped(source: &str, caret: usize) -> Option<(String, usize)> {
        let plan = transpose(source, EditSelection::caret(caret)).into_plan()?;
        let text = apply_edits(source, &plan.edits).ok()?;
        Some((text, plan.selection.active))
    }

    #[test]
    fn transpose_atoms() {
        assert_eq!(swapped("(a b)", 2), Some(("(b a)".to_string(), 4)));
        assert_eq!(swapped("(a b)", 3), Some(("(b a)".to_string(), 4)));
    }

    #[test]
    fn transpose_keeps_separator_and_prefixes() {
        assert_eq!(
            swapped("(x ;c\n '(y z))", 2),
            Some(("('(y z) ;c\n x)".to_string(), 13))
        );
    }

    #[test]
    fn transpose_needs_both_neighbours() {
        assert_eq!(swapped("(a)", 2), None);
        assert_eq!(swapped("(a)", 1), None);
    }

    #[test]
    fn transpose_inside_string_is_noop() {
        assert_eq!(swapped("(f \"ab\" c)", 5), None);
    }
}
