//! End-to-end properties of the compute → render → apply pipeline,
//! including the drift scenarios the engine exists for.

use driftpatch::{apply_diff, compute_diff_default, PatchError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn no_op_diff_is_idempotent() {
    for text in ["", "\n", "a", "a\nb\nc", "x\n\n\ny\n"] {
        let diff = compute_diff_default(text, text).render();
        assert_eq!(diff, "");
        assert_eq!(apply_diff(text, &diff).unwrap(), text);
    }
}

#[test]
fn round_trip_reproduces_revised_text() {
    let cases = [
        ("a\nb\nc", "a\nB\nc"),
        ("a\nb\nc", "a\nc"),
        ("a\nc", "a\nb\nc"),
        ("a\nb", "a\nb\nc\nd"),
        ("a\nb\nc\nd", "c\nd"),
        ("", "hello\nworld"),
        ("hello\nworld", ""),
        ("one\ntwo\nthree\nfour\nfive\nsix\nseven\neight\nnine\nten",
         "one\n2\nthree\nfour\nfive\nsix\nseven\n8\nnine\nten"),
    ];
    for (base, revised) in cases {
        let diff = compute_diff_default(base, revised).render();
        assert_eq!(apply_diff(base, &diff).unwrap(), revised, "diff was:\n{diff}");
    }
}

#[test]
fn scenario_return_value_change() {
    let base = "function f() {\n  return 1;\n}";
    let revised = "function f() {\n  return 2;\n}";

    let diff = compute_diff_default(base, revised);
    assert_eq!(diff.hunks.len(), 1);
    assert_eq!(diff.hunks[0].removed, vec!["  return 1;"]);
    assert_eq!(diff.hunks[0].added, vec!["  return 2;"]);

    assert_eq!(apply_diff(base, &diff.render()).unwrap(), revised);
}

#[test]
fn scenario_trailing_blank_line_appended_after_compute() {
    let base = "function f() {\n  return 1;\n}";
    let revised = "function f() {\n  return 2;\n}";
    let diff = compute_diff_default(base, revised).render();

    // The live copy gained a trailing blank line while the diff was being
    // generated.
    let drifted = format!("{base}\n");
    let patched = apply_diff(&drifted, &diff).unwrap();
    assert_eq!(patched, format!("{revised}\n"));
}

#[test]
fn scenario_unchanged_block_produces_no_hunks() {
    let text = "alpha\nbeta\ngamma";
    assert!(compute_diff_default(text, text).is_empty());
    // A hand-written context-only diff is likewise a no-op, not an edit.
    assert_eq!(apply_diff(text, " alpha\n beta\n").unwrap(), text);
}

#[test]
fn drift_unrelated_insertion_far_from_hunk_is_preserved() {
    let base_lines: Vec<String> = (0..20).map(|i| format!("stmt_{i}();")).collect();
    let base = base_lines.join("\n");

    let mut revised_lines = base_lines.clone();
    revised_lines[15] = "stmt_15_rewritten();".to_string();
    let revised = revised_lines.join("\n");

    let diff = compute_diff_default(&base, &revised).render();

    // An unrelated line lands near the top before the patch arrives.
    let mut drifted_lines = base_lines.clone();
    drifted_lines.insert(2, "unrelated_insert();".to_string());
    let drifted = drifted_lines.join("\n");

    let mut expected_lines = drifted_lines.clone();
    expected_lines[16] = "stmt_15_rewritten();".to_string();

    let patched = apply_diff(&drifted, &diff).unwrap();
    assert_eq!(patched, expected_lines.join("\n"));
}

#[test]
fn whitespace_only_edit_at_document_edge_round_trips() {
    // Edits that only change leading or trailing whitespace, sitting at a
    // document edge where no context can flank them.
    let cases = [
        ("    indented();\nrest();", "unindented();\nrest();"),
        ("body();\n  trailer();", "body();\ntrailer();"),
    ];
    for (base, revised) in cases {
        let diff = compute_diff_default(base, revised).render();
        assert_eq!(apply_diff(base, &diff).unwrap(), revised, "diff was:\n{diff}");
    }
}

#[test]
fn duplicated_region_disambiguated_by_trailing_context_applies() {
    // The leading context and removed lines repeat verbatim elsewhere in
    // the target; the trailing context is what makes the hunk's home
    // unique.
    let base = "ctx\nvalue = 1;\ntail_a\nctx\nvalue = 1;\ntail_b";
    let diff = " ctx\n-value = 1;\n+value = 2;\n tail_b\n";
    assert_eq!(
        apply_diff(base, diff).unwrap(),
        "ctx\nvalue = 1;\ntail_a\nctx\nvalue = 2;\ntail_b"
    );
}

#[test]
fn ambiguous_anchor_fails_rather_than_guessing() {
    let base = "header:\n  setting = off\nfooter\n";
    let revised = "header:\n  setting = on\nfooter\n";
    let diff = compute_diff_default(base, revised).render();

    // The apply-time text repeats the whole region, so every anchor the
    // applier could derive occurs twice.
    let drifted = format!("{base}{base}");
    assert!(matches!(
        apply_diff(&drifted, &diff),
        Err(PatchError::SearchTextNotUnique { .. })
    ));
}

#[test]
fn hunks_are_ordered_and_non_overlapping() {
    let base_lines: Vec<String> = (0..30).map(|i| format!("line_{i}")).collect();
    let base = base_lines.join("\n");

    let mut revised_lines = base_lines.clone();
    revised_lines[3] = "line_3_changed".to_string();
    revised_lines.remove(14);
    revised_lines.insert(24, "line_inserted".to_string());
    let revised = revised_lines.join("\n");

    let diff = compute_diff_default(&base, &revised);
    assert!(diff.hunks.len() >= 2);

    let mut cursor = 0;
    for hunk in &diff.hunks {
        let mut block: Vec<&str> = hunk.context_before.iter().map(String::as_str).collect();
        block.extend(hunk.removed.iter().map(String::as_str));
        block.extend(hunk.context_after.iter().map(String::as_str));

        let start = locate(&base_lines, &block, cursor)
            .unwrap_or_else(|| panic!("hunk block not found in base after line {cursor}"));
        let region_start = start + hunk.context_before.len();
        assert!(region_start >= cursor, "changed regions overlap");
        cursor = region_start + hunk.removed.len();
    }

    assert_eq!(apply_diff(&base, &diff.render()).unwrap(), revised);
}

fn locate(haystack: &[String], needle: &[&str], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from);
    }
    (from..=haystack.len().saturating_sub(needle.len())).find(|&start| {
        needle
            .iter()
            .zip(&haystack[start..])
            .all(|(n, h)| *n == h.as_str())
    })
}

/// Line-level edit script applied to a synthetic base document. Lines are
/// all distinct so anchors stay unique, which is the regime the round-trip
/// guarantee covers.
#[derive(Debug, Clone)]
enum EditOp {
    Keep,
    Replace,
    Delete,
    InsertBefore,
}

fn edit_ops() -> impl Strategy<Value = Vec<EditOp>> {
    proptest::collection::vec(
        prop_oneof![
            3 => Just(EditOp::Keep),
            1 => Just(EditOp::Replace),
            1 => Just(EditOp::Delete),
            1 => Just(EditOp::InsertBefore),
        ],
        1..40,
    )
}

proptest! {
    #[test]
    fn prop_round_trip_over_random_edit_scripts(ops in edit_ops()) {
        let base_lines: Vec<String> = (0..ops.len())
            .map(|i| format!("fn item_{i}() {{ body_{i} }}"))
            .collect();

        let mut revised_lines = Vec::new();
        for (i, op) in ops.iter().enumerate() {
            match op {
                EditOp::Keep => revised_lines.push(base_lines[i].clone()),
                EditOp::Replace => revised_lines.push(format!("fn item_{i}_rewritten() {{}}")),
                EditOp::Delete => {}
                EditOp::InsertBefore => {
                    revised_lines.push(format!("fn inserted_before_{i}() {{}}"));
                    revised_lines.push(base_lines[i].clone());
                }
            }
        }

        let base = base_lines.join("\n");
        let revised = revised_lines.join("\n");

        let diff = compute_diff_default(&base, &revised).render();
        let patched = apply_diff(&base, &diff).unwrap();
        prop_assert_eq!(patched, revised);
    }

    #[test]
    fn prop_identical_inputs_never_produce_hunks(text in "[a-z \n]{0,200}") {
        prop_assert!(compute_diff_default(&text, &text).is_empty());
    }
}
