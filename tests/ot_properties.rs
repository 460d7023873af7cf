//! Property-based tests for compose, transform and apply.

use proptest::prelude::*;
use synckit_ot::{compose, transform, Document, Operation, OperationSequence, OtError};

// =============================================================================
// Test helpers
// =============================================================================

/// One step of an edit script, clamped to the text left when it is built
#[derive(Clone, Debug)]
enum Step {
    Retain(usize),
    Delete(usize),
    Insert(String),
}

fn arbitrary_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..6).prop_map(Step::Retain),
        (0usize..4).prop_map(Step::Delete),
        "[xyé\n]{0,3}".prop_map(Step::Insert),
    ]
}

fn arbitrary_script() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(arbitrary_step(), 0..12)
}

fn arbitrary_text() -> impl Strategy<Value = String> {
    "[abü\n]{0,24}"
}

/// Build a sequence covering exactly `size` units from a script
fn build(size: usize, script: &[Step]) -> OperationSequence {
    let mut ops = OperationSequence::new();
    let mut remaining = size;
    for step in script {
        match step {
            Step::Retain(n) => {
                let n = (*n).min(remaining);
                ops = ops.retain(n);
                remaining -= n;
            }
            Step::Delete(n) => {
                let n = (*n).min(remaining);
                ops = ops.delete(n);
                remaining -= n;
            }
            Step::Insert(text) => ops = ops.insert(text.as_str()),
        }
    }
    ops.retain(remaining)
}

fn applied(doc: &Document, ops: &OperationSequence) -> Document {
    let mut doc = doc.clone();
    doc.apply(ops).unwrap();
    doc
}

// =============================================================================
// Transform properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Applying a then b' converges with applying b then a'
    #[test]
    fn transform_converges(
        text in arbitrary_text(),
        first in arbitrary_script(),
        second in arbitrary_script(),
    ) {
        let doc = Document::from(text);
        let a = build(doc.size(), &first);
        let b = build(doc.size(), &second);

        let (a_prime, b_prime) = transform(&a, &b).unwrap();
        prop_assert_eq!(a_prime.input_len(), b.output_len());
        prop_assert_eq!(b_prime.input_len(), a.output_len());

        let left = applied(&applied(&doc, &a), &b_prime);
        let right = applied(&applied(&doc, &b), &a_prime);
        prop_assert_eq!(left.to_string(), right.to_string());
    }

    /// Transforming against a no-op changes nothing
    #[test]
    fn transform_against_noop(text in arbitrary_text(), script in arbitrary_script()) {
        let doc = Document::from(text);
        let a = build(doc.size(), &script);
        let noop = OperationSequence::new().retain(doc.size());

        let (a_prime, noop_prime) = transform(&a, &noop).unwrap();
        prop_assert_eq!(&a_prime, &a);
        prop_assert!(noop_prime.is_noop());
        prop_assert_eq!(noop_prime.input_len(), a.output_len());
    }
}

// =============================================================================
// Compose properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// apply(compose(a, b)) equals applying a then b
    #[test]
    fn compose_matches_sequential_apply(
        text in arbitrary_text(),
        first in arbitrary_script(),
        second in arbitrary_script(),
    ) {
        let doc = Document::from(text);
        let a = build(doc.size(), &first);
        let b = build(a.output_len(), &second);

        let ab = compose(&a, &b).unwrap();
        prop_assert_eq!(ab.input_len(), a.input_len());
        prop_assert_eq!(ab.output_len(), b.output_len());
        prop_assert_eq!(applied(&doc, &ab), applied(&applied(&doc, &a), &b));
    }

    /// compose(compose(a, b), c) == compose(a, compose(b, c))
    #[test]
    fn compose_is_associative(
        text in arbitrary_text(),
        first in arbitrary_script(),
        second in arbitrary_script(),
        third in arbitrary_script(),
    ) {
        let doc = Document::from(text);
        let a = build(doc.size(), &first);
        let b = build(a.output_len(), &second);
        let c = build(b.output_len(), &third);

        let left = compose(&compose(&a, &b).unwrap(), &c).unwrap();
        let right = compose(&a, &compose(&b, &c).unwrap()).unwrap();
        prop_assert_eq!(applied(&doc, &left), applied(&doc, &right));
        prop_assert_eq!(left, right);
    }
}

// =============================================================================
// Apply and canonical form
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Sequences that do not cover the document are rejected and leave it intact
    #[test]
    fn apply_rejects_wrong_coverage(
        text in arbitrary_text(),
        script in arbitrary_script(),
        extra in 1usize..4,
        shrink in any::<bool>(),
    ) {
        let doc = Document::from(text);
        let target = if shrink {
            prop_assume!(doc.size() > 0);
            doc.size() - 1
        } else {
            doc.size() + extra
        };
        let ops = build(target, &script);

        let mut copy = doc.clone();
        let err = copy.apply(&ops).unwrap_err();
        let rejected = matches!(err, OtError::Index { .. } | OtError::Coverage { .. });
        prop_assert!(rejected, "unexpected error {:?}", err);
        prop_assert_eq!(copy, doc);
    }

    /// Output size matches the sequence's output length
    #[test]
    fn apply_tracks_size(text in arbitrary_text(), script in arbitrary_script()) {
        let doc = Document::from(text);
        let ops = build(doc.size(), &script);

        let after = applied(&doc, &ops);
        prop_assert_eq!(after.size(), ops.output_len());
        prop_assert_eq!(&after, &Document::from(after.to_string()));
    }

    /// Built sequences are canonical: no no-ops, no mergeable neighbours,
    /// deletes before inserts
    #[test]
    fn sequences_are_canonical(size in 0usize..20, script in arbitrary_script()) {
        let ops = build(size, &script);

        prop_assert!(ops.iter().all(|op| !op.is_noop()));
        for pair in ops.ops().windows(2) {
            let adjacent_same_kind = matches!(
                (&pair[0], &pair[1]),
                (Operation::Retain(_), Operation::Retain(_))
                    | (Operation::Delete(_), Operation::Delete(_))
                    | (Operation::Insert(_), Operation::Insert(_))
            );
            let delete_after_insert =
                matches!((&pair[0], &pair[1]), (Operation::Insert(_), Operation::Delete(_)));
            prop_assert!(!adjacent_same_kind);
            prop_assert!(!delete_after_insert);
        }

        let rebuilt: OperationSequence = ops.iter().cloned().collect();
        prop_assert_eq!(&rebuilt, &ops);

        let json = serde_json::to_string(&ops).unwrap();
        let decoded: OperationSequence = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(decoded, ops);
    }

    /// Retain counts from the wire either add up exactly or are rejected
    #[test]
    fn wire_counts_never_wrap(counts in prop::collection::vec(any::<u64>(), 1..4)) {
        let total: u128 = counts.iter().map(|&n| u128::from(n)).sum();
        let json = serde_json::to_string(&counts).unwrap();

        match serde_json::from_str::<OperationSequence>(&json) {
            Ok(seq) => prop_assert_eq!(seq.input_len() as u128, total),
            Err(_) => prop_assert!(total > usize::MAX as u128),
        }
    }
}
