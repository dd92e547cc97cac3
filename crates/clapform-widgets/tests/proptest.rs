//! Property-based tests for row groups and readers using proptest.

use clapform_widgets::{
    build, Arity, DefaultValue, FormStyle, MultipleRows, ParameterSpec, RowAction, RowGroup,
};
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Add(Option<usize>),
    Remove(usize),
    Press(usize, RowAction),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::option::of(0usize..12).prop_map(Op::Add),
        (0usize..12).prop_map(Op::Remove),
        (0usize..12, prop_oneof![Just(RowAction::Add), Just(RowAction::Remove)])
            .prop_map(|(row, action)| Op::Press(row, action)),
    ]
}

fn apply(group: &mut RowGroup<u32>, op: &Op, next: &mut u32) {
    match op {
        Op::Add(after) => {
            *next += 1;
            group.add(*after, *next);
        }
        Op::Remove(i) => {
            group.remove(*i);
        }
        Op::Press(row, action) => {
            *next += 1;
            let value = *next;
            group.press(*row, *action, || value);
        }
    }
}

fn assert_contiguous(group: &RowGroup<u32>) -> Result<(), TestCaseError> {
    for (pos, row) in group.rows().iter().enumerate() {
        prop_assert_eq!(row.index(), pos);
        prop_assert_eq!(row.add_button().target(), pos);
        prop_assert_eq!(row.remove_button().target(), pos);
    }
    Ok(())
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,8}"
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Any interleaving of operations keeps indices 0..len and buttons bound to their row.
    #[test]
    fn indices_stay_contiguous(
        seed in 0usize..5,
        min_rows in 0usize..2,
        ops in prop::collection::vec(op_strategy(), 0..60),
    ) {
        let seed = seed.max(min_rows);
        let mut group = RowGroup::with_rows(min_rows, 0..seed as u32);
        let mut next = 100;
        for op in &ops {
            apply(&mut group, op, &mut next);
            assert_contiguous(&group)?;
            prop_assert!(group.len() >= min_rows);
        }
    }

    /// Removal below the minimum never changes the group.
    #[test]
    fn minimum_is_a_floor(index in 0usize..4) {
        let mut group = RowGroup::with_rows(1, [7u32]);
        prop_assert_eq!(group.remove(index), None);
        prop_assert!(!group.press(0, RowAction::Remove, || 0));
        prop_assert_eq!(group.len(), 1);
    }

    /// A value added after row `i` lands at `i + 1` with every other value in order.
    #[test]
    fn add_inserts_below_anchor(
        values in prop::collection::vec(any::<u32>(), 1..10),
        anchor in 0usize..10,
    ) {
        let anchor = anchor % values.len();
        let mut group = RowGroup::with_rows(0, values.clone());
        let at = group.add(Some(anchor), u32::MAX);
        prop_assert_eq!(at, anchor + 1);

        let mut expected = values;
        expected.insert(anchor + 1, u32::MAX);
        prop_assert_eq!(group.values().copied().collect::<Vec<_>>(), expected);
    }

    /// Multiple-option rows read back as one flag/value pair per row.
    #[test]
    fn multiple_reads_flag_value_pairs(values in prop::collection::vec(value_strategy(), 1..6)) {
        let param = ParameterSpec::option("x", ["--x"])
            .multiple()
            .with_default(DefaultValue::Sequence(values.clone()));
        let rows = MultipleRows::new(&param);
        prop_assert_eq!(rows.len(), values.len());

        let expected: Vec<String> = values
            .iter()
            .flat_map(|v| ["--x".to_string(), v.clone()])
            .collect();
        prop_assert_eq!(rows.to_command(), expected);
    }

    /// Positional lists read back their non-blank rows unchanged.
    #[test]
    fn positional_list_reads_rows(values in prop::collection::vec(value_strategy(), 0..6)) {
        let param = ParameterSpec::positional("files")
            .with_arity(Arity::Unbounded)
            .with_default(DefaultValue::Sequence(values.clone()));
        let built = build(&param, &FormStyle::light());
        prop_assert_eq!(built.read(), values);
    }

    /// Counted flags emit their token once per step.
    #[test]
    fn counted_flag_repeats(n in 0u32..20) {
        let param = ParameterSpec::counted("verbose", ["-v"]).with_default(n.to_string());
        let built = build(&param, &FormStyle::light());
        prop_assert_eq!(built.read(), vec!["-v".to_string(); n as usize]);
    }
}
