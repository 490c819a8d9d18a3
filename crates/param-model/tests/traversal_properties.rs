//! Property tests for selection, reconstruction and normalization.

use param_model::{
    is_normalized, normalize, parameterized, reconstruct, select, Model, Param, ReadModel,
};
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Cell {
    gain: Param,
    offset: Option<Param>,
    weight: f64,
}

parameterized!(Cell { gain, offset, weight });

const KEYS: [&str; 4] = ["units", "bounds", "description", "prior"];

fn arb_param() -> impl Strategy<Value = Param> {
    (
        any::<i32>(),
        proptest::collection::vec((0..KEYS.len(), any::<i16>()), 0..4),
    )
        .prop_map(|(value, extras)| {
            extras
                .into_iter()
                .fold(Param::new(value), |p, (k, v)| p.with(KEYS[k], v))
        })
}

fn arb_cell() -> impl Strategy<Value = Cell> {
    (arb_param(), proptest::option::of(arb_param()), -1.0e6..1.0e6f64).prop_map(
        |(gain, offset, weight)| Cell {
            gain,
            offset,
            weight,
        },
    )
}

fn arb_tree() -> impl Strategy<Value = (Vec<Cell>, Param)> {
    (proptest::collection::vec(arb_cell(), 0..6), arb_param())
}

proptest! {
    #[test]
    fn prop_reconstruct_of_select_is_identity(tree in arb_tree()) {
        let leaves: Vec<Param> = select(&tree).into_iter().cloned().collect();
        prop_assert_eq!(reconstruct(&tree, leaves).unwrap(), tree);
    }

    #[test]
    fn prop_select_is_deterministic(tree in arb_tree()) {
        prop_assert_eq!(select(&tree), select(&tree));
    }

    #[test]
    fn prop_reconstruct_preserves_count(tree in arb_tree(), value in any::<i32>()) {
        let leaves: Vec<Param> = select(&tree).iter().map(|p| p.with_value(value)).collect();
        let n = leaves.len();
        let rebuilt = reconstruct(&tree, leaves).unwrap();
        prop_assert_eq!(select(&rebuilt).len(), n);
        for p in select(&rebuilt) {
            prop_assert_eq!(p.value(), &serde_json::Value::from(value));
        }
    }

    #[test]
    fn prop_normalize_is_idempotent(tree in arb_tree()) {
        let once = normalize(&tree).unwrap();
        prop_assert!(is_normalized(&once));
        prop_assert_eq!(normalize(&once).unwrap(), once);
    }

    #[test]
    fn prop_update_preserves_len(tree in arb_tree()) {
        let mut model = Model::new(tree).unwrap();
        let n = model.len();
        model.update((0..n as i64).collect::<Vec<_>>()).unwrap();
        prop_assert_eq!(model.len(), n);
        let table = model.table();
        model.update_from_table(&table).unwrap();
        prop_assert_eq!(model.table(), table);
    }
}
