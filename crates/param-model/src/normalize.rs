//! Metadata normalization: every Param of an object ends up with the same keys
//! in the same order, missing keys filled with [`MetaValue::Absent`].
//!
//! [`MetaValue::Absent`]: crate::MetaValue::Absent

use indexmap::IndexSet;
use tracing::debug;

use crate::error::ModelError;
use crate::param::{Param, VALUE};
use crate::traverse::{reconstruct, select, Parameterized};

/// Union of the keys of `params`: `value` first, the rest in first-seen order.
/// Empty when `params` is empty.
pub fn all_keys<'a, I>(params: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Param>,
{
    let mut keys: IndexSet<&str> = IndexSet::new();
    for param in params {
        keys.insert(VALUE);
        keys.extend(param.keys());
    }
    keys.into_iter().map(str::to_string).collect()
}

/// Conforms every Param in `params` to the key union of the whole sequence.
pub fn normalize_params(params: Vec<Param>) -> Vec<Param> {
    let keys = all_keys(&params);
    debug!(params = params.len(), keys = ?keys, "normalizing parameters");
    params.iter().map(|p| p.conform(&keys)).collect()
}

/// Returns a copy of `object` whose Params all share one key set.
///
/// # Example
///
/// ```
/// use param_model::{normalize, Param};
///
/// let object = (Param::new(1).with("a", 1), Param::new(2).with("b", 2));
/// let normalized = normalize(&object).unwrap();
/// assert_eq!(normalized.0.keys().collect::<Vec<_>>(), vec!["value", "a", "b"]);
/// assert!(normalized.0.get("b").unwrap().is_absent());
/// ```
pub fn normalize<T: Parameterized>(object: &T) -> Result<T, ModelError> {
    let params: Vec<Param> = select(object).into_iter().cloned().collect();
    reconstruct(object, normalize_params(params))
}

/// True when every Param of `object` has exactly the same keys in the same order.
pub fn is_normalized<T: Parameterized>(object: &T) -> bool {
    let params = select(object);
    match params.split_first() {
        None => true,
        Some((first, rest)) => rest.iter().all(|p| p.keys().eq(first.keys())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::MetaValue;
    use serde_json::json;

    fn pair() -> Vec<Param> {
        vec![
            Param::new(1).with("a", 1).with("b", 2),
            Param::new(2).with("b", 3).with("c", 4),
        ]
    }

    #[test]
    fn test_all_keys_first_seen_order() {
        assert_eq!(all_keys(&pair()), vec!["value", "a", "b", "c"]);
        assert!(all_keys(&Vec::<Param>::new()).is_empty());
    }

    #[test]
    fn test_all_keys_value_first_regardless_of_field_order() {
        let params = vec![
            Param::from_fields([("units", json!("m")), ("value", json!(1))]).unwrap(),
            Param::new(2),
        ];
        assert_eq!(all_keys(&params), vec!["value", "units"]);
        let normalized = normalize_params(params);
        assert_eq!(*normalized[0].value(), json!(1));
        assert_eq!(*normalized[1].value(), json!(2));
        assert!(normalized[1].get("units").unwrap().is_absent());
    }

    #[test]
    fn test_key_union() {
        let normalized = normalize(&pair()).unwrap();
        for p in &normalized {
            assert_eq!(p.keys().collect::<Vec<_>>(), vec!["value", "a", "b", "c"]);
        }
        assert_eq!(*normalized[0].get("c").unwrap(), MetaValue::Absent);
        assert_eq!(*normalized[1].get("a").unwrap(), MetaValue::Absent);
        assert_eq!(*normalized[0].get("b").unwrap(), json!(2));
        assert_eq!(*normalized[1].get("b").unwrap(), json!(3));
        assert_eq!(*normalized[1].value(), json!(2));
    }

    #[test]
    fn test_idempotent() {
        let once = normalize(&pair()).unwrap();
        let twice = normalize(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_is_normalized() {
        assert!(!is_normalized(&pair()));
        assert!(is_normalized(&normalize(&pair()).unwrap()));
        assert!(is_normalized(&Vec::<Param>::new()));
    }

    #[test]
    fn test_absent_value_survives_normalization() {
        let object = vec![Param::new(MetaValue::Absent), Param::new(1).with("units", "m")];
        let normalized = normalize(&object).unwrap();
        assert!(normalized[0].value().is_absent());
        assert!(normalized[0].get("units").unwrap().is_absent());
    }
}
