//! Selection and reconstruction over nested values.
//!
//! [`Parameterized`] is implemented by every type that can sit in a parameter
//! tree: [`Param`] itself, the standard containers (see `impls`), opaque
//! scalars, and user structs through [`parameterized!`](crate::parameterized).
//! [`select`] and [`reconstruct`] are the only walkers; both follow the order
//! defined by `visit_params` / `map_params`, so a sequence produced by one can
//! be fed back into the other.

use std::fmt;

use serde_json::Value;
use tracing::warn;

use crate::error::ModelError;
use crate::param::Param;

mod impls;
mod macros;

/// Where a Param sits relative to its nearest enclosing composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldName<'a> {
    /// The Param is the traversal root.
    Root,
    /// Declared struct field.
    Named(&'static str),
    /// Zero-based position in a sequence or tuple.
    Index(usize),
    /// Key of a string-keyed map.
    Key(&'a str),
}

impl FieldName<'_> {
    /// Tabular representation: indices become numbers, everything else a string.
    pub fn to_value(&self) -> Value {
        match self {
            FieldName::Root => Value::String(String::new()),
            FieldName::Named(name) => Value::String((*name).to_string()),
            FieldName::Index(i) => Value::from(*i),
            FieldName::Key(key) => Value::String((*key).to_string()),
        }
    }
}

impl fmt::Display for FieldName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldName::Root => Ok(()),
            FieldName::Named(name) => f.write_str(name),
            FieldName::Index(i) => write!(f, "{}", i),
            FieldName::Key(key) => f.write_str(key),
        }
    }
}

/// Origin of a Param: the static name of the enclosing composite and the field
/// it was found under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin<'a> {
    pub component: &'static str,
    pub fieldname: FieldName<'a>,
}

impl Origin<'static> {
    pub const ROOT: Origin<'static> = Origin {
        component: "",
        fieldname: FieldName::Root,
    };
}

impl<'a> Origin<'a> {
    pub const fn new(component: &'static str, fieldname: FieldName<'a>) -> Self {
        Self {
            component,
            fieldname,
        }
    }
}

/// A selected Param together with its origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Located<'a> {
    pub origin: Origin<'a>,
    pub param: &'a Param,
}

/// Mapping function threaded through [`Parameterized::map_params`].
pub type ParamMap<'m> = dyn FnMut(&Param) -> Result<Param, ModelError> + 'm;

/// A value whose Params can be enumerated and substituted.
///
/// Both methods must walk children in the same order: depth first, sequence
/// index order for sequences and declaration order for structs. Containers
/// pass their own origin to each child; `Box`, `Option` and the smart pointers
/// are transparent and forward the origin they were given.
pub trait Parameterized: Sized {
    /// Calls `visit` on every Param reachable from `self`.
    fn visit_params<'a>(&'a self, origin: Origin<'a>, visit: &mut dyn FnMut(Origin<'a>, &'a Param));

    /// Rebuilds `self` with every Param replaced by `map(param)`. Non-Param
    /// values are cloned through unchanged.
    fn map_params(&self, map: &mut ParamMap<'_>) -> Result<Self, ModelError>;
}

/// Collects every Param of `object` in traversal order.
///
/// # Example
///
/// ```
/// use param_model::{select, Param};
///
/// let object = (Param::new(1), 2.5, vec![Param::new(3), Param::new(4)]);
/// let values: Vec<_> = select(&object).iter().map(|p| p.value().to_string()).collect();
/// assert_eq!(values, vec!["1", "3", "4"]);
/// ```
pub fn select<T: Parameterized>(object: &T) -> Vec<&Param> {
    let mut out = Vec::new();
    object.visit_params(Origin::ROOT, &mut |_, param| out.push(param));
    out
}

/// Like [`select`], keeping the origin of each Param.
pub fn select_located<T: Parameterized>(object: &T) -> Vec<Located<'_>> {
    let mut out = Vec::new();
    object.visit_params(Origin::ROOT, &mut |origin, param| {
        out.push(Located { origin, param })
    });
    out
}

/// Number of Params in `object`.
pub fn count<T: Parameterized>(object: &T) -> usize {
    let mut n = 0;
    object.visit_params(Origin::ROOT, &mut |_, _| n += 1);
    n
}

/// Rebuilds `object` with its Params replaced positionally by `replacements`.
///
/// # Errors
///
/// Returns [`ModelError::ShapeMismatch`] when `replacements` does not hold
/// exactly one Param per Param of `object`. Nothing is built in that case.
///
/// # Example
///
/// ```
/// use param_model::{reconstruct, select, Param};
///
/// let object = vec![Param::new(1), Param::new(2)];
/// let doubled: Vec<Param> = select(&object)
///     .iter()
///     .map(|p| p.with_value(p.value().as_value().and_then(|v| v.as_i64()).unwrap_or(0) * 2))
///     .collect();
/// let rebuilt = reconstruct(&object, doubled).unwrap();
/// assert_eq!(rebuilt, vec![Param::new(2), Param::new(4)]);
/// ```
pub fn reconstruct<T: Parameterized>(object: &T, replacements: Vec<Param>) -> Result<T, ModelError> {
    let expected = count(object);
    let found = replacements.len();
    if expected != found {
        warn!(expected, found, "reconstruct rejected: replacement count differs");
        return Err(ModelError::ShapeMismatch { expected, found });
    }
    let mut next = replacements.into_iter();
    object.map_params(&mut |_| next.next().ok_or(ModelError::ShapeMismatch { expected, found }))
}
