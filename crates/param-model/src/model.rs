//! Model handles.
//!
//! [`Model`] and [`StaticModel`] both own a normalized parameter tree and share
//! the read side through [`ReadModel`]. Only [`Model`] can be written; every
//! write builds the complete replacement object before swapping it in, so a
//! failed write leaves the handle untouched.
//!
//! Handles are not synchronized. A host that shares a `Model` between threads
//! behind a lock has to hold that lock across the whole write.

use tracing::{debug, trace, warn};

use crate::error::ModelError;
use crate::normalize::{all_keys, normalize, normalize_params};
use crate::param::{MetaValue, Param};
use crate::table::{is_reserved, Table, COMPONENT, FIELDNAME};
use crate::traverse::{count, reconstruct, select, select_located, Origin, Parameterized};

/// Read-only operations shared by [`Model`] and [`StaticModel`].
///
/// Nothing is cached: each call walks the wrapped object again.
pub trait ReadModel {
    type Object: Parameterized;

    fn object(&self) -> &Self::Object;

    /// Number of Params.
    fn len(&self) -> usize {
        count(self.object())
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Params in traversal order.
    fn params(&self) -> std::vec::IntoIter<&Param> {
        select(self.object()).into_iter()
    }

    /// # Errors
    ///
    /// Returns [`ModelError::IndexOutOfBounds`] for an index past the last Param.
    fn param(&self, index: usize) -> Result<&Param, ModelError> {
        let mut seen = 0;
        let mut found = None;
        self.object().visit_params(Origin::ROOT, &mut |_, param| {
            if seen == index {
                found = Some(param);
            }
            seen += 1;
        });
        found.ok_or(ModelError::IndexOutOfBounds { index, len: seen })
    }

    /// Metadata keys shared by every Param, value key first.
    fn param_keys(&self) -> Vec<String> {
        all_keys(select(self.object()))
    }

    /// Column names: `component`, `fieldname`, then [`ReadModel::param_keys`].
    fn keys(&self) -> Vec<String> {
        let mut keys = vec![COMPONENT.to_string(), FIELDNAME.to_string()];
        keys.extend(self.param_keys());
        keys
    }

    /// One cell per Param for `key`. `component` and `fieldname` are derived
    /// from where each Param sits in the object.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::KeyNotFound`] if no Param defines `key`.
    fn get(&self, key: &str) -> Result<Vec<MetaValue>, ModelError> {
        let located = select_located(self.object());
        match key {
            COMPONENT => Ok(located
                .iter()
                .map(|l| MetaValue::from(l.origin.component))
                .collect()),
            FIELDNAME => Ok(located
                .iter()
                .map(|l| MetaValue::Present(l.origin.fieldname.to_value()))
                .collect()),
            _ => located.iter().map(|l| l.param.get(key).cloned()).collect(),
        }
    }

    /// Current value of every Param.
    fn values(&self) -> Vec<MetaValue> {
        self.params().map(|p| p.value().clone()).collect()
    }

    fn table(&self) -> Table {
        Table::from_located(&select_located(self.object()))
    }
}

fn wrap<T: Parameterized>(object: T) -> Result<T, ModelError> {
    let n = count(&object);
    if n == 0 {
        warn!("refusing to wrap an object without parameters");
        return Err(ModelError::NoParametersFound);
    }
    debug!(params = n, "wrapping object");
    normalize(&object)
}

/// Mutable model handle.
///
/// # Example
///
/// ```
/// use param_model::{Model, Param, ReadModel};
/// use serde_json::json;
///
/// let object = (
///     Param::new(1).with("units", "m"),
///     Param::new(2).with("bounds", json!([0, 10])),
/// );
/// let mut model = Model::new(object).unwrap();
/// assert_eq!(model.keys(), vec!["component", "fieldname", "value", "units", "bounds"]);
///
/// model.update([10, 20]).unwrap();
/// assert_eq!(model.values(), vec![json!(10), json!(20)]);
/// assert_eq!(model.object().0.get("units").unwrap(), &json!("m"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Model<T> {
    object: T,
}

impl<T: Parameterized> Model<T> {
    /// Wraps `object`, normalizing its Params.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NoParametersFound`] if `object` holds no Params.
    pub fn new(object: T) -> Result<Self, ModelError> {
        Ok(Self {
            object: wrap(object)?,
        })
    }

    pub fn into_inner(self) -> T {
        self.object
    }

    pub fn into_static(self) -> StaticModel<T> {
        StaticModel {
            object: self.object,
        }
    }

    /// Writes column `key`: replaces it in every Param when it exists, adds it
    /// to every Param otherwise.
    ///
    /// # Errors
    ///
    /// - [`ModelError::ReservedKey`] for `component` and `fieldname`.
    /// - [`ModelError::ArityMismatch`] unless there is exactly one value per Param.
    pub fn set<I>(&mut self, key: &str, values: I) -> Result<(), ModelError>
    where
        I: IntoIterator,
        I::Item: Into<MetaValue>,
    {
        let values: Vec<MetaValue> = values.into_iter().map(Into::into).collect();
        let params = upsert_column(self.owned_params(), key, values)?;
        self.replace(params)?;
        debug!(key, "column written");
        Ok(())
    }

    /// Replaces the value of every Param positionally, keeping all metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ArityMismatch`] unless there is exactly one value per Param.
    pub fn update<I>(&mut self, values: I) -> Result<(), ModelError>
    where
        I: IntoIterator,
        I::Item: Into<MetaValue>,
    {
        let values: Vec<MetaValue> = values.into_iter().map(Into::into).collect();
        let params = select(&self.object);
        check_arity(params.len(), values.len())?;
        let params: Vec<Param> = params
            .into_iter()
            .zip(values)
            .map(|(p, v)| p.with_value(v))
            .collect();
        self.replace(params)?;
        debug!("values updated");
        Ok(())
    }

    /// Writes every non-derived column of `table`. The columns are applied
    /// in table order to a working copy; the handle only changes if all of
    /// them succeed.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ArityMismatch`] if the table does not have one row per Param.
    pub fn update_from_table(&mut self, table: &Table) -> Result<(), ModelError> {
        let mut params = self.owned_params();
        check_arity(params.len(), table.len())?;
        for column in table.columns().iter().filter(|c| !is_reserved(c)) {
            let values = table.column(column).unwrap_or_default();
            trace!(column = column.as_str(), "applying table column");
            params = upsert_column(params, column, values)?;
        }
        self.replace(params)?;
        debug!(rows = table.len(), "model updated from table");
        Ok(())
    }

    fn owned_params(&self) -> Vec<Param> {
        select(&self.object).into_iter().cloned().collect()
    }

    fn replace(&mut self, params: Vec<Param>) -> Result<(), ModelError> {
        self.object = reconstruct(&self.object, normalize_params(params))?;
        Ok(())
    }
}

impl<T: Parameterized> ReadModel for Model<T> {
    type Object = T;

    fn object(&self) -> &T {
        &self.object
    }
}

impl<'m, T: Parameterized> IntoIterator for &'m Model<T> {
    type Item = &'m Param;
    type IntoIter = std::vec::IntoIter<&'m Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params()
    }
}

/// Read-only model handle. The wrapped object is fixed for the handle's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticModel<T> {
    object: T,
}

impl<T: Parameterized> StaticModel<T> {
    /// # Errors
    ///
    /// Returns [`ModelError::NoParametersFound`] if `object` holds no Params.
    pub fn new(object: T) -> Result<Self, ModelError> {
        Ok(Self {
            object: wrap(object)?,
        })
    }

    pub fn into_inner(self) -> T {
        self.object
    }

    pub fn into_mutable(self) -> Model<T> {
        Model {
            object: self.object,
        }
    }
}

impl<T: Parameterized> ReadModel for StaticModel<T> {
    type Object = T;

    fn object(&self) -> &T {
        &self.object
    }
}

impl<'m, T: Parameterized> IntoIterator for &'m StaticModel<T> {
    type Item = &'m Param;
    type IntoIter = std::vec::IntoIter<&'m Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params()
    }
}

fn check_arity(expected: usize, found: usize) -> Result<(), ModelError> {
    if expected != found {
        warn!(expected, found, "write rejected: wrong number of values");
        return Err(ModelError::ArityMismatch { expected, found });
    }
    Ok(())
}

fn upsert_column(
    params: Vec<Param>,
    key: &str,
    values: Vec<MetaValue>,
) -> Result<Vec<Param>, ModelError> {
    if is_reserved(key) {
        warn!(key, "write rejected: reserved column");
        return Err(ModelError::ReservedKey(key.to_string()));
    }
    check_arity(params.len(), values.len())?;
    Ok(params
        .into_iter()
        .zip(values)
        .map(|(p, v)| p.with(key, v))
        .collect())
}
