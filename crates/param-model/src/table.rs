//! Tabular view of a parameter tree.
//!
//! A [`Table`] has one row per Param and the columns `component`, `fieldname`,
//! followed by the normalized metadata keys. It is the hand-off point to
//! whatever renders, exports or imports tables; the records form
//! ([`Table::to_records`] / [`Table::from_records`]) is an array of JSON
//! objects with absent cells left out.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::ModelError;
use crate::normalize::all_keys;
use crate::param::MetaValue;
use crate::traverse::Located;

/// Derived column naming the enclosing composite of each Param.
pub const COMPONENT: &str = "component";
/// Derived column naming the field each Param was found under.
pub const FIELDNAME: &str = "fieldname";
/// Columns that are derived from the tree shape and never written back.
pub const RESERVED_COLUMNS: [&str; 2] = [COMPONENT, FIELDNAME];

pub fn is_reserved(key: &str) -> bool {
    RESERVED_COLUMNS.contains(&key)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<MetaValue>>,
}

impl Table {
    /// # Errors
    ///
    /// - [`ModelError::DuplicateColumn`] if a column name appears twice.
    /// - [`ModelError::RaggedRow`] if a row does not have one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<MetaValue>>) -> Result<Self, ModelError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column) {
                return Err(ModelError::DuplicateColumn(column.clone()));
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(ModelError::RaggedRow {
                    row: i,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub(crate) fn from_located(located: &[Located<'_>]) -> Self {
        let keys = all_keys(located.iter().map(|l| l.param));
        let mut columns = Vec::with_capacity(keys.len() + 2);
        columns.push(COMPONENT.to_string());
        columns.push(FIELDNAME.to_string());
        let rows = located
            .iter()
            .map(|l| {
                let mut row = Vec::with_capacity(keys.len() + 2);
                row.push(MetaValue::from(l.origin.component));
                row.push(MetaValue::Present(l.origin.fieldname.to_value()));
                for key in &keys {
                    row.push(l.param.get(key).cloned().unwrap_or_default());
                }
                row
            })
            .collect();
        columns.extend(keys);
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<MetaValue>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[MetaValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Cells of column `name`, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<MetaValue>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).cloned().unwrap_or_default())
                .collect(),
        )
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// # Errors
    ///
    /// Returns [`ModelError::InvalidRecords`] if serialization fails.
    pub fn to_records(&self) -> Result<Value, ModelError> {
        serde_json::to_value(self).map_err(|e| ModelError::InvalidRecords(e.to_string()))
    }

    /// Builds a table from an array of JSON objects. Columns are the union of
    /// the record keys in first-seen order; missing cells become absent.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidRecords`] if `records` is not an array of objects.
    pub fn from_records(records: &Value) -> Result<Self, ModelError> {
        let records: Vec<IndexMap<String, Value>> = serde_json::from_value(records.clone())
            .map_err(|e| ModelError::InvalidRecords(e.to_string()))?;
        let mut columns: IndexSet<String> = IndexSet::new();
        for record in &records {
            columns.extend(record.keys().cloned());
        }
        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| MetaValue::from(record.get(c).cloned()))
                    .collect()
            })
            .collect();
        Ok(Self {
            columns: columns.into_iter().collect(),
            rows,
        })
    }
}

struct RecordRef<'t> {
    columns: &'t [String],
    cells: &'t [MetaValue],
}

impl Serialize for RecordRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            if let MetaValue::Present(v) = cell {
                map.serialize_entry(column, v)?;
            }
        }
        map.end()
    }
}

/// Serializes as records: a sequence of maps with absent cells omitted.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows.iter().map(|cells| RecordRef {
            columns: &self.columns,
            cells,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Param;
    use crate::traverse::select_located;
    use serde_json::json;

    fn table() -> Table {
        let object = vec![
            Param::new(1).with("units", "m"),
            Param::new(2).with("bounds", json!([0, 10])),
        ];
        Table::from_located(&select_located(&object))
    }

    #[test]
    fn test_columns() {
        let t = table();
        assert_eq!(
            t.columns(),
            &["component", "fieldname", "value", "units", "bounds"]
        );
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_rows_fill_absent() {
        let t = table();
        let row = t.row(1).unwrap();
        assert_eq!(row[0], json!("Vec"));
        assert_eq!(row[1], json!(1));
        assert_eq!(row[2], json!(2));
        assert!(row[3].is_absent());
        assert_eq!(row[4], json!([0, 10]));
        assert!(t.row(2).is_none());
    }

    #[test]
    fn test_column() {
        let t = table();
        let units = t.column("units").unwrap();
        assert_eq!(units, vec![MetaValue::from("m"), MetaValue::Absent]);
        assert!(t.column("missing").is_none());
    }

    #[test]
    fn test_empty_table_keeps_reserved_columns() {
        let t = Table::from_located(&[]);
        assert!(t.is_empty());
        assert_eq!(t.columns(), &["component", "fieldname"]);
    }

    #[test]
    fn test_records_round_trip() {
        let t = table();
        let records = t.to_records().unwrap();
        assert_eq!(
            records,
            json!([
                {"component": "Vec", "fieldname": 0, "value": 1, "units": "m"},
                {"component": "Vec", "fieldname": 1, "value": 2, "bounds": [0, 10]}
            ])
        );
        assert_eq!(Table::from_records(&records).unwrap(), t);
    }

    #[test]
    fn test_from_records_rejects_non_objects() {
        let err = Table::from_records(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ModelError::InvalidRecords(_)));
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let columns = vec!["value".to_string(), "units".to_string()];
        let err = Table::new(columns, vec![vec![MetaValue::from(1)]]).unwrap_err();
        assert_eq!(
            err,
            ModelError::RaggedRow {
                row: 0,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_new_rejects_duplicate_columns() {
        let columns = vec!["value".to_string(), "value".to_string()];
        let rows = vec![
            vec![MetaValue::from(5), MetaValue::from(50)],
            vec![MetaValue::from(6), MetaValue::from(60)],
        ];
        assert_eq!(
            Table::new(columns, rows).unwrap_err(),
            ModelError::DuplicateColumn("value".to_string())
        );
        let columns = vec!["component".to_string(), "units".to_string(), "component".to_string()];
        assert_eq!(
            Table::new(columns, Vec::new()).unwrap_err(),
            ModelError::DuplicateColumn("component".to_string())
        );
    }

    #[test]
    fn test_reserved() {
        assert!(is_reserved("component"));
        assert!(is_reserved("fieldname"));
        assert!(!is_reserved("value"));
    }
}
