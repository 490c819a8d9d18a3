//! param-model - parameter discovery and bulk update over nested data.
//!
//! Wrap any value that embeds [`Param`] leaves in a [`Model`]. The model finds
//! every Param, gives them all the same metadata keys, and lets you read and
//! rewrite them as columns while the surrounding structure stays intact.
//!
//! # Example
//!
//! ```
//! use param_model::{parameterized, Model, Param, ReadModel};
//! use serde_json::json;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Pendulum {
//!     length: Param,
//!     damping: Param,
//!     name: String,
//! }
//!
//! parameterized!(Pendulum { length, damping, #[carry] name });
//!
//! let pendulum = Pendulum {
//!     length: Param::new(1.0).with("units", "m"),
//!     damping: Param::new(0.1).with("bounds", json!([0.0, 1.0])),
//!     name: "simple".to_string(),
//! };
//!
//! let mut model = Model::new(pendulum).unwrap();
//! assert_eq!(model.len(), 2);
//! assert_eq!(model.get("fieldname").unwrap(), vec![json!("length"), json!("damping")]);
//!
//! model.update([2.0, 0.2]).unwrap();
//! model.set("units", ["m", "1/s"]).unwrap();
//!
//! let pendulum = model.into_inner();
//! assert_eq!(pendulum.length.to_string(), r#"Param(value = 2.0, units = "m", bounds = absent)"#);
//! assert_eq!(pendulum.name, "simple");
//! ```

pub mod error;
pub mod model;
pub mod normalize;
pub mod param;
pub mod table;
pub mod traverse;

pub use error::ModelError;
pub use model::{Model, ReadModel, StaticModel};
pub use normalize::{all_keys, is_normalized, normalize, normalize_params};
pub use param::{MetaValue, Param, VALUE};
pub use table::{is_reserved, Table, COMPONENT, FIELDNAME, RESERVED_COLUMNS};
pub use traverse::{
    count, reconstruct, select, select_located, FieldName, Located, Origin, ParamMap,
    Parameterized,
};
