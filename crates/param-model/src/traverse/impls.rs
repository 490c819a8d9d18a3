//! `Parameterized` for `Param`, standard containers and opaque scalars.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use super::{FieldName, Origin, ParamMap, Parameterized};
use crate::error::ModelError;
use crate::param::Param;

impl Parameterized for Param {
    fn visit_params<'a>(&'a self, origin: Origin<'a>, visit: &mut dyn FnMut(Origin<'a>, &'a Param)) {
        visit(origin, self);
    }

    fn map_params(&self, map: &mut ParamMap<'_>) -> Result<Self, ModelError> {
        map(self)
    }
}

macro_rules! opaque {
    ($($t:ty),* $(,)?) => {
        $(
            impl Parameterized for $t {
                fn visit_params<'a>(&'a self, _origin: Origin<'a>, _visit: &mut dyn FnMut(Origin<'a>, &'a Param)) {}

                fn map_params(&self, _map: &mut ParamMap<'_>) -> Result<Self, ModelError> {
                    Ok(self.clone())
                }
            }
        )*
    };
}

opaque!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
    Value,
);

impl<T: Parameterized> Parameterized for Option<T> {
    fn visit_params<'a>(&'a self, origin: Origin<'a>, visit: &mut dyn FnMut(Origin<'a>, &'a Param)) {
        if let Some(inner) = self {
            inner.visit_params(origin, visit);
        }
    }

    fn map_params(&self, map: &mut ParamMap<'_>) -> Result<Self, ModelError> {
        match self {
            Some(inner) => Ok(Some(inner.map_params(map)?)),
            None => Ok(None),
        }
    }
}

macro_rules! pointer {
    ($($p:ident),*) => {
        $(
            impl<T: Parameterized> Parameterized for $p<T> {
                fn visit_params<'a>(&'a self, origin: Origin<'a>, visit: &mut dyn FnMut(Origin<'a>, &'a Param)) {
                    (**self).visit_params(origin, visit);
                }

                fn map_params(&self, map: &mut ParamMap<'_>) -> Result<Self, ModelError> {
                    Ok($p::new((**self).map_params(map)?))
                }
            }
        )*
    };
}

pointer!(Box, Rc, Arc);

impl<T: Parameterized> Parameterized for Vec<T> {
    fn visit_params<'a>(&'a self, _origin: Origin<'a>, visit: &mut dyn FnMut(Origin<'a>, &'a Param)) {
        for (i, item) in self.iter().enumerate() {
            item.visit_params(Origin::new("Vec", FieldName::Index(i)), visit);
        }
    }

    fn map_params(&self, map: &mut ParamMap<'_>) -> Result<Self, ModelError> {
        let mut out = Vec::with_capacity(self.len());
        for item in self {
            out.push(item.map_params(map)?);
        }
        Ok(out)
    }
}

impl<T: Parameterized, const N: usize> Parameterized for [T; N] {
    fn visit_params<'a>(&'a self, _origin: Origin<'a>, visit: &mut dyn FnMut(Origin<'a>, &'a Param)) {
        for (i, item) in self.iter().enumerate() {
            item.visit_params(Origin::new("Array", FieldName::Index(i)), visit);
        }
    }

    fn map_params(&self, map: &mut ParamMap<'_>) -> Result<Self, ModelError> {
        let mut out = Vec::with_capacity(N);
        for item in self {
            out.push(item.map_params(map)?);
        }
        out.try_into().map_err(|rest: Vec<T>| ModelError::ShapeMismatch {
            expected: N,
            found: rest.len(),
        })
    }
}

impl<T: Parameterized> Parameterized for BTreeMap<String, T> {
    fn visit_params<'a>(&'a self, _origin: Origin<'a>, visit: &mut dyn FnMut(Origin<'a>, &'a Param)) {
        for (key, item) in self {
            item.visit_params(Origin::new("Map", FieldName::Key(key)), visit);
        }
    }

    fn map_params(&self, map: &mut ParamMap<'_>) -> Result<Self, ModelError> {
        let mut out = BTreeMap::new();
        for (key, item) in self {
            out.insert(key.clone(), item.map_params(map)?);
        }
        Ok(out)
    }
}

impl<T: Parameterized> Parameterized for IndexMap<String, T> {
    fn visit_params<'a>(&'a self, _origin: Origin<'a>, visit: &mut dyn FnMut(Origin<'a>, &'a Param)) {
        for (key, item) in self {
            item.visit_params(Origin::new("Map", FieldName::Key(key)), visit);
        }
    }

    fn map_params(&self, map: &mut ParamMap<'_>) -> Result<Self, ModelError> {
        let mut out = IndexMap::with_capacity(self.len());
        for (key, item) in self {
            out.insert(key.clone(), item.map_params(map)?);
        }
        Ok(out)
    }
}

macro_rules! tuple {
    ($(($($idx:tt $name:ident),+))+) => {
        $(
            impl<$($name: Parameterized),+> Parameterized for ($($name,)+) {
                fn visit_params<'a>(&'a self, _origin: Origin<'a>, visit: &mut dyn FnMut(Origin<'a>, &'a Param)) {
                    $(self.$idx.visit_params(Origin::new("Tuple", FieldName::Index($idx)), visit);)+
                }

                fn map_params(&self, map: &mut ParamMap<'_>) -> Result<Self, ModelError> {
                    Ok(($(self.$idx.map_params(map)?,)+))
                }
            }
        )+
    };
}

tuple! {
    (0 A)
    (0 A, 1 B)
    (0 A, 1 B, 2 C)
    (0 A, 1 B, 2 C, 3 D)
    (0 A, 1 B, 2 C, 3 D, 4 E)
    (0 A, 1 B, 2 C, 3 D, 4 E, 5 F)
    (0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G)
    (0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traverse::{reconstruct, select, select_located};
    use serde_json::json;

    #[test]
    fn test_array_and_tuple_origins() {
        let object = ([Param::new(1), Param::new(2)], (0.5_f64, Param::new(3)));
        let located = select_located(&object);
        assert_eq!(located[0].origin, Origin::new("Array", FieldName::Index(0)));
        assert_eq!(located[1].origin, Origin::new("Array", FieldName::Index(1)));
        assert_eq!(located[2].origin, Origin::new("Tuple", FieldName::Index(1)));
    }

    #[test]
    fn test_pointers_are_transparent() {
        let object = vec![Arc::new(Param::new(1)), Arc::new(Param::new(2))];
        let located = select_located(&object);
        assert_eq!(located[1].origin, Origin::new("Vec", FieldName::Index(1)));

        let rebuilt = reconstruct(&object, vec![Param::new(5), Param::new(6)]).unwrap();
        assert_eq!(*rebuilt[0].value(), json!(5));
        assert_eq!(*rebuilt[1].value(), json!(6));
        assert_eq!(*object[0].value(), json!(1));
    }

    #[test]
    fn test_index_map_keeps_insertion_order() {
        let mut object = IndexMap::new();
        object.insert("z".to_string(), Param::new(1));
        object.insert("a".to_string(), Param::new(2));
        let values: Vec<_> = select(&object).iter().map(|p| p.value().clone()).collect();
        assert_eq!(values, vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_nested_options() {
        let object: Vec<Option<Option<Param>>> = vec![None, Some(None), Some(Some(Param::new(9)))];
        assert_eq!(select(&object).len(), 1);
        let rebuilt = reconstruct(&object, vec![Param::new(10)]).unwrap();
        assert_eq!(rebuilt[0], None);
        assert_eq!(rebuilt[1], Some(None));
        assert_eq!(rebuilt[2], Some(Some(Param::new(10))));
    }

    #[test]
    fn test_json_values_are_opaque() {
        let object = (json!({"value": 1}), Param::new(2));
        let rebuilt = reconstruct(&object, vec![Param::new(3)]).unwrap();
        assert_eq!(rebuilt.0, json!({"value": 1}));
        assert_eq!(rebuilt.1, Param::new(3));
    }
}
