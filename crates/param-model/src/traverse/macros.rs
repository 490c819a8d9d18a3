/// Implements [`Parameterized`](crate::Parameterized) for a named-field struct.
///
/// List every field of the struct, in declaration order; fields are walked in
/// the order given. A field marked `#[carry]` is cloned through untouched and
/// never searched for Params. Leaving a field out, or naming one the struct
/// does not have, fails to compile.
///
/// Type parameters are supported and receive a `Parameterized` bound.
///
/// # Example
///
/// ```
/// use param_model::{parameterized, select, Param};
///
/// #[derive(Clone)]
/// struct Spring<K> {
///     stiffness: K,
///     label: String,
///     rest_length: Param,
/// }
///
/// parameterized!(Spring<K> { stiffness, #[carry] label, rest_length });
///
/// let spring = Spring {
///     stiffness: Param::new(40.0),
///     label: "front".to_string(),
///     rest_length: Param::new(0.5),
/// };
/// assert_eq!(select(&spring).len(), 2);
/// ```
///
/// ```compile_fail
/// use param_model::{parameterized, Param};
///
/// #[derive(Clone)]
/// struct Spring {
///     stiffness: Param,
///     rest_length: Param,
/// }
///
/// parameterized!(Spring { stiffness });
/// ```
#[macro_export]
macro_rules! parameterized {
    (
        $name:ident $(< $($gen:ident),+ $(,)? >)?
        { $($(#[$mode:ident])? $field:ident),* $(,)? }
    ) => {
        impl $(< $($gen: $crate::Parameterized),+ >)? $crate::Parameterized
            for $name $(< $($gen),+ >)?
        {
            fn visit_params<'a>(
                &'a self,
                _origin: $crate::Origin<'a>,
                _visit: &mut dyn ::core::ops::FnMut($crate::Origin<'a>, &'a $crate::Param),
            ) {
                $( $crate::parameterized!(@visit self, _visit, $name, $field $(, $mode)?); )*
            }

            fn map_params(
                &self,
                _map: &mut $crate::ParamMap<'_>,
            ) -> ::core::result::Result<Self, $crate::ModelError> {
                ::core::result::Result::Ok($name {
                    $( $field: $crate::parameterized!(@map self, _map, $field $(, $mode)?), )*
                })
            }
        }
    };

    (@visit $this:ident, $visit:ident, $name:ident, $field:ident) => {
        $crate::Parameterized::visit_params(
            &$this.$field,
            $crate::Origin::new(
                ::core::stringify!($name),
                $crate::FieldName::Named(::core::stringify!($field)),
            ),
            $visit,
        )
    };
    (@visit $this:ident, $visit:ident, $name:ident, $field:ident, carry) => {};

    (@map $this:ident, $map:ident, $field:ident) => {
        $crate::Parameterized::map_params(&$this.$field, $map)?
    };
    (@map $this:ident, $map:ident, $field:ident, carry) => {
        ::core::clone::Clone::clone(&$this.$field)
    };
}
