//! Static record schemas.
//!
//! Each resource kind declares its attributes once, at compile time; the
//! declared list stays enumerable from the type and drives both directions of
//! the remote field mapping. The [`zoho_record!`] macro generates the struct
//! and the [`RecordType`] impl from a field list.
//!
//! [`zoho_record!`]: crate::zoho_record

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::records::attributes::AttributeMapper;

/// A record type bound to one remote resource.
pub trait RecordType: Sized + Send {
    /// Remote collection name, e.g. `"Leads"`.
    fn resource() -> &'static str;

    /// Declared local attribute names, in declaration order.
    fn attributes() -> &'static [&'static str];

    /// Explicit local → remote overrides. Attributes not listed here follow
    /// the capitalization convention.
    fn translation() -> &'static [(&'static str, &'static str)] {
        &[]
    }

    fn mapper() -> AttributeMapper {
        AttributeMapper::new(Self::translation())
    }

    /// Materialize a record from one raw remote field map.
    fn from_remote(data: &Value) -> Result<Self>;

    /// Serialize the set attributes back into a remote field map.
    fn to_remote(&self) -> Result<Value>;

    /// The record's identity, once the server has assigned one.
    fn id(&self) -> Option<&str>;
}

/// Pull one field out of a remote map. Absent and `null` both become `None`;
/// every present value converts exactly, so `""` stays an empty string and
/// `false` stays a boolean.
pub fn read_field<T: DeserializeOwned>(data: &Value, field: &str) -> Result<Option<T>> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
    }
}

/// Declare a record type: a struct of optional fields plus its
/// [`RecordType`] impl.
///
/// Every record must declare an `id: String` field. A field may pin its
/// remote name with `=> "Remote_Name"`; the rest follow the capitalization
/// convention.
///
/// ```
/// zoho_hub::zoho_record! {
///     pub struct Lead("Leads") {
///         id: String => "id",
///         full_name: String,
///         email: String,
///     }
/// }
///
/// # use zoho_hub::RecordType;
/// assert_eq!(Lead::attributes(), &["id", "full_name", "email"]);
/// ```
#[macro_export]
macro_rules! zoho_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident ($resource:literal) {
            $( $field:ident : $ty:ty $(=> $remote:literal)? ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $( pub $field: Option<$ty>, )*
        }

        impl $crate::RecordType for $name {
            fn resource() -> &'static str {
                $resource
            }

            fn attributes() -> &'static [&'static str] {
                &[ $( stringify!($field), )* ]
            }

            fn translation() -> &'static [(&'static str, &'static str)] {
                &[ $( $( (stringify!($field), $remote), )? )* ]
            }

            fn from_remote(data: &::serde_json::Value) -> $crate::Result<Self> {
                let mapper = <Self as $crate::RecordType>::mapper();
                Ok(Self {
                    $(
                        $field: $crate::records::read_field(
                            data,
                            &mapper.local_to_remote(stringify!($field)),
                        )?,
                    )*
                })
            }

            fn to_remote(&self) -> $crate::Result<::serde_json::Value> {
                let mapper = <Self as $crate::RecordType>::mapper();
                let mut map = ::serde_json::Map::new();
                $(
                    if let Some(value) = &self.$field {
                        map.insert(
                            mapper.local_to_remote(stringify!($field)),
                            ::serde_json::to_value(value)?,
                        );
                    }
                )*
                Ok(::serde_json::Value::Object(map))
            }

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    crate::zoho_record! {
        pub struct TestRecord("Leads") {
            id: String => "id",
            my_string: String,
            my_bool: bool,
        }
    }

    #[test]
    fn attributes_are_enumerable_in_declaration_order() {
        assert_eq!(TestRecord::attributes(), &["id", "my_string", "my_bool"]);
        assert_eq!(TestRecord::resource(), "Leads");
        assert_eq!(TestRecord::translation(), &[("id", "id")]);
    }

    #[test]
    fn empty_string_and_false_survive_materialization() {
        let record =
            TestRecord::from_remote(&json!({ "My_String": "", "My_Bool": false, "id": "1" }))
                .unwrap();
        assert_eq!(record.my_string.as_deref(), Some(""));
        assert_eq!(record.my_bool, Some(false));
        assert_eq!(record.id(), Some("1"));
    }

    #[test]
    fn absent_and_null_fields_become_none() {
        let record = TestRecord::from_remote(&json!({ "My_Bool": null })).unwrap();
        assert_eq!(record.my_string, None);
        assert_eq!(record.my_bool, None);
        assert_eq!(record.id(), None);
    }

    #[test]
    fn to_remote_skips_unset_fields_and_translates_names() {
        let record = TestRecord {
            id: Some("42".to_string()),
            my_string: Some("".to_string()),
            my_bool: None,
        };
        let remote = record.to_remote().unwrap();
        assert_eq!(remote, json!({ "id": "42", "My_String": "" }));
    }
}
