//! Fill secret fields of arbitrary nested structs.
//!
//! A struct opts in by implementing [`Bindable`], returning its field table
//! in declaration order.  Each entry says what the field is:
//!
//! - [`Field::secret`]: a slot tagged with the secret name to resolve into it.
//!   Only `String` slots can hold a value; tagging any other type is an
//!   `UnsupportedFieldType` error.
//! - [`Field::nested`]: a struct field, walked in place.
//! - [`Field::optional`]: an `Option<Box<T>>` field, walked through the box
//!   when present.  The option itself is never reassigned.
//! - [`Field::plain`]: an untagged field, skipped.
//!
//! Fields left out of the table are never visited.
//!
//! ```
//! use untold::binder::{bind, Bindable, Field};
//!
//! #[derive(Default)]
//! struct Database {
//!     password: String,
//! }
//!
//! impl Bindable for Database {
//!     fn fields(&mut self) -> Vec<Field<'_>> {
//!         vec![Field::secret("db_password", &mut self.password)]
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Config {
//!     host: String,
//!     database: Database,
//! }
//!
//! impl Bindable for Config {
//!     fn fields(&mut self) -> Vec<Field<'_>> {
//!         vec![Field::plain(), Field::nested(&mut self.database)]
//!     }
//! }
//!
//! let mut config = Config::default();
//! bind(&mut config, |name| Ok(format!("<{name}>"))).unwrap();
//! assert_eq!(config.database.password, "<db_password>");
//! assert_eq!(config.host, "");
//! ```

use crate::errors::{Result, UntoldError};

/// Nesting deeper than this is reported as `CyclicStructure`.
pub const MAX_DEPTH: usize = 64;

/// A struct whose fields can be filled with secrets.
pub trait Bindable {
    /// The field table, in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;
}

/// A field type that may carry a binding tag.
pub trait SecretSlot {
    /// The string storage to fill, or `None` if this type cannot hold a
    /// secret.
    fn as_secret_mut(&mut self) -> Option<&mut String>;
}

impl SecretSlot for String {
    fn as_secret_mut(&mut self) -> Option<&mut String> {
        Some(self)
    }
}

macro_rules! unsupported_slot {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SecretSlot for $ty {
                fn as_secret_mut(&mut self) -> Option<&mut String> {
                    None
                }
            }
        )*
    };
}

unsupported_slot!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    Vec<u8>, Option<String>
);

/// One entry of a [`Bindable`] field table.
pub enum Field<'a> {
    Secret {
        tag: &'a str,
        type_name: &'static str,
        slot: Option<&'a mut String>,
    },
    Record(&'a mut dyn Bindable),
    Skip,
}

impl<'a> Field<'a> {
    /// A field tagged with the secret name `tag`.
    pub fn secret<S: SecretSlot>(tag: &'a str, slot: &'a mut S) -> Self {
        Field::Secret {
            tag,
            type_name: std::any::type_name::<S>(),
            slot: slot.as_secret_mut(),
        }
    }

    /// A nested struct, walked in place.
    pub fn nested<B: Bindable>(record: &'a mut B) -> Self {
        Field::Record(record)
    }

    /// An owning pointer to a struct; walked only when present.
    pub fn optional<B: Bindable>(pointer: &'a mut Option<Box<B>>) -> Self {
        match pointer {
            Some(record) => Field::Record(&mut **record),
            None => Field::Skip,
        }
    }

    /// An untagged field.
    pub fn plain() -> Self {
        Field::Skip
    }
}

/// Walk `target` depth-first and fill every tagged field with
/// `resolve(tag)`.
///
/// Stops at the first error; fields visited before it keep their new
/// values.
pub fn bind<B, F>(target: &mut B, mut resolve: F) -> Result<()>
where
    B: Bindable + ?Sized,
    F: FnMut(&str) -> Result<String>,
{
    walk(target.fields(), &mut resolve, 0)
}

fn walk(
    fields: Vec<Field<'_>>,
    resolve: &mut dyn FnMut(&str) -> Result<String>,
    depth: usize,
) -> Result<()> {
    if depth >= MAX_DEPTH {
        return Err(UntoldError::CyclicStructure(MAX_DEPTH));
    }

    for field in fields {
        match field {
            Field::Secret {
                tag,
                type_name,
                slot,
            } => {
                let slot = slot.ok_or_else(|| UntoldError::UnsupportedFieldType {
                    tag: tag.to_string(),
                    type_name,
                })?;
                *slot = resolve(tag)?;
            }
            Field::Record(record) => walk(record.fields(), resolve, depth + 1)?,
            Field::Skip => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Holder {
        value: String,
    }

    impl Bindable for Holder {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::secret("value", &mut self.value)]
        }
    }

    fn echo(name: &str) -> Result<String> {
        Ok(name.to_string())
    }

    #[test]
    fn simple_bind() {
        let mut h = Holder::default();
        bind(&mut h, echo).unwrap();
        assert_eq!(h.value, "value");
    }

    #[test]
    fn resolver_error_is_returned() {
        let mut h = Holder::default();
        let result = bind(&mut h, |name| {
            Err(UntoldError::SecretNotFound {
                name: name.to_string(),
                environment: "test".to_string(),
            })
        });
        assert!(matches!(result, Err(UntoldError::SecretNotFound { .. })));
        assert_eq!(h.value, "");
    }

    struct Port {
        port: u16,
    }

    impl Bindable for Port {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::secret("port", &mut self.port)]
        }
    }

    #[test]
    fn tagged_non_string_is_unsupported() {
        let mut p = Port { port: 8080 };
        let err = bind(&mut p, echo).unwrap_err();
        assert!(matches!(
            err,
            UntoldError::UnsupportedFieldType { ref tag, type_name: "u16" } if tag == "port"
        ));
        assert_eq!(p.port, 8080);
    }

    #[test]
    fn works_through_trait_objects() {
        let mut h = Holder::default();
        let target: &mut dyn Bindable = &mut h;
        bind(target, echo).unwrap();
        assert_eq!(h.value, "value");
    }
}
