//! Field-level validation.
//!
//! A [`Validator`] walks the declared constraints of one structure and
//! accumulates every violation instead of stopping at the first one. Nested
//! structures are validated through [`Validate`] and their violations are
//! merged into the parent with a field prefix (`links.self`, `items[2].id`).
//!
//! # Example
//!
//! ```
//! use kestrel_core::{Format, Validator};
//!
//! let id: Option<String> = None;
//! let entity = Some("not a uri".to_string());
//!
//! let mut v = Validator::new("AspectRT");
//! v.require("id", id.as_ref())
//!     .format("entity", entity.as_deref(), Format::Uri);
//! let errors = v.finish().expect_err("two violations");
//! assert_eq!(errors.fields(), vec!["id", "entity"]);
//! ```

use std::fmt;

use derive_more::{Display, Error};

/// Semantic string formats checked by [`Validator::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Format {
    /// Absolute URI (RFC 3986), URNs included.
    #[display("uri")]
    Uri,
    /// RFC 3339 date-time with offset.
    #[display("date-time")]
    DateTime,
    /// RFC 4122 UUID.
    #[display("uuid")]
    Uuid,
}

impl Format {
    /// Returns `true` if `value` parses under this format's grammar.
    #[must_use]
    pub fn matches(self, value: &str) -> bool {
        match self {
            Self::Uri => url::Url::parse(value).is_ok(),
            Self::DateTime => chrono::DateTime::parse_from_rfc3339(value).is_ok(),
            Self::Uuid => uuid::Uuid::parse_str(value).is_ok(),
        }
    }
}

/// A single constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ValidationError {
    /// A mandatory attribute is absent.
    #[display("\"{field}\" is missing from {context}")]
    MissingField {
        /// Field path.
        field: String,
        /// Name of the enclosing structure.
        context: String,
    },

    /// A present attribute does not parse under its declared format.
    #[display("\"{field}\" must be formatted as {format} but got value {value:?}")]
    InvalidFormat {
        /// Field path.
        field: String,
        /// Offending value.
        value: String,
        /// Expected format.
        format: Format,
    },

    /// A value is not one of the declared enumeration members.
    #[display("value of \"{field}\" must be one of {allowed:?} but got value {value:?}")]
    InvalidEnumValue {
        /// Field path.
        field: String,
        /// Offending value.
        value: String,
        /// Accepted values.
        allowed: Vec<&'static str>,
    },

    /// An integer is outside its declared bounds.
    #[display("\"{field}\" must be between {min} and {max} but got value {value}")]
    OutOfRange {
        /// Field path.
        field: String,
        /// Offending value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
}

impl ValidationError {
    /// Create a missing-field error.
    #[must_use]
    pub fn missing(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Create an invalid-format error.
    #[must_use]
    pub fn invalid_format(field: impl Into<String>, value: impl Into<String>, format: Format) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            value: value.into(),
            format,
        }
    }

    /// Create an invalid-enum-value error.
    #[must_use]
    pub fn invalid_enum_value(
        field: impl Into<String>,
        value: impl Into<String>,
        allowed: &[&'static str],
    ) -> Self {
        Self::InvalidEnumValue {
            field: field.into(),
            value: value.into(),
            allowed: allowed.to_vec(),
        }
    }

    /// The path of the offending field.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::InvalidEnumValue { field, .. }
            | Self::OutOfRange { field, .. } => field,
        }
    }

    fn prefixed(mut self, prefix: &str) -> Self {
        let field = match &mut self {
            Self::MissingField { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::InvalidEnumValue { field, .. }
            | Self::OutOfRange { field, .. } => field,
        };
        *field = format!("{prefix}.{field}");
        self
    }
}

/// Every violation found while validating one structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Create an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns `true` if no violation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the violations in the order they were found.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Paths of the offending fields.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(ValidationError::field).collect()
    }

    /// Record a violation.
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Merge another collection into this one.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Types with declared field constraints.
pub trait Validate {
    /// Check every constraint, returning all violations at once.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Accumulates violations for one structure.
#[derive(Debug)]
#[must_use]
pub struct Validator {
    context: &'static str,
    errors: ValidationErrors,
}

impl Validator {
    /// Start validating the structure named `context`.
    pub const fn new(context: &'static str) -> Self {
        Self {
            context,
            errors: ValidationErrors::new(),
        }
    }

    /// The attribute must be present.
    pub fn require<T: ?Sized>(&mut self, field: &str, value: Option<&T>) -> &mut Self {
        self.require_present(field, value.is_some())
    }

    /// Presence check for callers that only know whether an attribute is set.
    pub fn require_present(&mut self, field: &str, present: bool) -> &mut Self {
        if !present {
            self.errors.push(ValidationError::missing(field, self.context));
        }
        self
    }

    /// When present, the attribute must match `format`.
    pub fn format(&mut self, field: &str, value: Option<&str>, format: Format) -> &mut Self {
        if let Some(value) = value
            && !format.matches(value)
        {
            self.errors
                .push(ValidationError::invalid_format(field, value, format));
        }
        self
    }

    /// When present, the attribute must be one of `allowed`.
    pub fn one_of(&mut self, field: &str, value: Option<&str>, allowed: &[&'static str]) -> &mut Self {
        if let Some(value) = value
            && !allowed.contains(&value)
        {
            self.errors
                .push(ValidationError::invalid_enum_value(field, value, allowed));
        }
        self
    }

    /// When present, the attribute must lie in `min..=max`.
    pub fn range(&mut self, field: &str, value: Option<i64>, min: i64, max: i64) -> &mut Self {
        if let Some(value) = value
            && !(min..=max).contains(&value)
        {
            self.errors.push(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                min,
                max,
            });
        }
        self
    }

    /// When present, validate a nested structure under `field`.
    pub fn nested<V: Validate>(&mut self, field: &str, value: Option<&V>) -> &mut Self {
        if let Some(Err(errors)) = value.map(Validate::validate) {
            for error in errors {
                self.errors.push(error.prefixed(field));
            }
        }
        self
    }

    /// Validate every element of a list under `field[index]`.
    pub fn each<V: Validate>(&mut self, field: &str, items: &[V]) -> &mut Self {
        for (index, item) in items.iter().enumerate() {
            self.nested(&format!("{field}[{index}]"), Some(item));
        }
        self
    }

    /// Merge violations found by another validation pass.
    pub fn merge(&mut self, result: Result<(), ValidationErrors>) -> &mut Self {
        if let Err(errors) = result {
            self.errors.merge(errors);
        }
        self
    }

    /// Finish validation.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}
