//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs carry these wrappers instead of raw primitives so that
//! identifiers, text values and numeric constraints are enforced at the
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidateUrl;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A floating point value was NaN or infinite.
    #[error("{0} must be a finite number")]
    NonFiniteNumber(&'static str),
    /// An image reference was neither an absolute path nor a valid URL.
    #[error("{0} must be an absolute path or a valid URL")]
    InvalidReference(&'static str),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let value = value.into();
    if value.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(value)
    }
}

/// Wrapper for non-empty strings, kept exactly as supplied.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Rejects empty inputs; surrounding whitespace is preserved.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        Self::new_for_field(value, "value")
    }

    /// Same as [`Self::new`] but with field-specific error context.
    pub fn new_for_field<S: Into<String>>(
        value: S,
        field: &'static str,
    ) -> Result<Self, TypeConstraintError> {
        require_non_empty(value, field).map(Self)
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! string_newtype_common {
    ($name:ident) => {
        impl $name {
            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new_for_field(value, $field)?;
                Ok(Self(inner.into_inner()))
            }
        }

        string_newtype_common!($name);
    };
}

/// Opaque product identifier.
///
/// Fresh identifiers are random UUIDs rendered in hyphenated form. Lookups
/// accept any non-empty string; a string that names no row is simply not
/// found. Ordering is lexicographic and therefore carries no notion of
/// creation time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wraps an existing identifier, rejecting empty input.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        require_non_empty(value, "product id").map(Self)
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

string_newtype_common!(ProductId);

non_empty_string_newtype!(
    ProductName,
    "Product display name enforcing non-empty values.",
    "name"
);
non_empty_string_newtype!(
    ProductNameLc,
    "Caller supplied lowercase variant of the product name.",
    "name_lc"
);
non_empty_string_newtype!(
    CategoryName,
    "Category label enforcing non-empty values.",
    "category"
);

/// Free-form product description. Empty strings are kept as-is.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProductDescription(String);

impl ProductDescription {
    /// Wraps any description text.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        Ok(Self(value.into()))
    }
}

string_newtype_common!(ProductDescription);

/// Reference to a stored product image.
///
/// Either an absolute path served by this application (`/static/...`) or a
/// fully qualified URL.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Constructs a reference, accepting absolute paths and valid URLs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = require_non_empty(value, "image url")?;
        if value.starts_with('/') || value.as_str().validate_url() {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidReference("image url"))
        }
    }

    /// Whether this reference is a path relative to the application origin.
    pub fn is_relative(&self) -> bool {
        self.0.starts_with('/')
    }

    /// Prefixes relative references with `base_url`; absolute URLs are
    /// returned unchanged.
    pub fn absolute(&self, base_url: &str) -> Self {
        if self.is_relative() {
            Self(format!("{}{}", base_url.trim_end_matches('/'), self.0))
        } else {
            self.clone()
        }
    }
}

string_newtype_common!(ImageUrl);

/// Product price in standard currency units.
///
/// Any finite value is accepted, including zero and negative amounts.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct ProductPrice(f64);

impl ProductPrice {
    /// Constructs a finite price.
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonFiniteNumber("price"))
        }
    }

    /// Returns the raw `f64` value.
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Display for ProductPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for ProductPrice {
    type Error = TypeConstraintError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductPrice> for f64 {
    fn from(value: ProductPrice) -> Self {
        value.0
    }
}

impl PartialEq<f64> for ProductPrice {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

impl PartialEq<ProductPrice> for f64 {
    fn eq(&self, other: &ProductPrice) -> bool {
        *self == other.0
    }
}
