//! Validated scalar field values.
//!
//! # Invariants
//! - Every value type can only be built through its validating constructor
//!   (or serde, which routes through the same constructor).
//! - Input is never trimmed or normalized; invalid text is rejected as-is.
//! - Optional contact fields use the empty string as "not provided".

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+( [A-Za-z0-9]+)*$").expect("valid name regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{3,}$").expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9]+([+_.\-][A-Za-z0-9]+)*@([A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?\.)*[A-Za-z0-9][A-Za-z0-9\-]*[A-Za-z0-9]$",
    )
    .expect("valid email regex")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid tag regex"));

/// Field category reported by validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    Phone,
    Email,
    Address,
    Memo,
    Tag,
    Subject,
    Date,
}

impl FieldKind {
    /// Display name used in user-facing messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Phone => "Phone",
            Self::Email => "Email",
            Self::Address => "Address",
            Self::Memo => "Memo",
            Self::Tag => "Tag",
            Self::Subject => "Subject",
            Self::Date => "Date",
        }
    }
}

/// A field value violated its format constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FieldKind,
    /// The violated constraint, phrased for the end user.
    pub constraint: &'static str,
}

impl FieldError {
    pub fn new(field: FieldKind, constraint: &'static str) -> Self {
        Self { field, constraint }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.constraint)
    }
}

impl Error for FieldError {}

macro_rules! text_field {
    ($(#[$meta:meta])* $name:ident, $kind:expr, $message:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub const MESSAGE_CONSTRAINTS: &'static str = $message;

            pub fn as_str(&self) -> &str {
                &self.0
            }

            fn checked(value: String, valid: bool) -> Result<Self, FieldError> {
                if valid {
                    Ok(Self(value))
                } else {
                    Err(FieldError::new($kind, Self::MESSAGE_CONSTRAINTS))
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = FieldError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

text_field!(
    /// Student display name. Also the student's uniqueness key.
    Name,
    FieldKind::Name,
    "Names should only contain alphanumeric characters and spaces, and it should not be blank"
);

impl Name {
    pub fn new(value: impl Into<String>) -> Result<Self, FieldError> {
        let value = value.into();
        let valid = NAME_RE.is_match(&value);
        Self::checked(value, valid)
    }

    /// Case-insensitive comparison used by name lookups.
    pub fn matches_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

text_field!(
    Phone,
    FieldKind::Phone,
    "Phone numbers should only contain digits, optionally prefixed by a single '+', and be at least 3 digits long"
);

impl Phone {
    pub fn new(value: impl Into<String>) -> Result<Self, FieldError> {
        let value = value.into();
        let valid = value.is_empty() || PHONE_RE.is_match(&value);
        Self::checked(value, valid)
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

text_field!(
    Email,
    FieldKind::Email,
    "Emails should be of the format local-part@domain, where the local-part holds alphanumerics \
     joined by + _ . - and the domain ends with a label of at least 2 alphanumeric characters"
);

impl Email {
    pub fn new(value: impl Into<String>) -> Result<Self, FieldError> {
        let value = value.into();
        let valid = value.is_empty() || EMAIL_RE.is_match(&value);
        Self::checked(value, valid)
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

text_field!(
    Address,
    FieldKind::Address,
    "Addresses can take any values, and it should not begin with whitespace"
);

impl Address {
    pub fn new(value: impl Into<String>) -> Result<Self, FieldError> {
        let value = value.into();
        let valid = starts_with_visible_char(&value) || value.is_empty();
        Self::checked(value, valid)
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

text_field!(
    /// Free-form tutor notes about a student.
    Memo,
    FieldKind::Memo,
    "Memos can take any values, and it should not begin with whitespace"
);

impl Memo {
    pub fn new(value: impl Into<String>) -> Result<Self, FieldError> {
        let value = value.into();
        let valid = starts_with_visible_char(&value) || value.is_empty();
        Self::checked(value, valid)
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

text_field!(Tag, FieldKind::Tag, "Tag names should be alphanumeric");

impl Tag {
    pub fn new(value: impl Into<String>) -> Result<Self, FieldError> {
        let value = value.into();
        let valid = TAG_RE.is_match(&value);
        Self::checked(value, valid)
    }
}

text_field!(
    Subject,
    FieldKind::Subject,
    "Subjects can take any values, and it should not be blank"
);

impl Subject {
    pub fn new(value: impl Into<String>) -> Result<Self, FieldError> {
        let value = value.into();
        let valid = starts_with_visible_char(&value);
        Self::checked(value, valid)
    }
}

fn starts_with_visible_char(value: &str) -> bool {
    value.chars().next().is_some_and(|first| !first.is_whitespace())
}
