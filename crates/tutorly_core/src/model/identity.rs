//! Student lookup keys.
//!
//! Callers refer to students either by numeric id or by full name. Parsing
//! of raw user input is the command parser's job; `Identity::parse` is the
//! shared helper it uses.

use crate::model::fields::{FieldError, Name};
use crate::model::ids::PersonId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structured reference to one student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    ById(u32),
    ByName(Name),
}

/// Raw identity input could not be turned into an `Identity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityParseError {
    Blank,
    InvalidId(String),
    InvalidName(FieldError),
}

impl Display for IdentityParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "student identifier must not be blank"),
            Self::InvalidId(value) => {
                write!(f, "student ID must be a positive integer, got `{value}`")
            }
            Self::InvalidName(err) => write!(f, "{err}"),
        }
    }
}

impl Error for IdentityParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidName(err) => Some(err),
            _ => None,
        }
    }
}

impl Identity {
    /// Parses user input: positive integers become `ById`, anything else must
    /// be a valid name.
    pub fn parse(input: &str) -> Result<Self, IdentityParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(IdentityParseError::Blank);
        }

        let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
        if digits.chars().all(|c| c.is_ascii_digit()) {
            return match trimmed.parse::<u32>() {
                Ok(id) if id > 0 => Ok(Self::ById(id)),
                _ => Err(IdentityParseError::InvalidId(trimmed.to_string())),
            };
        }

        Name::new(trimmed)
            .map(Self::ByName)
            .map_err(IdentityParseError::InvalidName)
    }
}

impl From<PersonId> for Identity {
    fn from(value: PersonId) -> Self {
        Self::ById(value.value())
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ById(id) => write!(f, "{id}"),
            Self::ByName(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Identity, IdentityParseError};
    use crate::model::fields::Name;

    #[test]
    fn parses_positive_integers_as_ids() {
        assert_eq!(Identity::parse(" 42 ").expect("id"), Identity::ById(42));
    }

    #[test]
    fn rejects_zero_and_negative_ids() {
        assert_eq!(
            Identity::parse("0").expect_err("zero id"),
            IdentityParseError::InvalidId("0".to_string())
        );
        assert_eq!(
            Identity::parse("-3").expect_err("negative id"),
            IdentityParseError::InvalidId("-3".to_string())
        );
        assert!(matches!(
            Identity::parse("99999999999").expect_err("overflow"),
            IdentityParseError::InvalidId(_)
        ));
    }

    #[test]
    fn parses_other_input_as_name() {
        let expected = Name::new("Alice Pauline").expect("valid name");
        assert_eq!(
            Identity::parse("Alice Pauline").expect("name"),
            Identity::ByName(expected)
        );
        assert!(matches!(
            Identity::parse("R!chel").expect_err("invalid name"),
            IdentityParseError::InvalidName(_)
        ));
        assert_eq!(
            Identity::parse("   ").expect_err("blank"),
            IdentityParseError::Blank
        );
    }
}
