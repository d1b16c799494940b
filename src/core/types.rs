//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Location`] - Where a contributor wants its fragment to land
//! - [`Fragment`] - An ordered run of command-line arguments
//!
//! # Location Grammar
//!
//! Locations travel as plain strings so contributors never need to agree on
//! anything but the literal:
//!
//! | Literal    | Meaning        |
//! |------------|----------------|
//! | `_begin`   | [`Location::Begin`] |
//! | `_end`     | [`Location::End`] |
//! | `>name`    | [`Location::After`] `name` |
//! | `<name`    | [`Location::Before`] `name` |
//!
//! # Examples
//!
//! ```
//! use composeweave::core::types::Location;
//!
//! let loc: Location = ">base".parse().unwrap();
//! assert_eq!(loc, Location::After("base".to_string()));
//! assert_eq!(loc.to_string(), ">base");
//!
//! assert!("badlocation".parse::<Location>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Literal for [`Location::Begin`].
pub const BEGIN: &str = "_begin";

/// Literal for [`Location::End`].
pub const END: &str = "_end";

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("unrecognized location '{0}' (expected _begin, _end, >name or <name)")]
    Unrecognized(String),

    #[error("location '{0}' is missing a reference name")]
    MissingReference(String),
}

/// A positional constraint on a registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Location {
    /// As close to the start as possible.
    Begin,
    /// As close to the end as possible.
    End,
    /// Strictly after the named entry.
    After(String),
    /// Strictly before the named entry.
    Before(String),
}

impl Location {
    /// Parse a location literal.
    ///
    /// # Errors
    ///
    /// Returns `LocationError` if the literal matches none of the four forms.
    pub fn parse(literal: &str) -> Result<Self, LocationError> {
        match literal {
            BEGIN => Ok(Location::Begin),
            END => Ok(Location::End),
            _ => {
                let location = if let Some(rest) = literal.strip_prefix('>') {
                    Location::After(rest.to_string())
                } else if let Some(rest) = literal.strip_prefix('<') {
                    Location::Before(rest.to_string())
                } else {
                    return Err(LocationError::Unrecognized(literal.to_string()));
                };

                match location.reference() {
                    Some("") => Err(LocationError::MissingReference(literal.to_string())),
                    _ => Ok(location),
                }
            }
        }
    }

    /// The entry this location points at, if it is relative.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Location::After(r) | Location::Before(r) => Some(r),
            Location::Begin | Location::End => None,
        }
    }

    /// Whether this is a `Begin` or `End` anchor.
    pub fn is_anchor(&self) -> bool {
        matches!(self, Location::Begin | Location::End)
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Location {
    type Error = LocationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.to_string()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Begin => f.write_str(BEGIN),
            Location::End => f.write_str(END),
            Location::After(r) => write!(f, ">{r}"),
            Location::Before(r) => write!(f, "<{r}"),
        }
    }
}

/// An ordered run of command-line arguments contributed by one plugin.
///
/// The registry never looks inside a fragment; only the compose runner
/// flattens fragments into an argument vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fragment(Vec<String>);

impl Fragment {
    /// Create a fragment from its arguments.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(args.into_iter().map(Into::into).collect())
    }

    /// Append `-f <path>` to the fragment.
    pub fn with_file(mut self, path: impl fmt::Display) -> Self {
        self.0.push("-f".to_string());
        self.0.push(path.to_string());
        self
    }

    /// The arguments in order.
    pub fn args(&self) -> &[String] {
        &self.0
    }

    /// Consume the fragment, returning its arguments.
    pub fn into_args(self) -> Vec<String> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Fragment {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a Fragment {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}
