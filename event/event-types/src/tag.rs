//! Input tags naming event products.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EventError, EventResult};

/// Reference to an event product: `label[:instance[:process]]`.
///
/// # Example
///
/// ```
/// use event_types::InputTag;
///
/// let tag: InputTag = "photonIDValueMapProducer:phoSMajor".parse().unwrap();
/// assert_eq!(tag.label(), "photonIDValueMapProducer");
/// assert_eq!(tag.instance(), "phoSMajor");
/// assert_eq!(tag.process(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct InputTag {
    label: String,
    instance: String,
    process: String,
}

impl InputTag {
    /// Creates a tag from its three parts.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        instance: impl Into<String>,
        process: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            instance: instance.into(),
            process: process.into(),
        }
    }

    /// Creates a tag with only a module label.
    #[must_use]
    pub fn label_only(label: impl Into<String>) -> Self {
        Self::new(label, "", "")
    }

    /// Parses `label[:instance[:process]]`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidInputTag`] for an empty label or more than
    /// three parts.
    pub fn parse(s: &str) -> EventResult<Self> {
        let mut parts = s.split(':');
        let label = parts.next().unwrap_or_default().trim();
        if label.is_empty() {
            return Err(EventError::InvalidInputTag(s.to_string()));
        }
        let instance = parts.next().unwrap_or_default().trim();
        let process = parts.next().unwrap_or_default().trim();
        if parts.next().is_some() {
            return Err(EventError::InvalidInputTag(s.to_string()));
        }
        Ok(Self::new(label, instance, process))
    }

    /// Module label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Product instance name; empty when unset.
    #[must_use]
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Process name; empty matches any process.
    #[must_use]
    pub fn process(&self) -> &str {
        &self.process
    }
}

impl fmt::Display for InputTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)?;
        if !self.instance.is_empty() || !self.process.is_empty() {
            write!(f, ":{}", self.instance)?;
        }
        if !self.process.is_empty() {
            write!(f, ":{}", self.process)?;
        }
        Ok(())
    }
}

impl FromStr for InputTag {
    type Err = EventError;

    fn from_str(s: &str) -> EventResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for InputTag {
    type Error = EventError;

    fn try_from(s: String) -> EventResult<Self> {
        Self::parse(&s)
    }
}

impl From<InputTag> for String {
    fn from(tag: InputTag) -> Self {
        tag.to_string()
    }
}
