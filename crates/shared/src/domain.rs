use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ParseDomainError, StepOutOfRange};

/// Position in the six-step BTR preparation workflow. Always within 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Step(u8);

impl Step {
    pub const COUNT: u8 = 6;
    pub const FIRST: Step = Step(1);
    pub const LAST: Step = Step(Self::COUNT);

    /// For constants; fails to compile when `number` is out of range.
    pub const fn from_const(number: u8) -> Step {
        assert!(number >= 1 && number <= Self::COUNT, "step out of range");
        Step(number)
    }

    pub fn new(number: u8) -> Result<Self, StepOutOfRange> {
        Self::try_from(number)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn next(self) -> Option<Step> {
        (self.0 < Self::COUNT).then(|| Step(self.0 + 1))
    }

    pub fn prev(self) -> Option<Step> {
        (self.0 > 1).then(|| Step(self.0 - 1))
    }

    pub fn all() -> impl DoubleEndedIterator<Item = Step> + ExactSizeIterator {
        (1..=Self::COUNT).map(Step)
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u8> for Step {
    type Error = StepOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=Self::COUNT).contains(&value) {
            Ok(Step(value))
        } else {
            Err(StepOutOfRange(i64::from(value)))
        }
    }
}

impl From<Step> for u8 {
    fn from(value: Step) -> Self {
        value.0
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Step {
    type Err = ParseDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| ParseDomainError::NotAStep(s.to_string()))?;
        let step = u8::try_from(value)
            .map_err(|_| StepOutOfRange(value))
            .and_then(Step::try_from)?;
        Ok(step)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Afolu,
    Energy,
    Waste,
    Ipuu,
}

impl Sector {
    pub const ALL: [Sector; 4] = [Sector::Afolu, Sector::Energy, Sector::Waste, Sector::Ipuu];

    pub fn id(self) -> &'static str {
        match self {
            Sector::Afolu => "afolu",
            Sector::Energy => "energy",
            Sector::Waste => "waste",
            Sector::Ipuu => "ipuu",
        }
    }

    /// Upper-cased identifier, as shown in notices and reports.
    pub fn label(self) -> String {
        self.id().to_ascii_uppercase()
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Sector {
    type Err = ParseDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Sector::ALL
            .into_iter()
            .find(|sector| sector.id() == wanted)
            .ok_or_else(|| ParseDomainError::UnknownSector(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    #[default]
    Dashboard,
    BtrProcess,
    Data,
    Reports,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Dashboard,
        Section::BtrProcess,
        Section::Data,
        Section::Reports,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::BtrProcess => "btr-process",
            Section::Data => "data",
            Section::Reports => "reports",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::BtrProcess => "BTR Process Navigator",
            Section::Data => "Data Repository",
            Section::Reports => "Report Generator",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Section {
    type Err = ParseDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Section::ALL
            .into_iter()
            .find(|section| section.id() == wanted)
            .ok_or_else(|| ParseDomainError::UnknownSection(s.to_string()))
    }
}

/// Captured value of a form field: a single string, or the checked values of
/// a checkbox group in form order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Multi(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            FieldValue::Multi(_) => None,
        }
    }

    pub fn as_multi(&self) -> Option<&[String]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::Multi(values) => Some(values),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(value) => value.trim().is_empty(),
            FieldValue::Multi(values) => values.is_empty(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::Multi(value)
    }
}

/// Step form data keyed by field identifier (or checkbox group name).
pub type FieldMap = BTreeMap<String, FieldValue>;

pub type SectorFields = BTreeMap<String, String>;
