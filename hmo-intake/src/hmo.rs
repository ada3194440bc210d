//! The fixed HMO and membership-tier vocabularies.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::language::Language;

/// Israeli health funds supported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Hmo {
    Maccabi,
    Meuhedet,
    Clalit,
}

/// Service tier within an HMO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MembershipTier {
    Gold,
    Silver,
    Bronze,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl Hmo {
    pub const ALL: [Hmo; 3] = [Hmo::Maccabi, Hmo::Meuhedet, Hmo::Clalit];

    /// Canonical storage form.
    pub fn hebrew(self) -> &'static str {
        match self {
            Hmo::Maccabi => "מכבי",
            Hmo::Meuhedet => "מאוחדת",
            Hmo::Clalit => "כללית",
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            Hmo::Maccabi => "Maccabi",
            Hmo::Meuhedet => "Meuhedet",
            Hmo::Clalit => "Clalit",
        }
    }

    /// Case-insensitive lookup accepting either spelling.
    pub fn parse(value: &str) -> Option<Self> {
        let needle = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|hmo| needle == hmo.hebrew() || needle == hmo.english().to_lowercase())
    }

    /// Comma-separated list of options in `lang`, for error messages.
    pub fn options(lang: Language) -> String {
        join_options(Self::ALL.iter().map(|hmo| match lang {
            Language::Hebrew => hmo.hebrew(),
            Language::English => hmo.english(),
        }))
    }
}

impl MembershipTier {
    pub const ALL: [MembershipTier; 3] = [
        MembershipTier::Gold,
        MembershipTier::Silver,
        MembershipTier::Bronze,
    ];

    pub fn hebrew(self) -> &'static str {
        match self {
            MembershipTier::Gold => "זהב",
            MembershipTier::Silver => "כסף",
            MembershipTier::Bronze => "ארד",
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            MembershipTier::Gold => "Gold",
            MembershipTier::Silver => "Silver",
            MembershipTier::Bronze => "Bronze",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let needle = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|tier| needle == tier.hebrew() || needle == tier.english().to_lowercase())
    }

    pub fn options(lang: Language) -> String {
        join_options(Self::ALL.iter().map(|tier| match lang {
            Language::Hebrew => tier.hebrew(),
            Language::English => tier.english(),
        }))
    }
}

fn join_options<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Hmo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hebrew())
    }
}

impl fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hebrew())
    }
}

impl TryFrom<String> for Hmo {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Hmo::parse(&value).ok_or(UnknownVariant {
            kind: "HMO",
            value,
        })
    }
}

impl TryFrom<String> for MembershipTier {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MembershipTier::parse(&value).ok_or(UnknownVariant {
            kind: "membership tier",
            value,
        })
    }
}

impl From<Hmo> for String {
    fn from(hmo: Hmo) -> Self {
        hmo.hebrew().to_string()
    }
}

impl From<MembershipTier> for String {
    fn from(tier: MembershipTier) -> Self {
        tier.hebrew().to_string()
    }
}

/// Accepted gender spellings, compared case-insensitively.
pub const GENDERS: [&str; 10] = [
    "זכר", "נקבה", "אחר", "male", "female", "other", "m", "f", "גבר", "אישה",
];

pub fn is_known_gender(value: &str) -> bool {
    let needle = value.trim().to_lowercase();
    GENDERS.iter().any(|g| *g == needle)
}
