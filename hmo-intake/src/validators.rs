//! Per-field validation rules.
//!
//! Every validator returns `Ok(())` or the localized message to show the
//! user. None of them log or allocate beyond the message.

use regex::Regex;
use std::sync::LazyLock;

use crate::hmo::{Hmo, MembershipTier, is_known_gender};
use crate::language::Language;
use crate::localization::Message;
use crate::user_info::{RawValue, UserField};

pub type FieldCheck = Result<(), String>;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\x{0590}-\x{05FF}a-zA-Z\s\-']+$").expect("Invalid regex")
});

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 50;
const ID_LENGTH: usize = 9;
const HMO_CARD_LENGTH: usize = 9;
const MAX_AGE: i64 = 120;

/// First or last name.
pub fn validate_name(name: &str, field: UserField, lang: Language) -> FieldCheck {
    let name = name.trim();
    if name.is_empty() {
        return Err(Message::FieldRequired.for_field(field, lang));
    }

    let length = name.chars().count();
    if length < NAME_MIN_CHARS {
        return Err(Message::NameMinLength.for_field(field, lang));
    }
    if length > NAME_MAX_CHARS {
        return Err(Message::NameMaxLength.for_field(field, lang));
    }

    if !NAME_PATTERN.is_match(name) {
        return Err(Message::NameInvalidChars.for_field(field, lang));
    }

    Ok(())
}

/// Israeli national ID: nine digits with a Luhn-style check digit.
pub fn validate_israeli_id(id_number: &str, lang: Language) -> FieldCheck {
    let id = id_number.trim();

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(Message::IdOnlyDigits.text(lang));
    }
    if id.len() != ID_LENGTH {
        return Err(Message::IdNineDigits.text(lang));
    }

    if israeli_id_checksum(id) % 10 != 0 {
        return Err(Message::IdInvalidChecksum.text(lang));
    }

    Ok(())
}

/// Weighted digit sum of an all-digit string: digits at odd positions are
/// doubled and folded back to a single digit.
pub fn israeli_id_checksum(digits: &str) -> u32 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, digit)| {
            if i % 2 == 0 {
                digit
            } else {
                let doubled = digit * 2;
                if doubled < 10 {
                    doubled
                } else {
                    doubled / 10 + doubled % 10
                }
            }
        })
        .sum()
}

/// HMO card numbers only have a length rule.
pub fn validate_hmo_card_number(card_number: &str, lang: Language) -> FieldCheck {
    if card_number.trim().chars().count() != HMO_CARD_LENGTH {
        return Err(Message::HmoCardNineChars.text(lang));
    }
    Ok(())
}

pub fn validate_hmo_name(hmo_name: &str, lang: Language) -> FieldCheck {
    if hmo_name.trim().is_empty() {
        return Err(Message::HmoNameRequired.text(lang));
    }
    if Hmo::parse(hmo_name).is_none() {
        let options = Hmo::options(lang);
        return Err(Message::HmoNameInvalid.render(lang, &[("options", options.as_str())]));
    }
    Ok(())
}

pub fn validate_membership_tier(tier: &str, lang: Language) -> FieldCheck {
    if tier.trim().is_empty() {
        return Err(Message::MembershipTierRequired.text(lang));
    }
    if MembershipTier::parse(tier).is_none() {
        let options = MembershipTier::options(lang);
        return Err(Message::MembershipTierInvalid.render(lang, &[("options", options.as_str())]));
    }
    Ok(())
}

/// Coerce a raw age to an integer.
///
/// Text is parsed after trimming; floats are accepted only when they hold a
/// whole number.
pub fn coerce_age(value: &RawValue, lang: Language) -> Result<i64, String> {
    let coerced = match value {
        RawValue::Integer(age) => Some(*age),
        RawValue::Text(text) => text.trim().parse::<i64>().ok(),
        RawValue::Float(age) if age.fract() == 0.0 && age.is_finite() => {
            i64::try_from(*age as i128).ok()
        }
        _ => None,
    };
    coerced.ok_or_else(|| Message::AgeMustBeNumber.text(lang))
}

pub fn validate_age(age: i64, lang: Language) -> FieldCheck {
    if age < 0 {
        return Err(Message::AgeCannotBeNegative.text(lang));
    }
    if age > MAX_AGE {
        return Err(Message::AgeMax120.text(lang));
    }
    Ok(())
}

pub fn validate_gender(gender: &str, lang: Language) -> FieldCheck {
    if gender.trim().is_empty() {
        return Err(Message::GenderRequired.text(lang));
    }
    if !is_known_gender(gender) {
        return Err(Message::GenderMustBeSpecified.text(lang));
    }
    Ok(())
}
