use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::hmo::{Hmo, MembershipTier};
use crate::language::Language;
use crate::localization::Message;
use crate::normalize::normalize_enums;
use crate::validators::{
    coerce_age, validate_age, validate_gender, validate_hmo_card_number, validate_hmo_name,
    validate_israeli_id, validate_membership_tier, validate_name,
};

/// The eight fields collected during intake, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserField {
    FirstName,
    LastName,
    IdNumber,
    Gender,
    Age,
    HmoName,
    HmoCardNumber,
    MembershipTier,
}

impl UserField {
    pub const ALL: [UserField; 8] = [
        UserField::FirstName,
        UserField::LastName,
        UserField::IdNumber,
        UserField::Gender,
        UserField::Age,
        UserField::HmoName,
        UserField::HmoCardNumber,
        UserField::MembershipTier,
    ];

    /// Wire key, e.g. `hmo_card_number`.
    pub fn key(self) -> &'static str {
        match self {
            UserField::FirstName => "first_name",
            UserField::LastName => "last_name",
            UserField::IdNumber => "id_number",
            UserField::Gender => "gender",
            UserField::Age => "age",
            UserField::HmoName => "hmo_name",
            UserField::HmoCardNumber => "hmo_card_number",
            UserField::MembershipTier => "membership_tier",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A field value exactly as the model produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Other(serde_json::Value),
}

impl RawValue {
    /// Textual form handed to string validators.
    pub fn to_text(&self) -> String {
        match self {
            RawValue::Text(text) => text.clone(),
            RawValue::Integer(n) => n.to_string(),
            RawValue::Float(n) => n.to_string(),
            RawValue::Bool(b) => b.to_string(),
            RawValue::Other(value) => value.to_string(),
        }
    }

    fn cleaned(&self) -> RawValue {
        match self {
            RawValue::Text(text) => RawValue::Text(text.trim().to_string()),
            other => other.clone(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

/// Unvalidated user details. `None` means the field is missing; JSON `null`
/// deserializes to `None` as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawUserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hmo_name: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hmo_card_number: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_tier: Option<RawValue>,
}

impl RawUserInfo {
    pub fn get(&self, field: UserField) -> Option<&RawValue> {
        match field {
            UserField::FirstName => self.first_name.as_ref(),
            UserField::LastName => self.last_name.as_ref(),
            UserField::IdNumber => self.id_number.as_ref(),
            UserField::Gender => self.gender.as_ref(),
            UserField::Age => self.age.as_ref(),
            UserField::HmoName => self.hmo_name.as_ref(),
            UserField::HmoCardNumber => self.hmo_card_number.as_ref(),
            UserField::MembershipTier => self.membership_tier.as_ref(),
        }
    }

    pub fn set(&mut self, field: UserField, value: impl Into<RawValue>) {
        let value = Some(value.into());
        match field {
            UserField::FirstName => self.first_name = value,
            UserField::LastName => self.last_name = value,
            UserField::IdNumber => self.id_number = value,
            UserField::Gender => self.gender = value,
            UserField::Age => self.age = value,
            UserField::HmoName => self.hmo_name = value,
            UserField::HmoCardNumber => self.hmo_card_number = value,
            UserField::MembershipTier => self.membership_tier = value,
        }
    }
}

impl From<&UserInfo> for RawUserInfo {
    fn from(info: &UserInfo) -> Self {
        RawUserInfo {
            first_name: Some(info.first_name.as_str().into()),
            last_name: Some(info.last_name.as_str().into()),
            id_number: Some(info.id_number.as_str().into()),
            gender: Some(info.gender.as_str().into()),
            age: Some(RawValue::Integer(i64::from(info.age))),
            hmo_name: Some(info.hmo_name.hebrew().into()),
            hmo_card_number: Some(info.hmo_card_number.as_str().into()),
            membership_tier: Some(info.membership_tier.hebrew().into()),
        }
    }
}

/// A fully validated user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub first_name: String,
    pub last_name: String,
    pub id_number: String,
    pub gender: String,
    pub age: u8,
    pub hmo_name: Hmo,
    pub hmo_card_number: String,
    pub membership_tier: MembershipTier,
}

impl UserInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

pub type CleanedData = BTreeMap<UserField, RawValue>;

/// Outcome of [`validate_user_info`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub field_errors: BTreeMap<UserField, String>,
    pub cleaned_data: CleanedData,
}

impl Verdict {
    /// Failing fields in reporting order.
    pub fn failed_fields(&self) -> Vec<UserField> {
        self.field_errors.keys().copied().collect()
    }

    /// The typed record, when the verdict is valid.
    pub fn user_info(&self) -> Option<UserInfo> {
        if !self.is_valid {
            return None;
        }
        let text = |field: UserField| self.cleaned_data.get(&field).map(RawValue::to_text);
        let age = match self.cleaned_data.get(&UserField::Age)? {
            RawValue::Integer(age) => u8::try_from(*age).ok()?,
            _ => return None,
        };

        Some(UserInfo {
            first_name: text(UserField::FirstName)?,
            last_name: text(UserField::LastName)?,
            id_number: text(UserField::IdNumber)?,
            gender: text(UserField::Gender)?,
            age,
            hmo_name: Hmo::parse(&text(UserField::HmoName)?)?,
            hmo_card_number: text(UserField::HmoCardNumber)?,
            membership_tier: MembershipTier::parse(&text(UserField::MembershipTier)?)?,
        })
    }
}

/// Validate a complete intake record.
///
/// Missing fields short-circuit content validation; otherwise every field is
/// checked and all failures are reported together. On success the HMO and
/// tier are normalized to their Hebrew spelling.
pub fn validate_user_info(info: &RawUserInfo, lang: Language) -> Verdict {
    let mut field_errors = BTreeMap::new();
    let mut cleaned_data = CleanedData::new();

    for field in UserField::ALL {
        match info.get(field) {
            Some(value) => {
                cleaned_data.insert(field, value.cleaned());
            }
            None => {
                field_errors.insert(field, Message::FieldRequired.for_field(field, lang));
            }
        }
    }

    if !field_errors.is_empty() {
        return Verdict {
            is_valid: false,
            errors: vec![Message::MissingRequiredFields.text(lang)],
            field_errors,
            cleaned_data,
        };
    }

    let text = |field: UserField| {
        cleaned_data
            .get(&field)
            .map(RawValue::to_text)
            .unwrap_or_default()
    };

    let checks = [
        (
            UserField::FirstName,
            validate_name(&text(UserField::FirstName), UserField::FirstName, lang),
        ),
        (
            UserField::LastName,
            validate_name(&text(UserField::LastName), UserField::LastName, lang),
        ),
        (
            UserField::IdNumber,
            validate_israeli_id(&text(UserField::IdNumber), lang),
        ),
        (
            UserField::HmoCardNumber,
            validate_hmo_card_number(&text(UserField::HmoCardNumber), lang).map_err(|error| {
                Message::InvalidHmoCard.render(lang, &[("error", error.as_str())])
            }),
        ),
        (
            UserField::Gender,
            validate_gender(&text(UserField::Gender), lang),
        ),
        (
            UserField::HmoName,
            validate_hmo_name(&text(UserField::HmoName), lang),
        ),
        (
            UserField::MembershipTier,
            validate_membership_tier(&text(UserField::MembershipTier), lang),
        ),
    ];

    for (field, check) in checks {
        if let Err(message) = check {
            field_errors.insert(field, message);
        }
    }

    if let Some(raw_age) = cleaned_data.get(&UserField::Age).cloned() {
        match coerce_age(&raw_age, lang) {
            Ok(age) => {
                cleaned_data.insert(UserField::Age, RawValue::Integer(age));
                if let Err(message) = validate_age(age, lang) {
                    field_errors.insert(UserField::Age, message);
                }
            }
            Err(message) => {
                field_errors.insert(UserField::Age, message);
            }
        }
    }

    let is_valid = field_errors.is_empty();
    let mut errors = Vec::new();

    if is_valid {
        normalize_enums(&mut cleaned_data);
    } else {
        let fields = field_errors
            .keys()
            .map(|field| field.key())
            .collect::<Vec<_>>()
            .join(", ");
        errors.push(Message::ValidationFailedFor.render(lang, &[("fields", fields.as_str())]));
    }

    Verdict {
        is_valid,
        errors,
        field_errors,
        cleaned_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_english() -> RawUserInfo {
        serde_json::from_value(serde_json::json!({
            "first_name": "  Daniel ",
            "last_name": "Samira",
            "id_number": "316164417",
            "gender": "Female",
            "age": 30,
            "hmo_name": "Maccabi",
            "hmo_card_number": "987654321",
            "membership_tier": "Gold"
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_record_is_normalized_to_hebrew() {
        let verdict = validate_user_info(&complete_english(), Language::English);

        assert!(verdict.is_valid, "{:?}", verdict.field_errors);
        assert!(verdict.errors.is_empty());
        assert!(verdict.field_errors.is_empty());
        assert_eq!(
            verdict.cleaned_data[&UserField::HmoName],
            RawValue::Text("מכבי".into())
        );
        assert_eq!(
            verdict.cleaned_data[&UserField::MembershipTier],
            RawValue::Text("זהב".into())
        );
        assert_eq!(
            verdict.cleaned_data[&UserField::FirstName],
            RawValue::Text("Daniel".into())
        );
    }

    #[test]
    fn test_typed_user_info_from_valid_verdict() {
        let verdict = validate_user_info(&complete_english(), Language::English);
        let info = verdict.user_info().expect("valid verdict");

        assert_eq!(info.first_name, "Daniel");
        assert_eq!(info.age, 30);
        assert_eq!(info.hmo_name, Hmo::Maccabi);
        assert_eq!(info.membership_tier, MembershipTier::Gold);
        assert_eq!(info.full_name(), "Daniel Samira");
    }

    #[test]
    fn test_missing_fields_skip_content_validation() {
        let mut info = complete_english();
        info.id_number = None;
        info.age = None;
        // invalid but present: must not be reported while fields are missing
        info.first_name = Some("X".into());

        let verdict = validate_user_info(&info, Language::English);

        assert!(!verdict.is_valid);
        assert_eq!(verdict.field_errors.len(), 2);
        assert_eq!(
            verdict.field_errors[&UserField::IdNumber],
            "ID number is required"
        );
        assert_eq!(verdict.field_errors[&UserField::Age], "Age is required");
        assert_eq!(verdict.errors, vec!["Missing required fields".to_string()]);
        // present values are still cleaned
        assert_eq!(
            verdict.cleaned_data[&UserField::FirstName],
            RawValue::Text("X".into())
        );
        assert!(!verdict.cleaned_data.contains_key(&UserField::IdNumber));
        assert!(verdict.user_info().is_none());
    }

    #[test]
    fn test_every_single_missing_field_is_reported_alone() {
        for field in UserField::ALL {
            let mut info = RawUserInfo::default();
            for other in UserField::ALL {
                if other != field {
                    info.set(other, complete_english().get(other).unwrap().clone());
                }
            }
            let verdict = validate_user_info(&info, Language::Hebrew);
            assert_eq!(verdict.failed_fields(), vec![field]);
        }
    }

    #[test]
    fn test_null_counts_as_missing() {
        let info: RawUserInfo = serde_json::from_value(serde_json::json!({
            "first_name": "Dana",
            "last_name": null
        }))
        .unwrap();
        let verdict = validate_user_info(&info, Language::English);
        assert_eq!(verdict.field_errors.len(), 7);
        assert!(verdict.field_errors.contains_key(&UserField::LastName));
    }

    #[test]
    fn test_all_content_errors_are_accumulated() {
        let mut info = complete_english();
        info.id_number = Some("316164418".into());
        info.age = Some("abc".into());
        info.hmo_name = Some("Leumit".into());
        info.hmo_card_number = Some("123".into());

        let verdict = validate_user_info(&info, Language::English);

        assert!(!verdict.is_valid);
        assert_eq!(
            verdict.failed_fields(),
            vec![
                UserField::IdNumber,
                UserField::Age,
                UserField::HmoName,
                UserField::HmoCardNumber
            ]
        );
        assert_eq!(
            verdict.field_errors[&UserField::HmoCardNumber],
            "Invalid HMO card number: HMO card number must be exactly 9 characters"
        );
        assert_eq!(verdict.field_errors[&UserField::Age], "Age must be a number");
        assert_eq!(
            verdict.errors,
            vec!["Validation failed for: id_number, age, hmo_name, hmo_card_number".to_string()]
        );
        // raw age kept when coercion fails
        assert_eq!(
            verdict.cleaned_data[&UserField::Age],
            RawValue::Text("abc".into())
        );
    }

    #[test]
    fn test_invalid_verdict_keeps_original_spelling() {
        let mut info = complete_english();
        info.age = Some(RawValue::Integer(121));

        let verdict = validate_user_info(&info, Language::English);

        assert!(!verdict.is_valid);
        assert_eq!(
            verdict.cleaned_data[&UserField::HmoName],
            RawValue::Text("Maccabi".into())
        );
        assert_eq!(verdict.cleaned_data[&UserField::Age], RawValue::Integer(121));
    }

    #[test]
    fn test_age_boundaries_through_aggregate() {
        for (age, ok) in [(0, true), (120, true), (-1, false), (121, false)] {
            let mut info = complete_english();
            info.age = Some(RawValue::Integer(age));
            assert_eq!(
                validate_user_info(&info, Language::English).is_valid,
                ok,
                "age {age}"
            );
        }
    }

    #[test]
    fn test_numeric_id_and_string_age_are_coerced() {
        let mut info = complete_english();
        info.id_number = Some(RawValue::Integer(316164417));
        info.age = Some("45".into());

        let verdict = validate_user_info(&info, Language::English);

        assert!(verdict.is_valid, "{:?}", verdict.field_errors);
        assert_eq!(verdict.cleaned_data[&UserField::Age], RawValue::Integer(45));
        assert_eq!(verdict.user_info().unwrap().id_number, "316164417");
    }

    #[test]
    fn test_hebrew_messages() {
        let mut info = complete_english();
        info.gender = Some("robot".into());

        let verdict = validate_user_info(&info, Language::Hebrew);

        assert_eq!(verdict.field_errors[&UserField::Gender], "יש לציין מין");
        assert_eq!(verdict.errors, vec!["אימות נכשל עבור: gender".to_string()]);
    }

    #[test]
    fn test_verdict_serializes_with_field_keys() {
        let mut info = complete_english();
        info.gender = None;
        let json = serde_json::to_value(validate_user_info(&info, Language::English)).unwrap();

        assert_eq!(json["is_valid"], false);
        assert_eq!(json["field_errors"]["gender"], "Gender is required");
        assert_eq!(json["cleaned_data"]["hmo_name"], "Maccabi");
    }

    #[test]
    fn test_round_trip_from_typed_record_stays_valid() {
        let info = validate_user_info(&complete_english(), Language::English)
            .user_info()
            .unwrap();
        let verdict = validate_user_info(&RawUserInfo::from(&info), Language::Hebrew);
        assert!(verdict.is_valid);
        assert_eq!(verdict.user_info(), Some(info));
    }
}
