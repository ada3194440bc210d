//! Bilingual strings used by the validators.
//!
//! Field labels and message templates live in two separate tables: a
//! template such as [`Message::FieldRequired`] receives the label of the
//! field through its `{field}` placeholder, so the two are looked up
//! independently and must be kept in sync when a field is added.

use crate::language::Language;
use crate::user_info::UserField;

impl UserField {
    /// Human-readable label of the field in `lang`.
    pub fn label(self, lang: Language) -> &'static str {
        match (self, lang) {
            (UserField::FirstName, Language::Hebrew) => "שם פרטי",
            (UserField::FirstName, Language::English) => "First name",
            (UserField::LastName, Language::Hebrew) => "שם משפחה",
            (UserField::LastName, Language::English) => "Last name",
            (UserField::IdNumber, Language::Hebrew) => "תעודת זהות",
            (UserField::IdNumber, Language::English) => "ID number",
            (UserField::Gender, Language::Hebrew) => "מין",
            (UserField::Gender, Language::English) => "Gender",
            (UserField::Age, Language::Hebrew) => "גיל",
            (UserField::Age, Language::English) => "Age",
            (UserField::HmoName, Language::Hebrew) => "קופת חולים",
            (UserField::HmoName, Language::English) => "HMO name",
            (UserField::HmoCardNumber, Language::Hebrew) => "מספר כרטיס קופת חולים",
            (UserField::HmoCardNumber, Language::English) => "HMO card number",
            (UserField::MembershipTier, Language::Hebrew) => "דרג חברות",
            (UserField::MembershipTier, Language::English) => "Membership tier",
        }
    }
}

/// Validation message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    FieldRequired,
    MissingRequiredFields,
    IdOnlyDigits,
    IdNineDigits,
    IdInvalidChecksum,
    HmoCardNineChars,
    InvalidHmoCard,
    NameMinLength,
    NameMaxLength,
    NameInvalidChars,
    AgeMustBeNumber,
    AgeCannotBeNegative,
    AgeMax120,
    GenderRequired,
    GenderMustBeSpecified,
    HmoNameRequired,
    HmoNameInvalid,
    MembershipTierRequired,
    MembershipTierInvalid,
    ValidationFailedFor,
}

impl Message {
    /// Raw template with `{placeholder}` slots.
    pub fn template(self, lang: Language) -> &'static str {
        use Language::{English, Hebrew};
        match (self, lang) {
            (Message::FieldRequired, Hebrew) => "{field} נדרש",
            (Message::FieldRequired, English) => "{field} is required",
            (Message::MissingRequiredFields, Hebrew) => "חסרים שדות נדרשים",
            (Message::MissingRequiredFields, English) => "Missing required fields",
            (Message::IdOnlyDigits, Hebrew) => "תעודת זהות חייבת להכיל רק ספרות",
            (Message::IdOnlyDigits, English) => "ID must contain only digits",
            (Message::IdNineDigits, Hebrew) => "תעודת זהות חייבת להיות בדיוק 9 ספרות",
            (Message::IdNineDigits, English) => "ID must be exactly 9 digits",
            (Message::IdInvalidChecksum, Hebrew) => "ספרת ביקורת של תעודת זהות לא תקינה",
            (Message::IdInvalidChecksum, English) => "Invalid ID checksum",
            (Message::HmoCardNineChars, Hebrew) => {
                "מספר כרטיס קופת חולים חייב להיות בדיוק 9 תווים"
            }
            (Message::HmoCardNineChars, English) => {
                "HMO card number must be exactly 9 characters"
            }
            (Message::InvalidHmoCard, Hebrew) => "מספר כרטיס קופת חולים לא תקין: {error}",
            (Message::InvalidHmoCard, English) => "Invalid HMO card number: {error}",
            (Message::NameMinLength, Hebrew) => "{field} חייב להיות לפחות 2 תווים",
            (Message::NameMinLength, English) => "{field} must be at least 2 characters",
            (Message::NameMaxLength, Hebrew) => "{field} לא יכול לעלות על 50 תווים",
            (Message::NameMaxLength, English) => "{field} cannot exceed 50 characters",
            (Message::NameInvalidChars, Hebrew) => {
                "{field} יכול להכיל רק אותיות, רווחים, מקפים ואפוסטרופים"
            }
            (Message::NameInvalidChars, English) => {
                "{field} can only contain letters, spaces, hyphens, and apostrophes"
            }
            (Message::AgeMustBeNumber, Hebrew) => "גיל חייב להיות מספר",
            (Message::AgeMustBeNumber, English) => "Age must be a number",
            (Message::AgeCannotBeNegative, Hebrew) => "גיל לא יכול להיות שלילי",
            (Message::AgeCannotBeNegative, English) => "Age cannot be negative",
            (Message::AgeMax120, Hebrew) => "גיל לא יכול לעלות על 120",
            (Message::AgeMax120, English) => "Age cannot exceed 120",
            (Message::GenderRequired, Hebrew) => "מין נדרש",
            (Message::GenderRequired, English) => "Gender is required",
            (Message::GenderMustBeSpecified, Hebrew) => "יש לציין מין",
            (Message::GenderMustBeSpecified, English) => "Gender must be specified",
            (Message::HmoNameRequired, Hebrew) => "שם קופת חולים נדרש",
            (Message::HmoNameRequired, English) => "HMO name is required",
            (Message::HmoNameInvalid, Hebrew) => "קופת חולים חייבת להיות אחת מ: {options}",
            (Message::HmoNameInvalid, English) => "HMO must be one of: {options}",
            (Message::MembershipTierRequired, Hebrew) => "דרג חברות נדרש",
            (Message::MembershipTierRequired, English) => "Membership tier is required",
            (Message::MembershipTierInvalid, Hebrew) => "דרג חברות חייב להיות אחד מ: {options}",
            (Message::MembershipTierInvalid, English) => {
                "Membership tier must be one of: {options}"
            }
            (Message::ValidationFailedFor, Hebrew) => "אימות נכשל עבור: {fields}",
            (Message::ValidationFailedFor, English) => "Validation failed for: {fields}",
        }
    }

    /// Message with no placeholders.
    pub fn text(self, lang: Language) -> String {
        self.template(lang).to_string()
    }

    /// Fill the template's placeholders. Unknown names are left untouched.
    pub fn render(self, lang: Language, vars: &[(&str, &str)]) -> String {
        fill_placeholders(self.template(lang), vars)
    }

    /// Shorthand for templates keyed on a field label.
    pub fn for_field(self, field: UserField, lang: Language) -> String {
        self.render(lang, &[("field", field.label(lang))])
    }
}

pub fn fill_placeholders(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}
