use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the intake conversation is held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "he", alias = "hebrew")]
    Hebrew,
    #[serde(rename = "en", alias = "english")]
    English,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Hebrew => "he",
            Language::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "he" | "hebrew" => Ok(Language::Hebrew),
            "en" | "english" => Ok(Language::English),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

pub(crate) fn is_hebrew_char(c: char) -> bool {
    ('\u{0590}'..='\u{05FF}').contains(&c)
}

/// Guess whether a user message is mostly Hebrew or English.
///
/// Short or letter-less input falls back to `default`.
pub fn detect_language(text: &str, default: Language) -> Language {
    let trimmed = text.trim();
    if trimmed.chars().count() < 3 {
        return default;
    }

    let hebrew = trimmed.chars().filter(|c| is_hebrew_char(*c)).count();
    let latin = trimmed.chars().filter(|c| c.is_ascii_alphabetic()).count();

    if hebrew == 0 && latin == 0 {
        return default;
    }

    if hebrew > latin {
        Language::Hebrew
    } else {
        Language::English
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_hebrew_and_english() {
        assert_eq!(
            detect_language("שלום, קוראים לי דנה", Language::English),
            Language::Hebrew
        );
        assert_eq!(
            detect_language("Hello, my name is Dana", Language::Hebrew),
            Language::English
        );
    }

    #[test]
    fn test_short_or_letterless_input_uses_default() {
        assert_eq!(detect_language("hi", Language::Hebrew), Language::Hebrew);
        assert_eq!(detect_language("  ", Language::English), Language::English);
        assert_eq!(
            detect_language("316164417", Language::Hebrew),
            Language::Hebrew
        );
    }

    #[test]
    fn test_mixed_text_ties_go_to_english() {
        // two hebrew letters, two latin letters
        assert_eq!(detect_language("אב ab", Language::Hebrew), Language::English);
    }

    #[test]
    fn test_parse_codes_and_names() {
        assert_eq!("he".parse::<Language>().unwrap(), Language::Hebrew);
        assert_eq!("English".parse::<Language>().unwrap(), Language::English);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_serde_uses_short_codes() {
        assert_eq!(serde_json::to_string(&Language::English).unwrap(), "\"en\"");
        let lang: Language = serde_json::from_str("\"hebrew\"").unwrap();
        assert_eq!(lang, Language::Hebrew);
    }
}
