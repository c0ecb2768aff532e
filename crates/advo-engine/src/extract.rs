// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic contact extraction from message text.
//!
//! Deliberately simple pattern matching, not NLP: false negatives are
//! expected and acceptable, missed fields can still arrive through the
//! explicit contact form.

use std::sync::LazyLock;

use regex::Regex;

/// Partial contact details found in a message. Any subset may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d{10,}").expect("phone regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email regex"));
/// "my name is <word>" phrases across the supported languages. A single
/// token is captured; multi-word names are out of scope.
static NAME_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)меня зовут (\w+)",
        r"(?i)my name is (\w+)",
        r"(?i)менин атым (\w+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("name regex"))
    .collect()
});

/// Extract whatever contact details the text contains.
pub fn contact_details(text: &str) -> ContactDetails {
    let phone = PHONE_RE.find(text).map(|m| m.as_str().to_string());
    let email = EMAIL_RE.find(text).map(|m| m.as_str().to_string());
    let name = NAME_RES
        .iter()
        .find_map(|re| re.captures(text))
        .map(|caps| caps[1].to_string());

    ContactDetails { name, phone, email }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plus_prefixed_phone() {
        let details = contact_details("позвоните мне +996700123456 после обеда");
        assert_eq!(details.phone.as_deref(), Some("+996700123456"));
    }

    #[test]
    fn extracts_bare_digit_run() {
        let details = contact_details("номер 0700123456777");
        assert_eq!(details.phone.as_deref(), Some("0700123456777"));
    }

    #[test]
    fn ignores_short_digit_runs() {
        let details = contact_details("мне 35 лет, стаж 10");
        assert!(details.phone.is_none());
    }

    #[test]
    fn extracts_email() {
        let details = contact_details("пишите на ana@example.com");
        assert_eq!(details.email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn extracts_name_from_russian_phrase() {
        let details = contact_details("Здравствуйте, меня зовут Айгуль");
        assert_eq!(details.name.as_deref(), Some("Айгуль"));
    }

    #[test]
    fn extracts_name_from_english_phrase() {
        let details = contact_details("Hi, my name is Ana and I need help");
        assert_eq!(details.name.as_deref(), Some("Ana"));
    }

    #[test]
    fn extracts_name_from_kyrgyz_phrase() {
        let details = contact_details("Менин атым Бакыт");
        assert_eq!(details.name.as_deref(), Some("Бакыт"));
    }

    #[test]
    fn name_capture_is_single_token() {
        let details = contact_details("меня зовут Анна Петровна");
        assert_eq!(details.name.as_deref(), Some("Анна"));
    }

    #[test]
    fn all_fields_together() {
        let details =
            contact_details("меня зовут Ана, телефон +996700123456, email ana@example.com");
        assert_eq!(details.name.as_deref(), Some("Ана"));
        assert_eq!(details.phone.as_deref(), Some("+996700123456"));
        assert_eq!(details.email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn plain_text_yields_nothing() {
        assert_eq!(contact_details("что делать при разводе?"), ContactDetails::default());
    }
}
