// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic intent classification over visitor messages.
//!
//! Pure keyword-substring membership tests per language plus two regex
//! checks for contact data. No ranking, no scoring: multiple tags may
//! co-occur, and `GeneralInquiry` is assigned when nothing else matched.

use std::sync::LazyLock;

use advo_core::types::{Language, LegalCategory};
use regex::Regex;

/// Coarse classification tags for a visitor message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentTag {
    /// Explicit scheduling/meeting request (narrow keyword set).
    AppointmentRequest,
    /// Mention of a legal topic (broad keyword set).
    LegalTopic,
    /// Talking about contact channels (phone, email, ...).
    ContactSharing,
    /// The message itself contains a phone number or email address.
    ContactProvided,
    /// Nothing matched.
    GeneralInquiry,
}

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d{10,}").expect("phone regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email regex"));

/// Narrow scheduling vocabulary. Stems, so that case forms match
/// ("встреча", "встречу", "записаться", "запишите").
fn appointment_keywords(language: Language) -> &'static [&'static str] {
    match language {
        Language::Ru => &["консультаци", "встреч", "запис", "прием", "приём"],
        Language::Ky => &["консультаци", "жолугуш", "кабыл алуу", "жазыл"],
        Language::En => &["consultation", "meeting", "appointment", "schedule", "book"],
    }
}

fn contact_keywords(language: Language) -> &'static [&'static str] {
    match language {
        Language::Ru => &["телефон", "контакт", "связь", "номер", "email"],
        Language::Ky => &["телефон", "байланыш", "номер", "email"],
        Language::En => &["phone", "contact", "number", "email", "call"],
    }
}

/// General legal vocabulary that signals a legal topic without pinning a
/// practice area.
fn general_legal_keywords(language: Language) -> &'static [&'static str] {
    match language {
        Language::Ru => &["юрист", "адвокат", "закон", "суд", "юридическ", "права"],
        Language::Ky => &["юрист", "адвокат", "мыйзам", "сот", "укук"],
        Language::En => &["lawyer", "attorney", "legal", "court", "law"],
    }
}

fn category_keywords(category: LegalCategory, language: Language) -> &'static [&'static str] {
    use LegalCategory::*;
    match (category, language) {
        (Family, Language::Ru) => &["развод", "алимент", "брак", "опек", "усыновлен", "семейн"],
        (Family, Language::Ky) => &["ажырашуу", "алимент", "нике", "үй-бүлө"],
        (Family, Language::En) => &["divorce", "custody", "alimony", "marriage", "family"],
        (Labor, Language::Ru) => &["работ", "увольнен", "зарплат", "трудов", "отпуск"],
        (Labor, Language::Ky) => &["жумуш", "эмгек", "айлык"],
        (Labor, Language::En) => &["labor", "employment", "dismissal", "salary", "fired"],
        (Civil, Language::Ru) => &["договор", "аренд", "долг", "сделк", "недвижимост", "граждан"],
        (Civil, Language::Ky) => &["келишим", "ижара", "карыз"],
        (Civil, Language::En) => &["contract", "rental", "lease", "debt", "property"],
        (Administrative, Language::Ru) => &["штраф", "администрат", "налог", "лицензи", "госорган"],
        (Administrative, Language::Ky) => &["айып", "салык", "лицензия"],
        (Administrative, Language::En) => &["fine", "administrative", "tax", "license", "permit"],
        (Inheritance, Language::Ru) => &["наследств", "завещан"],
        (Inheritance, Language::Ky) => &["мурас", "керээз"],
        (Inheritance, Language::En) => &["inherit", "testament", "estate"],
        (General, _) => &[],
    }
}

/// Practice areas in match priority order; first hit wins.
const CATEGORY_ORDER: [LegalCategory; 5] = [
    LegalCategory::Family,
    LegalCategory::Labor,
    LegalCategory::Civil,
    LegalCategory::Administrative,
    LegalCategory::Inheritance,
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Classify a message into a set of intent tags.
pub fn classify(text: &str, language: Language) -> Vec<IntentTag> {
    let lower = text.to_lowercase();
    let mut tags = Vec::new();

    if contains_any(&lower, appointment_keywords(language)) {
        tags.push(IntentTag::AppointmentRequest);
    }
    if mentions_legal_topic(&lower, language) {
        tags.push(IntentTag::LegalTopic);
    }
    if contains_any(&lower, contact_keywords(language)) {
        tags.push(IntentTag::ContactSharing);
    }
    if PHONE_RE.is_match(text) || EMAIL_RE.is_match(text) {
        tags.push(IntentTag::ContactProvided);
    }
    if tags.is_empty() {
        tags.push(IntentTag::GeneralInquiry);
    }
    tags
}

fn mentions_legal_topic(lower: &str, language: Language) -> bool {
    if contains_any(lower, general_legal_keywords(language)) {
        return true;
    }
    CATEGORY_ORDER
        .iter()
        .any(|c| contains_any(lower, category_keywords(*c, language)))
}

/// Classify a message into one of the six practice-area buckets.
///
/// First-match-wins over [`CATEGORY_ORDER`]; falls back to
/// [`LegalCategory::General`] when only general legal vocabulary matched.
pub fn classify_legal_category(text: &str, language: Language) -> LegalCategory {
    let lower = text.to_lowercase();
    for category in CATEGORY_ORDER {
        if contains_any(&lower, category_keywords(category, language)) {
            return category;
        }
    }
    LegalCategory::General
}
