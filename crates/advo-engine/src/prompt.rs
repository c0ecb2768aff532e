// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt, welcome, confirmation and fallback text generation.
//!
//! Everything here is a pure function of its inputs. The fallback reply in
//! particular must stay deterministic: when the completion call fails, the
//! visitor still gets a useful answer built only from their message text and
//! the lawyer's public details.

use advo_core::types::{Language, Lawyer};
use serde::Serialize;

/// Contact-form descriptor returned alongside a reply when the engine wants
/// the widget to collect contact details.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContactForm {
    pub title: String,
    pub subtitle: String,
    pub fields: Vec<&'static str>,
}

fn fee_text(fee: i64, language: Language) -> String {
    match language {
        Language::Ru => {
            if fee > 0 {
                format!("{fee} сом")
            } else {
                "Первая консультация бесплатно".to_string()
            }
        }
        Language::Ky => {
            if fee > 0 {
                format!("{fee} сом")
            } else {
                "Биринчи консультация акысыз".to_string()
            }
        }
        Language::En => {
            if fee > 0 {
                format!("{fee} som")
            } else {
                "First consultation is free".to_string()
            }
        }
    }
}

fn specialties_text(lawyer: &Lawyer, language: Language) -> String {
    if lawyer.specialties.is_empty() {
        match language {
            Language::Ru => "Общая юридическая практика".to_string(),
            Language::Ky => "Жалпы юридикалык практика".to_string(),
            Language::En => "General legal practice".to_string(),
        }
    } else {
        lawyer.specialties.join(", ")
    }
}

/// Build the default system prompt for a lawyer's assistant.
///
/// The behavioral rules matter: the assistant must answer the substantive
/// question fully before ever suggesting an in-person meeting.
pub fn system_prompt(lawyer: &Lawyer, language: Language) -> String {
    let name = &lawyer.full_name;
    let years = lawyer.years_experience;
    let specialties = specialties_text(lawyer, language);
    let fee = fee_text(lawyer.consultation_fee, language);
    let phone = &lawyer.phone;
    let email = &lawyer.email;

    match language {
        Language::Ru => format!(
            "Вы - профессиональный помощник юриста {name} в Кыргызстане.\n\n\
             ИНФОРМАЦИЯ О ЮРИСТЕ:\n\
             - Имя: {name}\n\
             - Опыт: {years} лет\n\
             - Специализации: {specialties}\n\
             - Телефон: {phone}\n\
             - Email: {email}\n\
             - Стоимость консультации: {fee}\n\n\
             ПРАВИЛА:\n\
             1. Отвечайте на русском языке профессионально и дружелюбно\n\
             2. Сначала полностью ответьте на вопрос по существу и только потом предлагайте личную встречу\n\
             3. Предоставляйте общую правовую информацию, но не конкретные юридические советы\n\
             4. Если клиент хочет записаться на встречу, попросите его контактные данные\n\
             5. Будьте краткими, но информативными (максимум 3-4 предложения)\n\
             6. Если не знаете ответ, честно скажите об этом и предложите консультацию с юристом\n\n\
             ЦЕЛЬ: Помочь клиенту и записать его на консультацию к юристу."
        ),
        Language::Ky => format!(
            "Сиз {name} юристтин Кыргызстандагы кесипкөй жардамчысысыз.\n\n\
             ЮРИСТ ЖӨНҮНДӨ:\n\
             - Аты: {name}\n\
             - Тажрыйба: {years} жыл\n\
             - Адистиктер: {specialties}\n\
             - Телефон: {phone}\n\
             - Email: {email}\n\
             - Консультация акысы: {fee}\n\n\
             ЭРЕЖЕЛЕР:\n\
             1. Кыргыз тилинде кесипкөй жооп бериңиз\n\
             2. Адегенде суроого толук жооп бериңиз, андан кийин гана жолугушууну сунуштаңыз\n\
             3. Жалпы укуктук маалымат бериңиз, конкреттүү укуктук кеңеш бербеңиз\n\
             4. Клиент жолугушууга жазылгысы келсе, байланыш маалыматын сураңыз\n\
             5. Кыска жана маалыматтуу болуңуз\n\n\
             МАКСАТ: Клиентке жардам берүү жана аны консультацияга жазуу."
        ),
        Language::En => format!(
            "You are the professional assistant of lawyer {name} in Kyrgyzstan.\n\n\
             ABOUT THE LAWYER:\n\
             - Name: {name}\n\
             - Experience: {years} years\n\
             - Specialties: {specialties}\n\
             - Phone: {phone}\n\
             - Email: {email}\n\
             - Consultation fee: {fee}\n\n\
             RULES:\n\
             1. Respond in English, professionally and warmly\n\
             2. Answer the substantive question fully before ever suggesting an in-person meeting\n\
             3. Provide general legal information only, never specific legal advice\n\
             4. If the client wants to schedule a meeting, ask for their contact details\n\
             5. Be brief but informative (3-4 sentences at most)\n\
             6. If unsure, say so honestly and suggest a consultation with the lawyer\n\n\
             GOAL: Help the client and get them scheduled for a consultation."
        ),
    }
}

/// Built-in welcome message used when the lawyer configured none.
pub fn default_welcome(lawyer_name: &str, language: Language) -> String {
    match language {
        Language::Ru => {
            format!("Здравствуйте! Я помощник юриста {lawyer_name}. Как могу помочь?")
        }
        Language::Ky => format!(
            "Саламатсызбы! Мен юрист {lawyer_name}дын жардамчысымын. Кантип жардам бере алам?"
        ),
        Language::En => {
            format!("Hello! I'm {lawyer_name}'s legal assistant. How can I help you?")
        }
    }
}

/// Canned reply used when office hours gate the AI call and the lawyer
/// configured no offline message.
pub fn offline_default(language: Language) -> String {
    match language {
        Language::Ru => "Извините, в данный момент я не могу ответить. Пожалуйста, оставьте \
                         ваши контактные данные, и наш юрист свяжется с вами в ближайшее время."
            .to_string(),
        Language::Ky => "Кечириңиз, азыр жооп бере албайм. Сураныч, байланыш маалыматыңызды \
                         калтырыңыз, биздин юрист сиз менен жакын арада байланышат."
            .to_string(),
        Language::En => "Sorry, I cannot respond at the moment. Please leave your contact \
                         information and our lawyer will get back to you soon."
            .to_string(),
    }
}

/// Topic buckets for the deterministic fallback reply, matched by substring
/// on the lowercased message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FallbackTopic {
    ContractRental,
    DivorceFamily,
    Labor,
    RealEstate,
    Generic,
}

fn fallback_topic(lower: &str) -> FallbackTopic {
    const CONTRACT: &[&str] = &["договор", "аренд", "келишим", "ижара", "contract", "rental", "lease"];
    const FAMILY: &[&str] = &["развод", "семейн", "алимент", "ажырашуу", "divorce", "family"];
    const LABOR: &[&str] = &["работ", "труд", "увольнен", "жумуш", "эмгек", "labor", "employment"];
    const REAL_ESTATE: &[&str] = &["недвижимост", "квартир", "участок", "үй", "real estate", "property"];

    if CONTRACT.iter().any(|k| lower.contains(k)) {
        FallbackTopic::ContractRental
    } else if FAMILY.iter().any(|k| lower.contains(k)) {
        FallbackTopic::DivorceFamily
    } else if LABOR.iter().any(|k| lower.contains(k)) {
        FallbackTopic::Labor
    } else if REAL_ESTATE.iter().any(|k| lower.contains(k)) {
        FallbackTopic::RealEstate
    } else {
        FallbackTopic::Generic
    }
}

fn fallback_opener(topic: FallbackTopic, language: Language) -> &'static str {
    use FallbackTopic::*;
    match (topic, language) {
        (ContractRental, Language::Ru) => {
            "По вопросам договоров и аренды важно внимательно изучить условия документа до подписания."
        }
        (DivorceFamily, Language::Ru) => {
            "Семейные споры, включая развод и алименты, решаются через суд или по соглашению сторон."
        }
        (Labor, Language::Ru) => {
            "Трудовые споры часто удается решить в досудебном порядке, если правильно оформить претензию."
        }
        (RealEstate, Language::Ru) => {
            "Сделки с недвижимостью требуют тщательной проверки документов и прав собственности."
        }
        (Generic, Language::Ru) => "Спасибо за ваш вопрос!",
        (ContractRental, Language::Ky) => {
            "Келишим жана ижара маселелеринде документтин шарттарын кол коюудан мурда кылдат окуу маанилүү."
        }
        (DivorceFamily, Language::Ky) => {
            "Үй-бүлөлүк талаштар, анын ичинде ажырашуу, сот аркылуу же макулдашуу менен чечилет."
        }
        (Labor, Language::Ky) => "Эмгек талаштарын көбүнчө сотко чейин чечсе болот.",
        (RealEstate, Language::Ky) => {
            "Кыймылсыз мүлк бүтүмдөрү документтерди кылдат текшерүүнү талап кылат."
        }
        (Generic, Language::Ky) => "Сурооңуз үчүн рахмат!",
        (ContractRental, Language::En) => {
            "With contracts and rentals, review every term of the document carefully before signing."
        }
        (DivorceFamily, Language::En) => {
            "Family disputes, including divorce, are resolved in court or by mutual agreement."
        }
        (Labor, Language::En) => {
            "Labor disputes can often be settled before going to court if the claim is filed properly."
        }
        (RealEstate, Language::En) => {
            "Real-estate transactions require careful verification of documents and ownership."
        }
        (Generic, Language::En) => "Thank you for your question!",
    }
}

/// Deterministic reply used when the completion call fails.
///
/// A pure function of (message text, lawyer, language): topic opener by
/// substring bucket, then the lawyer's contact details, then a scheduling
/// offer. Always non-empty.
pub fn fallback_reply(text: &str, lawyer: &Lawyer, language: Language) -> String {
    let opener = fallback_opener(fallback_topic(&text.to_lowercase()), language);
    let name = &lawyer.full_name;
    let phone = &lawyer.phone;
    let email = &lawyer.email;
    let fee = fee_text(lawyer.consultation_fee, language);

    match language {
        Language::Ru => format!(
            "{opener}\n\n\
             Для детальной консультации рекомендую обратиться к {name} напрямую:\n\n\
             📞 Телефон: {phone}\n\
             📧 Email: {email}\n\
             💰 Стоимость: {fee}\n\n\
             Хотите записаться на встречу?"
        ),
        Language::Ky => format!(
            "{opener}\n\n\
             Толук консультация үчүн {name} менен түз байланышыңыз:\n\n\
             📞 Телефон: {phone}\n\
             📧 Email: {email}\n\
             💰 Акысы: {fee}\n\n\
             Жолугушууга жазылгыңыз келеби?"
        ),
        Language::En => format!(
            "{opener}\n\n\
             For a detailed consultation, contact {name} directly:\n\n\
             📞 Phone: {phone}\n\
             📧 Email: {email}\n\
             💰 Fee: {fee}\n\n\
             Would you like to schedule a meeting?"
        ),
    }
}

/// Confirmation appended after a successful contact submission.
pub fn contact_confirmation(
    name: &str,
    phone: &str,
    email: &str,
    lawyer_name: &str,
    language: Language,
) -> String {
    match language {
        Language::Ru => format!(
            "Отлично! Ваши контакты сохранены.\n\n\
             👤 Имя: {name}\n\
             📞 Телефон: {phone}\n\
             📧 Email: {email}\n\n\
             {lawyer_name} свяжется с вами в ближайшее время для назначения встречи.\n\n\
             Спасибо за обращение! 🙏"
        ),
        Language::Ky => format!(
            "Мыкты! Байланыш маалыматыңыз сакталды.\n\n\
             👤 Аты: {name}\n\
             📞 Телефон: {phone}\n\
             📧 Email: {email}\n\n\
             {lawyer_name} жакын арада сиз менен байланышат.\n\n\
             Кайрылганыңыз үчүн рахмат! 🙏"
        ),
        Language::En => format!(
            "Great! Your contact details are saved.\n\n\
             👤 Name: {name}\n\
             📞 Phone: {phone}\n\
             📧 Email: {email}\n\n\
             {lawyer_name} will get in touch shortly to arrange the meeting.\n\n\
             Thank you! 🙏"
        ),
    }
}

/// Confirmation appended after an appointment is scheduled.
pub fn schedule_confirmation(
    scheduled: &chrono::NaiveDateTime,
    client_name: &str,
    category: &str,
    lawyer_name: &str,
    language: Language,
) -> String {
    let when = scheduled.format("%d.%m.%Y %H:%M");
    match language {
        Language::Ru => format!(
            "Запись подтверждена!\n\n\
             📅 Дата и время: {when}\n\
             👤 Клиент: {client_name}\n\
             📋 Категория: {category}\n\n\
             {lawyer_name} будет ждать вас. Если планы изменятся, напишите нам заранее."
        ),
        Language::Ky => format!(
            "Жазылуу ырасталды!\n\n\
             📅 Күнү жана убактысы: {when}\n\
             👤 Клиент: {client_name}\n\
             📋 Категория: {category}\n\n\
             {lawyer_name} сизди күтөт."
        ),
        Language::En => format!(
            "Your appointment is confirmed!\n\n\
             📅 Date and time: {when}\n\
             👤 Client: {client_name}\n\
             📋 Category: {category}\n\n\
             {lawyer_name} will be expecting you. Let us know in advance if plans change."
        ),
    }
}

/// Localized contact-form descriptor: fields are always name, phone, email.
pub fn contact_form(lawyer_name: &str, language: Language) -> ContactForm {
    let (title, subtitle) = match language {
        Language::Ru => (
            "Записаться на консультацию".to_string(),
            format!("Оставьте ваши контакты, и {lawyer_name} свяжется с вами"),
        ),
        Language::Ky => (
            "Консультацияга жазылуу".to_string(),
            format!("Байланыш маалыматыңызды калтырыңыз, {lawyer_name} сиз менен байланышат"),
        ),
        Language::En => (
            "Schedule a consultation".to_string(),
            format!("Leave your contact details and {lawyer_name} will get in touch"),
        ),
    };
    ContactForm {
        title,
        subtitle,
        fields: vec!["name", "phone", "email"],
    }
}

/// Scheduling-suggestion marker words, checked against the assistant's own
/// reply when deciding whether to surface the contact form.
fn scheduling_markers(language: Language) -> &'static [&'static str] {
    match language {
        Language::Ru => &["запис", "встреч", "консультаци"],
        Language::Ky => &["жазыл", "жолугуш", "консультаци"],
        Language::En => &["schedule", "appointment", "meeting", "consultation"],
    }
}

/// True when the reply text suggests scheduling a meeting.
pub fn has_scheduling_marker(reply: &str, language: Language) -> bool {
    let lower = reply.to_lowercase();
    scheduling_markers(language).iter().any(|m| lower.contains(m))
}
