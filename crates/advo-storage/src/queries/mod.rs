// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules. Each accepts `&Database` and runs through the
//! single background writer thread.

pub mod configs;
pub mod consultations;
pub mod lawyers;
pub mod leads;
pub mod messages;
pub mod sessions;

use std::str::FromStr;

/// Parses a TEXT column into a closed string-backed enum.
pub(crate) fn parse_enum<T: FromStr>(value: &str, what: &'static str) -> rusqlite::Result<T> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("invalid {what}: {value}").into(),
        )
    })
}

/// Parses a JSON TEXT column into its typed form.
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(
    value: &str,
    what: &'static str,
) -> rusqlite::Result<T> {
    serde_json::from_str(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("invalid {what} JSON: {e}").into(),
        )
    })
}
