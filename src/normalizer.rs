// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Message text normalization.

use regex::Regex;
use std::sync::LazyLock;

static NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("newline pattern compiles"));

/// Join repeated form values into one message.
pub fn join_values(values: &[String]) -> String {
    values.join(" ")
}

/// Replace every line break with a single space.
///
/// The output never contains `\n`, so applying it twice is a no-op.
pub fn collapse_newlines(text: &str) -> String {
    NEWLINE.replace_all(text, " ").into_owned()
}

/// Whether the text is empty once surrounding whitespace is ignored.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
