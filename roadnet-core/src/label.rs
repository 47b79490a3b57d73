// Short alphabetic node labels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelScheme {
    /// `A`..`Z`, then `letter(i / 26 - 1)` + `letter(i % 26)`.
    ///
    /// Matches previously published datasets. From index 702 the first
    /// character runs past `Z` into `[`, `\`, and so on.
    #[default]
    Legacy,
    /// Bijective base-26 (`A`..`Z`, `AA`..`ZZ`, `AAA`..), identical to
    /// `Legacy` below index 702
    Spreadsheet,
}

impl LabelScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelScheme::Legacy => "legacy",
            LabelScheme::Spreadsheet => "spreadsheet",
        }
    }
}

impl fmt::Display for LabelScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(LabelScheme::Legacy),
            "spreadsheet" => Ok(LabelScheme::Spreadsheet),
            other => Err(format!(
                "unknown label scheme '{}' (expected legacy or spreadsheet)",
                other
            )),
        }
    }
}

pub fn node_label(index: usize, scheme: LabelScheme) -> String {
    match scheme {
        LabelScheme::Legacy => legacy_label(index),
        LabelScheme::Spreadsheet => spreadsheet_label(index),
    }
}

fn letter(offset: usize) -> char {
    u32::try_from(offset)
        .ok()
        .and_then(|o| o.checked_add('A' as u32))
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn legacy_label(index: usize) -> String {
    if index < 26 {
        letter(index).to_string()
    } else {
        let mut label = String::with_capacity(2);
        label.push(letter(index / 26 - 1));
        label.push(letter(index % 26));
        label
    }
}

fn spreadsheet_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        letters.push(letter(n % 26));
        n /= 26;
    }
    letters.iter().rev().collect()
}
