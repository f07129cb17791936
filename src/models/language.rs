use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// Target languages the translator accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Spanish,
    French,
    German,
    Romanian,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Romanian,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Romanian => "Romanian",
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = AppError;

    // Names are matched exactly: "french" is not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|language| language.as_str() == s)
            .ok_or_else(|| AppError::UnsupportedLanguage(s.to_string()))
    }
}
