#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported execution languages.
///
/// The set is closed: a submission in any other language is rejected at
/// deserialization. When the `sea-orm` feature is enabled, this enum can be
/// used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
pub enum Language {
    #[serde(rename = "cpp")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "cpp"))]
    Cpp,
    #[serde(rename = "python3")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "python3"))]
    Python3,
}

impl Language {
    /// All supported languages.
    pub const ALL: &'static [Language] = &[Self::Cpp, Self::Python3];

    /// Returns the string representation (the wire form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpp => "cpp",
            Self::Python3 => "python3",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unsupported language string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLanguageError {
    invalid: String,
}

impl fmt::Display for ParseLanguageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unsupported language '{}'. Valid values: {}",
            self.invalid,
            Language::ALL
                .iter()
                .map(|l| l.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseLanguageError {}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpp" => Ok(Self::Cpp),
            "python3" => Ok(Self::Python3),
            _ => Err(ParseLanguageError {
                invalid: s.to_string(),
            }),
        }
    }
}
