//! Categorical Encoding
//!
//! Closed enumerations for the two categorical fields. Values are matched
//! exactly (no case folding, no trimming) by both the dataset loader and
//! request validation, so training and serving share one policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("invalid value '{value}' for categorical field {field}")]
    InvalidCategory { field: &'static str, value: String },

    #[error("invalid code {code} for categorical field {field}")]
    InvalidCode { field: &'static str, code: i64 },

    #[error("'{0}' is not a categorical field")]
    UnknownField(String),
}

// ============================================================================
// LAND COVER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandCover {
    Forest,
    Rural,
    Urban,
}

impl LandCover {
    pub const ALL: [LandCover; 3] = [LandCover::Forest, LandCover::Rural, LandCover::Urban];

    pub fn as_str(&self) -> &'static str {
        match self {
            LandCover::Forest => "Forest",
            LandCover::Rural => "Rural",
            LandCover::Urban => "Urban",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            LandCover::Forest => 0,
            LandCover::Rural => 1,
            LandCover::Urban => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| i64::from(c.code()) == code)
    }
}

impl FromStr for LandCover {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| EncodingError::InvalidCategory {
                field: CategoricalField::LandCover.name(),
                value: s.to_string(),
            })
    }
}

impl fmt::Display for LandCover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SOIL TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilType {
    Sandy,
    Silt,
    Clay,
}

impl SoilType {
    pub const ALL: [SoilType; 3] = [SoilType::Sandy, SoilType::Silt, SoilType::Clay];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Sandy => "Sandy",
            SoilType::Silt => "Silt",
            SoilType::Clay => "Clay",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            SoilType::Sandy => 0,
            SoilType::Silt => 1,
            SoilType::Clay => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| i64::from(c.code()) == code)
    }
}

impl FromStr for SoilType {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| EncodingError::InvalidCategory {
                field: CategoricalField::SoilType.name(),
                value: s.to_string(),
            })
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FIELD DISPATCH
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalField {
    LandCover,
    SoilType,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 2] = [CategoricalField::LandCover, CategoricalField::SoilType];

    /// Column name in datasets and request payloads
    pub fn name(&self) -> &'static str {
        match self {
            CategoricalField::LandCover => "Land_Cover",
            CategoricalField::SoilType => "Soil_Type",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Accepted values, in code order
    pub fn domain(&self) -> [&'static str; 3] {
        match self {
            CategoricalField::LandCover => LandCover::ALL.map(|c| c.as_str()),
            CategoricalField::SoilType => SoilType::ALL.map(|c| c.as_str()),
        }
    }
}

/// Encode a categorical value to its fixed integer code
pub fn encode(field: CategoricalField, value: &str) -> Result<u8, EncodingError> {
    match field {
        CategoricalField::LandCover => value.parse::<LandCover>().map(|c| c.code()),
        CategoricalField::SoilType => value.parse::<SoilType>().map(|c| c.code()),
    }
}

/// Encode by field name
pub fn encode_by_name(field: &str, value: &str) -> Result<u8, EncodingError> {
    let field = CategoricalField::from_name(field)
        .ok_or_else(|| EncodingError::UnknownField(field.to_string()))?;
    encode(field, value)
}

/// Accept an already-encoded code (processed datasets), checking the domain
pub fn check_code(field: CategoricalField, code: i64) -> Result<u8, EncodingError> {
    let valid = match field {
        CategoricalField::LandCover => LandCover::from_code(code).map(|c| c.code()),
        CategoricalField::SoilType => SoilType::from_code(code).map(|c| c.code()),
    };
    valid.ok_or(EncodingError::InvalidCode { field: field.name(), code })
}
