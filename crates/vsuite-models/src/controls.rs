//! Panel control values (detail level, OCR language, search type, frame count).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Minimum number of frames a video run may request.
pub const MIN_FRAME_COUNT: u32 = 1;
/// Maximum number of frames a video run may request.
pub const MAX_FRAME_COUNT: u32 = 50;
/// Frame count used when the caller does not pick one.
pub const DEFAULT_FRAME_COUNT: u32 = 10;

/// Search result bounds for the vision search panel.
pub const MIN_SEARCH_RESULTS: u32 = 1;
pub const MAX_SEARCH_RESULTS: u32 = 20;
pub const DEFAULT_SEARCH_RESULTS: u32 = 5;

/// Image detail level forwarded to the vision model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    Low,
    #[default]
    High,
    Auto,
}

impl DetailLevel {
    pub const ALL: &'static [DetailLevel] = &[DetailLevel::Low, DetailLevel::High, DetailLevel::Auto];

    pub fn as_str(&self) -> &'static str {
        match self {
            DetailLevel::Low => "low",
            DetailLevel::High => "high",
            DetailLevel::Auto => "auto",
        }
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DetailLevel {
    type Err = ControlParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(DetailLevel::Low),
            "high" => Ok(DetailLevel::High),
            "auto" => Ok(DetailLevel::Auto),
            _ => Err(ControlParseError::new("detail level", s)),
        }
    }
}

/// Language hint for text extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum OcrLanguage {
    #[default]
    Auto,
    English,
    Chinese,
    Spanish,
    French,
    German,
    Japanese,
}

impl OcrLanguage {
    pub const ALL: &'static [OcrLanguage] = &[
        OcrLanguage::Auto,
        OcrLanguage::English,
        OcrLanguage::Chinese,
        OcrLanguage::Spanish,
        OcrLanguage::French,
        OcrLanguage::German,
        OcrLanguage::Japanese,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OcrLanguage::Auto => "auto",
            OcrLanguage::English => "english",
            OcrLanguage::Chinese => "chinese",
            OcrLanguage::Spanish => "spanish",
            OcrLanguage::French => "french",
            OcrLanguage::German => "german",
            OcrLanguage::Japanese => "japanese",
        }
    }

    /// Human-readable name used inside model instructions.
    pub fn display_name(&self) -> &'static str {
        match self {
            OcrLanguage::Auto => "auto-detected",
            OcrLanguage::English => "English",
            OcrLanguage::Chinese => "Chinese",
            OcrLanguage::Spanish => "Spanish",
            OcrLanguage::French => "French",
            OcrLanguage::German => "German",
            OcrLanguage::Japanese => "Japanese",
        }
    }
}

impl fmt::Display for OcrLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OcrLanguage {
    type Err = ControlParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(OcrLanguage::Auto),
            "english" => Ok(OcrLanguage::English),
            "chinese" => Ok(OcrLanguage::Chinese),
            "spanish" => Ok(OcrLanguage::Spanish),
            "french" => Ok(OcrLanguage::French),
            "german" => Ok(OcrLanguage::German),
            "japanese" => Ok(OcrLanguage::Japanese),
            _ => Err(ControlParseError::new("language", s)),
        }
    }
}

/// Kind of search the generated query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    #[default]
    Web,
    Products,
    Similar,
}

impl SearchType {
    pub const ALL: &'static [SearchType] = &[SearchType::Web, SearchType::Products, SearchType::Similar];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Web => "web",
            SearchType::Products => "products",
            SearchType::Similar => "similar",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = ControlParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "web" => Ok(SearchType::Web),
            "products" => Ok(SearchType::Products),
            "similar" => Ok(SearchType::Similar),
            _ => Err(ControlParseError::new("search type", s)),
        }
    }
}

/// Requested number of frames for a video run, always within
/// [`MIN_FRAME_COUNT`]..=[`MAX_FRAME_COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FrameCount(u32);

impl FrameCount {
    pub fn new(count: u32) -> Result<Self, ControlParseError> {
        if (MIN_FRAME_COUNT..=MAX_FRAME_COUNT).contains(&count) {
            Ok(Self(count))
        } else {
            Err(ControlParseError::new(
                "frame count",
                format!("{} (expected {}-{})", count, MIN_FRAME_COUNT, MAX_FRAME_COUNT),
            ))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for FrameCount {
    fn default() -> Self {
        Self(DEFAULT_FRAME_COUNT)
    }
}

impl TryFrom<u32> for FrameCount {
    type Error = ControlParseError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FrameCount> for u32 {
    fn from(value: FrameCount) -> Self {
        value.0
    }
}

impl FromStr for FrameCount {
    type Err = ControlParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count = s
            .trim()
            .parse::<u32>()
            .map_err(|_| ControlParseError::new("frame count", s))?;
        Self::new(count)
    }
}

impl fmt::Display for FrameCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {control}: {value}")]
pub struct ControlParseError {
    control: &'static str,
    value: String,
}

impl ControlParseError {
    fn new(control: &'static str, value: impl Into<String>) -> Self {
        Self {
            control,
            value: value.into(),
        }
    }
}
