use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RequestError;

pub const DEFAULT_LANGUAGE: &str = "Hindi/Hinglish";
pub const DEFAULT_VIDEO_MINUTES: u32 = 30;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CoachQuery {
    #[serde(deserialize_with = "lenient_u32")]
    pub class_level: u32,
    pub subject: String,
    pub problem_text: String,
    #[serde(default)]
    pub language: Option<String>,
}

impl CoachQuery {
    pub fn language(&self) -> &str {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
    }
}

/// Shared by both lesson plan flavors.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PlannerRequest {
    #[serde(deserialize_with = "lenient_u32")]
    pub grade: u32,
    pub subject: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub time_available: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ActivityRequest {
    #[serde(deserialize_with = "lenient_u32")]
    pub class_size: u32,
    pub learning_levels: Vec<String>,
    #[serde(deserialize_with = "lenient_u32")]
    pub time_left: u32,
    #[serde(default)]
    pub materials_available: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ParentMessageRequest {
    pub student_name: String,
    pub topic: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct VideoSuggestionRequest {
    #[serde(deserialize_with = "lenient_u32")]
    pub grade: u32,
    pub subject: String,
    pub topic: String,
    #[serde(default = "default_video_minutes", deserialize_with = "lenient_u32")]
    pub time_available: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ClusterVideoRequest {
    pub cluster_name: String,
    pub description: String,
}

fn default_video_minutes() -> u32 {
    DEFAULT_VIDEO_MINUTES
}

// The web client posts grades as labels ("Grade 5"); the first digit run wins.
fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrText {
        Num(u32),
        Text(String),
    }

    match NumOrText::deserialize(deserializer)? {
        NumOrText::Num(n) => Ok(n),
        NumOrText::Text(s) => first_number(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("expected a whole number, got `{s}`"))),
    }
}

fn first_number(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits = &text[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

fn non_blank(field: &'static str, value: &str) -> Result<(), RequestError> {
    if value.trim().is_empty() {
        return Err(RequestError::new(field, "must not be empty"));
    }
    Ok(())
}

fn in_range(
    field: &'static str,
    value: u32,
    range: std::ops::RangeInclusive<u32>,
) -> Result<(), RequestError> {
    if !range.contains(&value) {
        return Err(RequestError::new(
            field,
            format!(
                "{value} is outside {}..={}",
                range.start(),
                range.end()
            ),
        ));
    }
    Ok(())
}

const GRADES: std::ops::RangeInclusive<u32> = 1..=12;
const MINUTES: std::ops::RangeInclusive<u32> = 1..=240;

/// Parameter checks run before any prompt is rendered.
pub trait Validate {
    fn validate(&self) -> Result<(), RequestError>;
}

impl Validate for CoachQuery {
    fn validate(&self) -> Result<(), RequestError> {
        in_range("class_level", self.class_level, GRADES)?;
        non_blank("subject", &self.subject)?;
        non_blank("problem_text", &self.problem_text)
    }
}

impl Validate for PlannerRequest {
    fn validate(&self) -> Result<(), RequestError> {
        in_range("grade", self.grade, GRADES)?;
        non_blank("subject", &self.subject)?;
        in_range("time_available", self.time_available, MINUTES)
    }
}

impl Validate for ActivityRequest {
    fn validate(&self) -> Result<(), RequestError> {
        if self.class_size == 0 {
            return Err(RequestError::new("class_size", "must be at least 1"));
        }
        if self.learning_levels.iter().all(|l| l.trim().is_empty()) {
            return Err(RequestError::new(
                "learning_levels",
                "must name at least one level",
            ));
        }
        in_range("time_left", self.time_left, MINUTES)
    }
}

impl Validate for ParentMessageRequest {
    fn validate(&self) -> Result<(), RequestError> {
        non_blank("student_name", &self.student_name)?;
        non_blank("topic", &self.topic)
    }
}

impl Validate for VideoSuggestionRequest {
    fn validate(&self) -> Result<(), RequestError> {
        in_range("grade", self.grade, GRADES)?;
        non_blank("subject", &self.subject)?;
        non_blank("topic", &self.topic)?;
        in_range("time_available", self.time_available, MINUTES)
    }
}

impl Validate for ClusterVideoRequest {
    fn validate(&self) -> Result<(), RequestError> {
        non_blank("cluster_name", &self.cluster_name)?;
        non_blank("description", &self.description)
    }
}
