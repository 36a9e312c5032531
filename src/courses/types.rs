use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PASSING_SCORE: i32 = 70;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Video,
    Audio,
    Text,
    Quiz,
}

impl From<&str> for ContentType {
    fn from(s: &str) -> Self {
        match s {
            "video" => Self::Video,
            "audio" => Self::Audio,
            "quiz" => Self::Quiz,
            _ => Self::Text,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
            Self::Text => write!(f, "text"),
            Self::Quiz => write!(f, "quiz"),
        }
    }
}

impl ContentType {
    pub fn is_timed(&self) -> bool {
        matches!(self, Self::Video | Self::Audio)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PricingType {
    Free,
    Paid,
    Premium,
}

impl From<&str> for PricingType {
    fn from(s: &str) -> Self {
        match s {
            "paid" => Self::Paid,
            "premium" => Self::Premium,
            _ => Self::Free,
        }
    }
}

impl std::fmt::Display for PricingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Paid => write!(f, "paid"),
            Self::Premium => write!(f, "premium"),
        }
    }
}

/// Quiz content stored as Jsonb on the lesson row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizDefinition {
    pub passing_score: Option<i32>,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: Uuid,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answers: Vec<usize>,
}

impl QuizDefinition {
    pub fn passing_score(&self) -> i32 {
        self.passing_score.unwrap_or(DEFAULT_PASSING_SCORE)
    }
}
