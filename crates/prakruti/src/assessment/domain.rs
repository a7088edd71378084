use std::fmt;

use serde::{Deserialize, Serialize};

/// Ayurvedic constitution category.
///
/// Declaration order doubles as the tie-break priority when two categories share the
/// highest raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dosha {
    #[serde(alias = "Vata")]
    Vata,
    #[serde(alias = "Pitta")]
    Pitta,
    #[serde(alias = "Kapha")]
    Kapha,
}

impl Dosha {
    /// Every category, in tie-break priority order.
    pub const ALL: [Dosha; 3] = [Dosha::Vata, Dosha::Pitta, Dosha::Kapha];

    pub fn label(&self) -> &'static str {
        match self {
            Dosha::Vata => "Vata",
            Dosha::Pitta => "Pitta",
            Dosha::Kapha => "Kapha",
        }
    }
}

impl fmt::Display for Dosha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-dosha point weights. Categories absent from the source mapping count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DoshaPoints {
    #[serde(alias = "Vata")]
    pub vata: u32,
    #[serde(alias = "Pitta")]
    pub pitta: u32,
    #[serde(alias = "Kapha")]
    pub kapha: u32,
}

impl DoshaPoints {
    pub const fn new(vata: u32, pitta: u32, kapha: u32) -> Self {
        Self { vata, pitta, kapha }
    }

    pub fn get(&self, dosha: Dosha) -> u32 {
        match dosha {
            Dosha::Vata => self.vata,
            Dosha::Pitta => self.pitta,
            Dosha::Kapha => self.kapha,
        }
    }

    /// Saturates at `u32::MAX`. Validated questionnaires never reach it.
    pub fn add(&mut self, other: &DoshaPoints) {
        self.vata = self.vata.saturating_add(other.vata);
        self.pitta = self.pitta.saturating_add(other.pitta);
        self.kapha = self.kapha.saturating_add(other.kapha);
    }

    pub fn total(&self) -> u64 {
        u64::from(self.vata) + u64::from(self.pitta) + u64::from(self.kapha)
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }
}

/// Stable identifier of a question within a questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Multiple-choice prompt presented to the patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn option(&self, index: usize) -> Option<&AnswerOption> {
        self.options.get(index)
    }
}

/// One selectable answer and the points it contributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: String,
    #[serde(default)]
    pub points: DoshaPoints,
}

/// Answer captured for a question.
///
/// `points` is copied from the option at selection time so later edits to the
/// questionnaire cannot change an in-flight score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub option_index: usize,
    pub points: DoshaPoints,
}
