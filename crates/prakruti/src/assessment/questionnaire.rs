use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::domain::{AnswerOption, Dosha, DoshaPoints, Question, QuestionId};

/// Questionnaire as it arrives from configuration, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionnaireDefinition {
    #[serde(default)]
    pub title: Option<String>,
    pub questions: Vec<Question>,
}

/// Validated, ordered questionnaire. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionnaireDefinition")]
pub struct Questionnaire {
    title: String,
    questions: Vec<Question>,
}

impl Questionnaire {
    pub fn new(
        title: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, QuestionnaireError> {
        if questions.is_empty() {
            return Err(QuestionnaireError::Empty);
        }

        let mut seen = HashSet::new();
        for (position, question) in questions.iter().enumerate() {
            if question.id.as_str().trim().is_empty() {
                return Err(QuestionnaireError::BlankId { position });
            }
            if question.options.is_empty() {
                return Err(QuestionnaireError::NoOptions {
                    question_id: question.id.clone(),
                });
            }
            if !seen.insert(&question.id) {
                return Err(QuestionnaireError::DuplicateId {
                    question_id: question.id.clone(),
                });
            }
        }

        if let Some(dosha) = Dosha::ALL
            .into_iter()
            .find(|dosha| max_attainable(&questions, *dosha) > u64::from(u32::MAX))
        {
            return Err(QuestionnaireError::WeightOverflow { dosha });
        }

        Ok(Self {
            title: title.into(),
            questions,
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, QuestionnaireError> {
        let definition: QuestionnaireDefinition = serde_json::from_reader(reader)?;
        Self::try_from(definition)
    }

    pub fn from_path(path: &Path) -> Result<Self, QuestionnaireError> {
        let file = File::open(path).map_err(|source| QuestionnaireError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a validated questionnaire.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn position(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|question| &question.id == id)
    }

    /// Built-in Prakruti questionnaire used when no override is configured.
    pub fn standard() -> Self {
        let questions = STANDARD_QUESTIONS
            .iter()
            .map(|(id, title, options)| Question {
                id: QuestionId::new(*id),
                title: (*title).to_string(),
                options: options
                    .iter()
                    .map(|(label, vata, pitta, kapha)| AnswerOption {
                        label: (*label).to_string(),
                        points: DoshaPoints::new(*vata, *pitta, *kapha),
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: "Prakruti Assessment".to_string(),
            questions,
        }
    }
}

/// Highest total a single category can reach when every question is answered.
fn max_attainable(questions: &[Question], dosha: Dosha) -> u64 {
    questions
        .iter()
        .map(|question| {
            question
                .options
                .iter()
                .map(|option| u64::from(option.points.get(dosha)))
                .max()
                .unwrap_or(0)
        })
        .sum()
}

impl TryFrom<QuestionnaireDefinition> for Questionnaire {
    type Error = QuestionnaireError;

    fn try_from(definition: QuestionnaireDefinition) -> Result<Self, Self::Error> {
        let title = definition
            .title
            .unwrap_or_else(|| "Prakruti Assessment".to_string());
        Self::new(title, definition.questions)
    }
}

/// Reasons a questionnaire definition is rejected.
#[derive(Debug, thiserror::Error)]
pub enum QuestionnaireError {
    #[error("questionnaire has no questions")]
    Empty,
    #[error("question at position {position} has a blank id")]
    BlankId { position: usize },
    #[error("question '{question_id}' has no options")]
    NoOptions { question_id: QuestionId },
    #[error("question id '{question_id}' appears more than once")]
    DuplicateId { question_id: QuestionId },
    #[error("{dosha} weights can add up to more than {} points", u32::MAX)]
    WeightOverflow { dosha: Dosha },
    #[error("questionnaire could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("questionnaire file {path:?} could not be read: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

type OptionRow = (&'static str, u32, u32, u32);

const STANDARD_QUESTIONS: &[(&str, &str, [OptionRow; 3])] = &[
    (
        "body_frame",
        "How would you describe your body frame?",
        [
            ("Thin, light, hard to gain weight", 2, 0, 0),
            ("Medium, athletic, muscular", 0, 2, 0),
            ("Broad, solid, gains weight easily", 0, 0, 2),
        ],
    ),
    (
        "skin",
        "What is your skin usually like?",
        [
            ("Dry, rough, cool to the touch", 2, 0, 0),
            ("Warm, oily in places, prone to redness", 0, 2, 0),
            ("Thick, smooth, moist", 0, 0, 2),
        ],
    ),
    (
        "hair",
        "How is your hair?",
        [
            ("Dry, frizzy, thin", 2, 0, 0),
            ("Fine, straight, early greying or thinning", 0, 2, 0),
            ("Thick, lustrous, wavy", 0, 0, 2),
        ],
    ),
    (
        "appetite",
        "How is your appetite?",
        [
            ("Irregular, sometimes forget to eat", 2, 0, 0),
            ("Strong, irritable if a meal is missed", 0, 2, 0),
            ("Steady, can skip meals comfortably", 0, 0, 2),
        ],
    ),
    (
        "digestion",
        "How is your digestion?",
        [
            ("Variable, gas and bloating", 2, 0, 0),
            ("Quick, occasional acidity or heartburn", 0, 2, 0),
            ("Slow, heavy after meals", 0, 0, 2),
        ],
    ),
    (
        "sleep",
        "How do you usually sleep?",
        [
            ("Light, interrupted, less than six hours", 2, 0, 0),
            ("Moderate, wake up alert", 0, 2, 0),
            ("Deep and long, hard to wake", 0, 0, 2),
        ],
    ),
    (
        "temperament",
        "Which best describes your temperament?",
        [
            ("Enthusiastic, restless, changeable", 2, 0, 0),
            ("Focused, driven, competitive", 0, 2, 0),
            ("Calm, patient, steady", 0, 0, 2),
        ],
    ),
    (
        "memory",
        "How does your memory work?",
        [
            ("Learn quickly, forget quickly", 2, 0, 0),
            ("Sharp and precise", 0, 2, 0),
            ("Slow to learn, never forget", 0, 0, 2),
        ],
    ),
    (
        "climate",
        "Which weather do you find hardest?",
        [
            ("Cold and windy", 2, 0, 0),
            ("Hot and humid", 0, 2, 0),
            ("Cold and damp", 0, 0, 2),
        ],
    ),
    (
        "speech",
        "How do you usually speak?",
        [
            ("Fast, talkative, jumping between topics", 2, 0, 0),
            ("Clear, direct, persuasive", 0, 2, 0),
            ("Slow, soft, deliberate", 0, 0, 2),
        ],
    ),
    (
        "energy",
        "How is your energy through the day?",
        [
            ("Comes in bursts, tire easily", 2, 0, 0),
            ("Moderate and well directed", 0, 2, 0),
            ("Steady with good endurance", 0, 0, 2),
        ],
    ),
    (
        "stress",
        "How do you react under stress?",
        [
            ("Anxious, worried, overwhelmed", 2, 0, 0),
            ("Irritable, impatient, angry", 0, 2, 0),
            ("Withdrawn, avoid the issue", 0, 0, 2),
        ],
    ),
];
