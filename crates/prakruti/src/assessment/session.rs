use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AnswerRecord, Question, QuestionId};
use super::questionnaire::Questionnaire;
use super::scoring::{self, DoshaScoreResult};
use super::shortcut::option_index_for_key;

/// Lifecycle stage of an assessment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentPhase {
    Welcome,
    InProgress,
    Results,
    Complete,
}

impl AssessmentPhase {
    pub fn label(&self) -> &'static str {
        match self {
            AssessmentPhase::Welcome => "Welcome",
            AssessmentPhase::InProgress => "In Progress",
            AssessmentPhase::Results => "Results",
            AssessmentPhase::Complete => "Complete",
        }
    }
}

impl fmt::Display for AssessmentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a `next()` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Cursor moved to the given question index.
    Advanced { index: usize },
    /// Last question confirmed; the session is now showing results.
    Finished(DoshaScoreResult),
    /// Nothing changed, or the cursor was moved back to an unanswered question.
    Blocked(BlockReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    NotInProgress(AssessmentPhase),
    Unanswered(QuestionId),
    /// An earlier question has no answer; the cursor now points at it.
    Incomplete(QuestionId),
}

/// Rejected `select_option` call. Session state is untouched when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("answers can only be recorded while in progress (currently {0})")]
    NotInProgress(AssessmentPhase),
    #[error("question '{received}' is not the current question '{expected}'")]
    NotCurrentQuestion {
        expected: QuestionId,
        received: QuestionId,
    },
    #[error("option {option_index} is out of range for question '{question_id}' ({available} options)")]
    OptionOutOfRange {
        question_id: QuestionId,
        option_index: usize,
        available: usize,
    },
    #[error("key {0:?} is not bound to an option")]
    UnboundKey(char),
}

/// Phase transition requested from a phase that does not allow it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} while the assessment is in phase {phase}")]
pub struct TransitionError {
    pub action: &'static str,
    pub phase: AssessmentPhase,
}

/// One patient's walk through a questionnaire.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    questionnaire: Arc<Questionnaire>,
    phase: AssessmentPhase,
    current_index: usize,
    answers: BTreeMap<QuestionId, AnswerRecord>,
    result: Option<DoshaScoreResult>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl AssessmentSession {
    pub fn new(questionnaire: Arc<Questionnaire>) -> Self {
        Self {
            questionnaire,
            phase: AssessmentPhase::Welcome,
            current_index: 0,
            answers: BTreeMap::new(),
            result: None,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn start(&mut self) -> Result<(), TransitionError> {
        if self.phase != AssessmentPhase::Welcome {
            return Err(TransitionError {
                action: "start",
                phase: self.phase,
            });
        }

        self.current_index = 0;
        self.answers.clear();
        self.result = None;
        self.phase = AssessmentPhase::InProgress;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Record or overwrite the answer for the question currently on screen.
    pub fn select_option(
        &mut self,
        question_id: &QuestionId,
        option_index: usize,
    ) -> Result<(), SelectionError> {
        if self.phase != AssessmentPhase::InProgress {
            return Err(SelectionError::NotInProgress(self.phase));
        }

        let question = self.displayed_question();
        if &question.id != question_id {
            return Err(SelectionError::NotCurrentQuestion {
                expected: question.id.clone(),
                received: question_id.clone(),
            });
        }

        let option = question
            .option(option_index)
            .ok_or_else(|| SelectionError::OptionOutOfRange {
                question_id: question.id.clone(),
                option_index,
                available: question.options.len(),
            })?;

        let record = AnswerRecord {
            question_id: question.id.clone(),
            option_index,
            points: option.points,
        };
        self.answers.insert(record.question_id.clone(), record);
        Ok(())
    }

    /// Select an option on the current question from a `1`-`9` key press.
    pub fn select_shortcut(&mut self, key: char) -> Result<usize, SelectionError> {
        let option_index = option_index_for_key(key).ok_or(SelectionError::UnboundKey(key))?;
        if self.phase != AssessmentPhase::InProgress {
            return Err(SelectionError::NotInProgress(self.phase));
        }

        let question_id = self.displayed_question().id.clone();
        self.select_option(&question_id, option_index)?;
        Ok(option_index)
    }

    /// Advance the cursor, or move to results from the last question.
    ///
    /// Never errors: an unanswered current question leaves the session unchanged.
    pub fn next(&mut self) -> NavigationOutcome {
        if self.phase != AssessmentPhase::InProgress {
            return NavigationOutcome::Blocked(BlockReason::NotInProgress(self.phase));
        }

        let current_id = self.displayed_question().id.clone();
        if !self.answers.contains_key(&current_id) {
            return NavigationOutcome::Blocked(BlockReason::Unanswered(current_id));
        }

        if self.current_index + 1 < self.questionnaire.len() {
            self.current_index += 1;
            return NavigationOutcome::Advanced {
                index: self.current_index,
            };
        }

        if let Some(position) = self.first_unanswered_index() {
            self.current_index = position;
            let missing = self.displayed_question().id.clone();
            return NavigationOutcome::Blocked(BlockReason::Incomplete(missing));
        }

        let result = scoring::score(self.answers.values());
        self.result = Some(result);
        self.phase = AssessmentPhase::Results;
        NavigationOutcome::Finished(result)
    }

    /// Step back one question. Returns false when already at the first question or not
    /// in progress.
    pub fn previous(&mut self) -> bool {
        if self.phase != AssessmentPhase::InProgress || self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        true
    }

    pub fn submit(&mut self) -> Result<(), TransitionError> {
        if self.phase != AssessmentPhase::Results {
            return Err(TransitionError {
                action: "submit",
                phase: self.phase,
            });
        }
        self.phase = AssessmentPhase::Complete;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Return to the welcome screen from any phase, discarding all answers.
    pub fn restart(&mut self) {
        self.phase = AssessmentPhase::Welcome;
        self.current_index = 0;
        self.answers.clear();
        self.result = None;
        self.started_at = None;
        self.completed_at = None;
    }

    pub fn phase(&self) -> AssessmentPhase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Question to render, present only while in progress.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            AssessmentPhase::InProgress => self.questionnaire.get(self.current_index),
            _ => None,
        }
    }

    pub fn is_answered(&self, question_id: &QuestionId) -> bool {
        self.answers.contains_key(question_id)
    }

    pub fn answer(&self, question_id: &QuestionId) -> Option<&AnswerRecord> {
        self.answers.get(question_id)
    }

    pub fn answers(&self) -> impl Iterator<Item = &AnswerRecord> {
        self.answers.values()
    }

    /// Score for the completed answer set; `None` before the results phase.
    pub fn result(&self) -> Option<&DoshaScoreResult> {
        self.result.as_ref()
    }

    /// Question ids without an answer, in questionnaire order.
    pub fn missing_answers(&self) -> Vec<&QuestionId> {
        self.questionnaire
            .questions()
            .iter()
            .map(|question| &question.id)
            .filter(|id| !self.answers.contains_key(*id))
            .collect()
    }

    /// `(answered, total)` question counts.
    pub fn progress(&self) -> (usize, usize) {
        (self.answers.len(), self.questionnaire.len())
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    fn displayed_question(&self) -> &Question {
        // current_index is kept below len() and a questionnaire always has a question
        &self.questionnaire.questions()[self.current_index]
    }

    fn first_unanswered_index(&self) -> Option<usize> {
        self.questionnaire
            .questions()
            .iter()
            .position(|question| !self.answers.contains_key(&question.id))
    }
}
