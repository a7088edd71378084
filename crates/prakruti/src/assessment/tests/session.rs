use std::sync::Arc;

use super::common::*;
use crate::assessment::{
    AssessmentPhase, AssessmentSession, BlockReason, Dosha, NavigationOutcome, QuestionId,
    Questionnaire, SelectionError, TransitionError,
};

fn q(id: &str) -> QuestionId {
    QuestionId::new(id)
}

#[test]
fn new_session_waits_on_welcome() {
    let session = AssessmentSession::new(Arc::new(two_question_questionnaire()));

    assert_eq!(session.phase(), AssessmentPhase::Welcome);
    assert!(session.current_question().is_none());
    assert!(session.result().is_none());
    assert!(session.started_at().is_none());
}

#[test]
fn start_shows_first_question_and_only_fires_from_welcome() {
    let mut session = started_session(two_question_questionnaire());

    assert_eq!(session.phase(), AssessmentPhase::InProgress);
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.current_question().map(|question| &question.id), Some(&q("q1")));
    assert!(session.started_at().is_some());

    assert_eq!(
        session.start(),
        Err(TransitionError {
            action: "start",
            phase: AssessmentPhase::InProgress,
        })
    );
}

#[test]
fn next_without_answer_does_not_move() {
    let mut session = started_session(two_question_questionnaire());

    let outcome = session.next();

    assert_eq!(outcome, NavigationOutcome::Blocked(BlockReason::Unanswered(q("q1"))));
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.phase(), AssessmentPhase::InProgress);
}

#[test]
fn selecting_a_non_current_question_is_rejected() {
    let mut session = started_session(two_question_questionnaire());

    let error = session
        .select_option(&q("q2"), 0)
        .expect_err("q2 is not displayed");

    assert_eq!(
        error,
        SelectionError::NotCurrentQuestion {
            expected: q("q1"),
            received: q("q2"),
        }
    );
    assert!(!session.is_answered(&q("q2")));
    assert_eq!(session.progress(), (0, 2));
}

#[test]
fn out_of_range_option_does_not_touch_existing_answer() {
    let mut session = started_session(two_question_questionnaire());
    session.select_option(&q("q1"), 1).expect("valid option");

    let error = session
        .select_option(&q("q1"), 2)
        .expect_err("only two options");

    assert_eq!(
        error,
        SelectionError::OptionOutOfRange {
            question_id: q("q1"),
            option_index: 2,
            available: 2,
        }
    );
    assert_eq!(session.answer(&q("q1")).map(|record| record.option_index), Some(1));
}

#[test]
fn selection_overwrites_previous_answer() {
    let mut session = started_session(two_question_questionnaire());
    session.select_option(&q("q1"), 0).expect("valid option");
    session.select_option(&q("q1"), 1).expect("valid option");

    assert_eq!(session.answer(&q("q1")).map(|record| record.option_index), Some(1));
    assert_eq!(session.progress(), (1, 2));
}

#[test]
fn selection_requires_an_in_progress_session() {
    let mut session = AssessmentSession::new(Arc::new(two_question_questionnaire()));

    assert_eq!(
        session.select_option(&q("q1"), 0),
        Err(SelectionError::NotInProgress(AssessmentPhase::Welcome))
    );
    assert_eq!(
        session.select_shortcut('1'),
        Err(SelectionError::NotInProgress(AssessmentPhase::Welcome))
    );
}

#[test]
fn numeric_shortcuts_select_options_within_bounds() {
    let mut session = started_session(three_question_questionnaire());

    assert_eq!(session.select_shortcut('3'), Ok(2));
    assert_eq!(session.answer(&q("frame")).map(|record| record.option_index), Some(2));

    assert!(matches!(
        session.select_shortcut('4'),
        Err(SelectionError::OptionOutOfRange { option_index: 3, .. })
    ));
    assert_eq!(session.select_shortcut('0'), Err(SelectionError::UnboundKey('0')));
    assert_eq!(session.select_shortcut('x'), Err(SelectionError::UnboundKey('x')));
    assert_eq!(session.answer(&q("frame")).map(|record| record.option_index), Some(2));
}

#[test]
fn shortcut_and_button_navigation_share_the_same_gate() {
    let mut session = started_session(two_question_questionnaire());

    assert!(matches!(session.next(), NavigationOutcome::Blocked(_)));
    session.select_shortcut('2').expect("option two exists");
    assert_eq!(session.next(), NavigationOutcome::Advanced { index: 1 });
}

#[test]
fn previous_keeps_answers_editable() {
    let mut session = started_session(two_question_questionnaire());
    assert!(!session.previous(), "cannot go back from the first question");

    session.select_option(&q("q1"), 0).expect("valid option");
    session.next();
    assert!(session.previous());
    assert_eq!(session.current_index(), 0);
    assert!(session.is_answered(&q("q1")));

    session.select_option(&q("q1"), 1).expect("answer stays editable");
    assert_eq!(session.next(), NavigationOutcome::Advanced { index: 1 });
    assert_eq!(session.missing_answers(), vec![&q("q2")]);
}

#[test]
fn finishing_moves_to_results_then_submit_completes() {
    let mut session = started_session(two_question_questionnaire());
    session.select_option(&q("q1"), 0).expect("valid option");
    session.next();
    session.select_option(&q("q2"), 0).expect("valid option");

    let outcome = session.next();

    let NavigationOutcome::Finished(result) = outcome else {
        panic!("expected results, got {outcome:?}");
    };
    assert_eq!(session.phase(), AssessmentPhase::Results);
    assert_eq!(session.result(), Some(&result));
    assert!(session.current_question().is_none());
    assert!(session.missing_answers().is_empty());

    assert_eq!(
        session.next(),
        NavigationOutcome::Blocked(BlockReason::NotInProgress(AssessmentPhase::Results))
    );
    assert!(!session.previous());
    assert_eq!(
        session.select_option(&q("q2"), 1),
        Err(SelectionError::NotInProgress(AssessmentPhase::Results))
    );

    session.submit().expect("results submit");
    assert_eq!(session.phase(), AssessmentPhase::Complete);
    assert!(session.completed_at().is_some());
    assert_eq!(session.result(), Some(&result));
    assert!(session.submit().is_err());
}

#[test]
fn submit_is_rejected_before_results() {
    let mut session = started_session(two_question_questionnaire());
    assert_eq!(
        session.submit(),
        Err(TransitionError {
            action: "submit",
            phase: AssessmentPhase::InProgress,
        })
    );
}

#[test]
fn restart_resets_from_every_phase() {
    let questionnaire = two_question_questionnaire();
    let ids: Vec<QuestionId> = questionnaire
        .questions()
        .iter()
        .map(|question| question.id.clone())
        .collect();

    let welcome = AssessmentSession::new(Arc::new(questionnaire.clone()));
    let mut in_progress = started_session(questionnaire.clone());
    in_progress.select_option(&q("q1"), 0).expect("valid option");
    in_progress.next();
    let results = complete_session(questionnaire.clone(), &[0, 1]);
    let mut complete = complete_session(questionnaire, &[1, 1]);
    complete.submit().expect("results submit");

    for mut session in [welcome, in_progress, results, complete] {
        session.restart();
        session.restart();

        assert_eq!(session.phase(), AssessmentPhase::Welcome);
        assert_eq!(session.current_index(), 0);
        assert!(session.result().is_none());
        assert!(session.completed_at().is_none());
        assert!(ids.iter().all(|id| !session.is_answered(id)));
        assert_eq!(session.progress(), (0, 2));

        session.start().expect("restarted session starts again");
    }
}

#[test]
fn heaviest_accepted_weights_score_without_overflow() {
    let json = r#"{
        "questions": [
            { "id": "q1", "title": "One", "options": [{ "label": "Heavy", "points": { "vata": 2147483648, "kapha": 1 } }] },
            { "id": "q2", "title": "Two", "options": [{ "label": "Heavy", "points": { "vata": 2147483647 } }] }
        ]
    }"#;
    let questionnaire = Questionnaire::from_reader(json.as_bytes()).expect("within point range");

    let session = complete_session(questionnaire, &[0, 0]);

    let result = session.result().expect("results reached");
    assert_eq!(result.raw.vata, u32::MAX);
    assert_eq!((result.vata, result.pitta, result.kapha), (100, 0, 0));
    assert_eq!(result.dominant, Dosha::Vata);
}
