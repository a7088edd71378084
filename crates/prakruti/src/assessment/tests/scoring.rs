use super::common::*;
use crate::assessment::scoring::{self, from_raw};
use crate::assessment::{AssessmentPhase, Dosha, DoshaPoints, QuestionId};

#[test]
fn two_question_example_scores_kapha_dominant() {
    let session = complete_session(two_question_questionnaire(), &[0, 0]);

    assert_eq!(session.phase(), AssessmentPhase::Results);
    let result = session.result().expect("result available");
    assert_eq!(result.raw, DoshaPoints::new(3, 0, 5));
    assert_eq!((result.vata, result.pitta, result.kapha), (38, 0, 63));
    assert_eq!(result.dominant, Dosha::Kapha);
    assert_eq!(result.rounding_drift(), 1);
}

#[test]
fn mixed_answers_score_pitta_dominant() {
    let session = complete_session(two_question_questionnaire(), &[1, 1]);

    let result = session.result().expect("result available");
    assert_eq!(result.raw, DoshaPoints::new(2, 5, 0));
    assert_eq!((result.vata, result.pitta, result.kapha), (29, 71, 0));
    assert_eq!(result.dominant, Dosha::Pitta);
}

#[test]
fn raw_ties_resolve_to_vata_before_pitta() {
    let result = from_raw(DoshaPoints::new(5, 5, 0));
    assert_eq!(result.dominant, Dosha::Vata);
    assert_eq!((result.vata, result.pitta, result.kapha), (50, 50, 0));

    let result = from_raw(DoshaPoints::new(0, 7, 7));
    assert_eq!(result.dominant, Dosha::Pitta);
}

#[test]
fn dominant_follows_raw_scores_when_rounding_hides_the_gap() {
    // 1000/2001 and 1001/2001 both round to 50%
    let result = from_raw(DoshaPoints::new(1000, 1001, 0));
    assert_eq!(result.vata, result.pitta);
    assert_eq!(result.dominant, Dosha::Pitta);
}

#[test]
fn scoring_is_deterministic() {
    let session = complete_session(three_question_questionnaire(), &[2, 0, 1]);
    let first = scoring::score(session.answers());
    let second = scoring::score(session.answers());

    assert_eq!(first, second);
    assert_eq!(Some(&first), session.result());
}

#[test]
fn zero_weight_questionnaire_produces_zero_percentages() {
    let session = complete_session(zero_weight_questionnaire(), &[0]);

    assert_eq!(session.phase(), AssessmentPhase::Results);
    let result = session.result().expect("result available");
    assert!(result.is_degenerate());
    assert_eq!((result.vata, result.pitta, result.kapha), (0, 0, 0));
    assert_eq!(result.dominant, Dosha::Vata);
    assert_eq!(result.rounding_drift(), -100);
}

#[test]
fn percentages_stay_in_bounds_and_near_one_hundred() {
    for vata in 0..=12u32 {
        for pitta in 0..=12u32 {
            for kapha in 0..=12u32 {
                let raw = DoshaPoints::new(vata, pitta, kapha);
                let result = from_raw(raw);

                for dosha in Dosha::ALL {
                    assert!(result.percentage(dosha) <= 100, "{raw:?}");
                }

                if raw.is_zero() {
                    continue;
                }
                assert!(result.rounding_drift().abs() <= 2, "{raw:?} -> {result:?}");

                let best = vata.max(pitta).max(kapha);
                let expected = Dosha::ALL
                    .into_iter()
                    .find(|dosha| raw.get(*dosha) == best)
                    .expect("some category holds the maximum");
                assert_eq!(result.dominant, expected, "{raw:?}");
            }
        }
    }
}

#[test]
fn every_answer_path_matches_the_raw_tally() {
    for frame in 0..3 {
        for sleep in 0..3 {
            for appetite in 0..3 {
                let session =
                    complete_session(three_question_questionnaire(), &[frame, sleep, appetite]);
                let result = *session.result().expect("result available");

                let mut expected = DoshaPoints::default();
                for choice in [frame, sleep, appetite] {
                    let points = match choice {
                        0 => DoshaPoints::new(2, 0, 0),
                        1 => DoshaPoints::new(0, 2, 0),
                        _ => DoshaPoints::new(0, 0, 2),
                    };
                    expected.add(&points);
                }

                assert_eq!(result.raw, expected);
                assert_eq!(result, from_raw(expected));
            }
        }
    }
}

#[test]
fn answers_snapshot_option_points() {
    let session = complete_session(two_question_questionnaire(), &[1, 0]);

    let first = session.answer(&QuestionId::new("q1")).expect("answered");
    assert_eq!(first.option_index, 1);
    assert_eq!(first.points, DoshaPoints::new(0, 3, 0));

    let second = session.answer(&QuestionId::new("q2")).expect("answered");
    assert_eq!(second.points, DoshaPoints::new(0, 0, 5));
}
