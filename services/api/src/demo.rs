use crate::infra::{load_content, parse_answers};
use chrono::Local;
use clap::Args;
use prakruti::assessment::{
    AssessmentSession, Dosha, DoshaProfile, DoshaScoreResult, NavigationOutcome, ProfileCatalog,
};
use prakruti::config::ContentConfig;
use prakruti::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct QuestionnaireArgs {
    /// Questionnaire JSON to validate and print instead of the built-in one
    #[arg(long)]
    pub(crate) questionnaire: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Zero-based option index per question, comma separated (e.g. 0,2,1).
    /// Questions without an entry reuse the last index given.
    #[arg(long)]
    pub(crate) answers: Option<String>,
    /// Questionnaire JSON to use instead of the built-in one
    #[arg(long)]
    pub(crate) questionnaire: Option<PathBuf>,
    /// Guidance catalog JSON to use instead of the built-in one
    #[arg(long)]
    pub(crate) profiles: Option<PathBuf>,
    /// Mark the assessment as submitted after showing results
    #[arg(long)]
    pub(crate) submit: bool,
}

pub(crate) fn run_questionnaire(args: QuestionnaireArgs) -> Result<(), AppError> {
    let content = ContentConfig {
        questionnaire_path: args.questionnaire,
        profiles_path: None,
    };
    let (questionnaire, _) = load_content(&content)?;
    let rendered = serde_json::to_string_pretty(&questionnaire)
        .map_err(|err| AppError::Demo(format!("failed to render questionnaire: {err}")))?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        answers,
        questionnaire,
        profiles,
        submit,
    } = args;

    let content = ContentConfig {
        questionnaire_path: questionnaire,
        profiles_path: profiles,
    };
    let (questionnaire, catalog) = load_content(&content)?;
    let answers = match answers {
        Some(raw) => parse_answers(&raw).map_err(AppError::Demo)?,
        None => vec![0],
    };

    println!("{}", questionnaire.title());
    let mut session = AssessmentSession::new(Arc::new(questionnaire));
    session
        .start()
        .map_err(|err| AppError::Demo(err.to_string()))?;

    let result = walk_session(&mut session, &answers)?;
    render_result(&result, &catalog);

    if submit {
        session
            .submit()
            .map_err(|err| AppError::Demo(err.to_string()))?;
        let completed = session
            .completed_at()
            .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("\nSubmitted: {completed} ({})", session.phase());
    }

    Ok(())
}

fn walk_session(
    session: &mut AssessmentSession,
    answers: &[usize],
) -> Result<DoshaScoreResult, AppError> {
    let mut step = 0;
    loop {
        let question = session.current_question().cloned().ok_or_else(|| {
            AppError::Demo(format!("no question shown in phase {}", session.phase()))
        })?;
        let choice = answers
            .get(step)
            .or_else(|| answers.last())
            .copied()
            .unwrap_or(0);

        session
            .select_option(&question.id, choice)
            .map_err(|err| AppError::Demo(err.to_string()))?;
        let label = question
            .option(choice)
            .map(|option| option.label.as_str())
            .unwrap_or_default();
        println!("  {:>2}. {} -> {}", step + 1, question.title, label);
        step += 1;

        match session.next() {
            NavigationOutcome::Advanced { .. } => continue,
            NavigationOutcome::Finished(result) => return Ok(result),
            NavigationOutcome::Blocked(reason) => {
                return Err(AppError::Demo(format!("navigation blocked: {reason:?}")))
            }
        }
    }
}

fn render_result(result: &DoshaScoreResult, catalog: &ProfileCatalog) {
    println!("\nConstitution");
    for dosha in Dosha::ALL {
        println!(
            "  {:<6} {:>3}%  ({} pts)",
            dosha.label(),
            result.percentage(dosha),
            result.raw.get(dosha)
        );
    }
    println!("  Dominant: {}", result.dominant);
    if result.is_degenerate() {
        println!("  (no weighted answers; percentages default to 0)");
    }

    if let Some(profile) = catalog.get(result.dominant) {
        render_profile(profile);
    }
}

fn render_profile(profile: &DoshaProfile) {
    println!("\n{}", profile.description);
    println!("\nLifestyle");
    for line in &profile.lifestyle {
        println!("  - {line}");
    }
    println!("\nDiet");
    for line in &profile.diet {
        println!("  - {line}");
    }
}
