use crate::infra::load_model;
use cervical_risk::assessment::{
    help_resources, AssessmentOutcome, AssessmentService, BatchRowResult, BatchSummary,
    Submission,
};
use cervical_risk::config::AppConfig;
use cervical_risk::error::AppError;
use chrono::Local;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON file holding `{ "patient": {...}, "answers": {...} }`
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Write the PDF report to this path
    #[arg(long)]
    pub(crate) report: Option<PathBuf>,
    /// Model artifact to load instead of the configured one
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export with one submission per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Model artifact to load instead of the configured one
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Print the summary as JSON instead of one line per row
    #[arg(long)]
    pub(crate) json: bool,
}

fn model_path(override_path: Option<PathBuf>) -> Result<PathBuf, AppError> {
    match override_path {
        Some(path) => Ok(path),
        None => Ok(AppConfig::load()?.model.artifact_path),
    }
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        answers,
        report,
        model,
    } = args;

    let model = load_model(&model_path(model)?)?;
    let service = AssessmentService::new(Arc::new(model));

    let raw = std::fs::read_to_string(&answers)?;
    let submission: Submission = serde_json::from_str(&raw).map_err(|err| {
        AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })?;

    let outcome = match report {
        Some(path) => {
            let (outcome, document) =
                service.assess_with_report(&submission, Local::now().naive_local())?;
            std::fs::write(&path, &document.bytes)?;
            println!(
                "Report written to {} ({} page(s))",
                path.display(),
                document.page_count
            );
            outcome
        }
        None => service.assess(&submission)?,
    };

    render_outcome(&outcome);

    println!("\nFind help or more information");
    for resource in help_resources(submission.patient.location.as_deref()) {
        println!("- {}: {}", resource.title, resource.url);
    }

    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let BatchArgs { csv, model, json } = args;

    let model = load_model(&model_path(model)?)?;
    let service = AssessmentService::new(Arc::new(model));
    let summary = service.assess_csv_path(&csv)?;

    if json {
        let rendered = serde_json::to_string_pretty(&summary).map_err(|err| {
            AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
        })?;
        println!("{rendered}");
    } else {
        render_summary(&summary);
    }

    Ok(())
}

fn render_outcome(outcome: &AssessmentOutcome) {
    println!("Prediction Result: {}", outcome.label_text);
    println!("{}", outcome.message);
    if let Some(message) = outcome.caveat_message {
        println!("Warning: {message}");
    }
}

fn render_summary(summary: &BatchSummary) {
    for row in &summary.rows {
        match &row.result {
            BatchRowResult::Assessed(outcome) => {
                let flag = if outcome.has_caveat() { " (caveat)" } else { "" };
                println!(
                    "line {:>4}: {} - {}{}",
                    row.line, outcome.display_name, outcome.label_text, flag
                );
            }
            BatchRowResult::Rejected { reason, .. } => {
                println!("line {:>4}: rejected - {}", row.line, reason);
            }
        }
    }

    println!(
        "\n{} assessed | {} at risk | {} rejected",
        summary.assessed, summary.at_risk, summary.rejected
    );
}
