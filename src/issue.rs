use crate::infra::{load_avatar, LocalObjectUrls};
use crate::render::{render_batch_summary, render_json, render_view};
use clap::Args;
use conference_ticket::config::{AppConfig, IntakeConfig};
use conference_ticket::error::AppError;
use conference_ticket::intake::{
    AvatarFile, DataUriDecoder, DecodeApplied, DecodeDispatcher, FormController, FormInput,
    FormView, RosterImporter, SerialCode, SubmitOutcome,
};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct IssueArgs {
    /// Attendee's full name
    #[arg(long, default_value = "")]
    pub(crate) name: String,
    /// Attendee's email address
    #[arg(long, default_value = "")]
    pub(crate) email: String,
    /// Optional GitHub username, with or without the leading @
    #[arg(long, default_value = "")]
    pub(crate) github: String,
    /// Avatar image (JPG or PNG)
    #[arg(long)]
    pub(crate) avatar: Option<PathBuf>,
    /// Print the full view model as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SerialArgs {
    /// Attendee's full name
    #[arg(long)]
    pub(crate) name: String,
    /// Attendee's email address
    #[arg(long)]
    pub(crate) email: String,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV with full_name,email,github,avatar columns; avatar paths are relative to the file
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Print one JSON document for the whole batch
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct BatchRow {
    line: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    view: Option<FormView>,
}

pub(crate) async fn run_issue(args: IssueArgs, config: &AppConfig) -> Result<(), AppError> {
    let IssueArgs {
        name,
        email,
        github,
        avatar,
        json,
    } = args;

    let avatar = avatar.as_deref().map(load_avatar).transpose()?;
    let input = FormInput {
        full_name: name,
        email,
        github,
    };
    let view = issue_ticket(&config.intake, &input, avatar).await;

    let mut stdout = std::io::stdout().lock();
    if json {
        render_json(&view, &mut stdout)?;
    } else {
        render_view(&view, &mut stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

pub(crate) fn run_serial(args: SerialArgs) -> Result<(), AppError> {
    let serial = SerialCode::for_applicant(args.name.trim(), args.email.trim());
    println!("{serial}");
    Ok(())
}

pub(crate) async fn run_batch(args: BatchArgs, config: &AppConfig) -> Result<(), AppError> {
    let entries = RosterImporter::from_path(&args.csv)?;
    info!(rows = entries.len(), roster = %args.csv.display(), "issuing tickets from roster");

    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries {
        let avatar = match entry.avatar.as_deref().map(load_avatar).transpose() {
            Ok(avatar) => avatar,
            Err(err) => {
                warn!(line = entry.line, error = %err, "avatar could not be read");
                rows.push(BatchRow {
                    line: entry.line,
                    error: Some(format!("could not read avatar: {err}")),
                    view: None,
                });
                continue;
            }
        };

        let view = issue_ticket(&config.intake, &entry.input, avatar).await;
        rows.push(BatchRow {
            line: entry.line,
            error: None,
            view: Some(view),
        });
    }

    let mut stdout = std::io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &rows)?;
        writeln!(stdout)?;
    } else {
        for row in &rows {
            writeln!(stdout, "== line {}", row.line)?;
            match (&row.error, &row.view) {
                (Some(error), _) => writeln!(stdout, "Ticket not issued: {error}")?,
                (None, Some(view)) => render_view(view, &mut stdout)?,
                (None, None) => {}
            }
            writeln!(stdout)?;
        }
        let issued = rows
            .iter()
            .filter(|row| row.view.as_ref().is_some_and(|view| view.ticket.is_some()))
            .count();
        render_batch_summary(issued, rows.len(), &mut stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

/// Run one form session to completion: select the avatar, submit, and wait for the decode.
pub(crate) async fn issue_ticket(
    config: &IntakeConfig,
    input: &FormInput,
    avatar: Option<AvatarFile>,
) -> FormView {
    let (dispatcher, mut completions) = DecodeDispatcher::channel(Arc::new(DataUriDecoder));
    let mut controller = FormController::from_config(LocalObjectUrls::default(), config);
    controller.picker_changed(avatar);

    if let SubmitOutcome::Issued { decode, .. } = controller.submit(input) {
        dispatcher.dispatch(decode);
        while let Some(completion) = completions.recv().await {
            if controller.complete_decode(completion) != DecodeApplied::Stale {
                break;
            }
        }
    }

    let view = controller.view();
    controller.teardown();
    view
}
