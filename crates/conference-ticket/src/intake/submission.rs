use serde::Serialize;
use tracing::{info, warn};

use super::decode::{DecodeCompletion, DecodeError, PendingDecode};
use super::domain::{
    Applicant, FieldErrors, FormField, FormInput, GithubHandle, SubmissionId, Ticket,
    TicketAvatar, ValidationResult,
};
use super::preview::{ObjectUrlRegistry, PreviewManager};
use super::validation::validate_text_fields;

pub const AVATAR_UNREADABLE: &str = "We couldn't read that image. Please choose another file.";

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStage {
    Collecting,
    Issued,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    /// A submission passed validation.
    Issue,
    /// The ticket was withdrawn (decode failure or start over).
    Revert,
}

impl FormStage {
    pub fn transition(self, event: StageEvent) -> Self {
        match event {
            StageEvent::Issue => FormStage::Issued,
            StageEvent::Revert => FormStage::Collecting,
        }
    }

    pub fn form_visible(self) -> bool {
        self == FormStage::Collecting
    }

    pub fn ticket_visible(self) -> bool {
        self == FormStage::Issued
    }
}

/// What a submission attempt produced.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// At least one field failed; every field's result is reported.
    Rejected { results: Vec<ValidationResult> },
    /// The ticket text is in place; the avatar arrives once `decode` completes.
    Issued {
        ticket: Ticket,
        decode: PendingDecode,
    },
}

/// How a decode completion was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeApplied {
    AvatarReady,
    /// A newer submission (or a reset) superseded this one.
    Stale,
    Failed(DecodeError),
}

/// Drives the collecting/issued lifecycle.
#[derive(Debug)]
pub struct SubmissionHandler {
    stage: FormStage,
    errors: FieldErrors,
    ticket: Option<Ticket>,
    last_issued: u64,
    latest: Option<SubmissionId>,
}

impl Default for SubmissionHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionHandler {
    pub fn new() -> Self {
        Self {
            stage: FormStage::Collecting,
            errors: FieldErrors::default(),
            ticket: None,
            last_issued: 0,
            latest: None,
        }
    }

    pub fn stage(&self) -> FormStage {
        self.stage
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn ticket(&self) -> Option<&Ticket> {
        self.ticket.as_ref()
    }

    /// Submission the next completion must carry to be applied.
    pub fn latest(&self) -> Option<SubmissionId> {
        self.latest
    }

    /// Validate every field and, when all pass, issue the ticket.
    pub fn submit<U: ObjectUrlRegistry>(
        &mut self,
        input: &FormInput,
        preview: &mut PreviewManager<U>,
    ) -> SubmitOutcome {
        self.errors = FieldErrors::default();

        let [name, email] = validate_text_fields(input);
        let avatar = preview.validate_selected();
        let results = vec![name, email, avatar];

        for result in &results {
            match result.field {
                FormField::Name => self.errors.name = result.message.clone(),
                FormField::Email => self.errors.email = result.message.clone(),
                FormField::Avatar => {}
            }
        }

        let all_valid = results.iter().all(|result| result.valid);
        let avatar_file = match (all_valid, preview.selected()) {
            (true, Some(file)) => file.clone(),
            _ => {
                // Field errors render only on the form.
                if self.stage == FormStage::Issued {
                    self.withdraw();
                }
                return SubmitOutcome::Rejected { results };
            }
        };

        let applicant = Applicant {
            full_name: input.full_name.trim().to_string(),
            email: input.email.trim().to_string(),
            github_handle: GithubHandle::parse(&input.github),
            avatar: avatar_file,
        };

        self.last_issued += 1;
        let submission = SubmissionId(self.last_issued);
        self.latest = Some(submission);

        let ticket = Ticket::issue(submission, &applicant);
        self.ticket = Some(ticket.clone());
        self.stage = self.stage.transition(StageEvent::Issue);
        info!(%submission, serial = %ticket.serial, "ticket issued");

        SubmitOutcome::Issued {
            ticket,
            decode: PendingDecode {
                submission,
                file: applicant.avatar,
            },
        }
    }

    /// Apply a decode completion if it belongs to the latest submission.
    ///
    /// A failed decode withdraws the ticket and returns to the form with the avatar hint in
    /// error state.
    pub fn complete_decode<U: ObjectUrlRegistry>(
        &mut self,
        completion: DecodeCompletion,
        preview: &mut PreviewManager<U>,
    ) -> DecodeApplied {
        let DecodeCompletion { submission, result } = completion;

        if self.latest != Some(submission) {
            warn!(%submission, latest = ?self.latest, "discarding stale avatar decode");
            return DecodeApplied::Stale;
        }

        match result {
            Ok(data_uri) => {
                if let Some(ticket) = self.ticket.as_mut() {
                    ticket.avatar = TicketAvatar::Ready { data_uri };
                }
                DecodeApplied::AvatarReady
            }
            Err(error) => {
                warn!(%submission, %error, "avatar decode failed; returning to the form");
                self.withdraw();
                preview.show_error(AVATAR_UNREADABLE);
                DecodeApplied::Failed(error)
            }
        }
    }

    /// Return to the form, dropping the ticket and invalidating any pending decode.
    pub fn start_over(&mut self) {
        self.errors = FieldErrors::default();
        self.withdraw();
    }

    fn withdraw(&mut self) {
        self.ticket = None;
        self.latest = None;
        self.stage = self.stage.transition(StageEvent::Revert);
    }
}
