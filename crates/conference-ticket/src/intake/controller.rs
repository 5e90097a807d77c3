use serde::Serialize;

use crate::config::IntakeConfig;

use super::decode::DecodeCompletion;
use super::domain::{AvatarFile, FieldErrors, FormInput, Ticket, TicketView};
use super::preview::{DropZoneAction, DropZoneEvent, DropZoneView, ObjectUrlRegistry, PreviewManager};
use super::submission::{DecodeApplied, FormStage, SubmissionHandler, SubmitOutcome};
use super::validation::{AvatarPolicy, AvatarRejection};

/// Everything the renderer needs to paint the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub stage: FormStage,
    pub form_visible: bool,
    pub ticket_visible: bool,
    pub errors: FieldErrors,
    pub drop_zone: DropZoneView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<TicketView>,
}

/// Single owner of the form's behavior: the preview slot plus the submission lifecycle.
///
/// Host events come in through the methods below; the host reads [`FormView`] back and runs
/// each `PendingDecode` it is handed, feeding the completion to
/// [`complete_decode`](Self::complete_decode).
pub struct FormController<U: ObjectUrlRegistry> {
    preview: PreviewManager<U>,
    submissions: SubmissionHandler,
}

impl<U: ObjectUrlRegistry> FormController<U> {
    pub fn new(registry: U, policy: AvatarPolicy) -> Self {
        Self {
            preview: PreviewManager::new(registry, policy),
            submissions: SubmissionHandler::new(),
        }
    }

    pub fn from_config(registry: U, config: &IntakeConfig) -> Self {
        Self::new(registry, AvatarPolicy::new(config.avatar_max_bytes))
    }

    pub fn drop_zone(&mut self, event: DropZoneEvent) -> DropZoneAction {
        self.preview.handle_event(event)
    }

    pub fn picker_changed(&mut self, file: Option<AvatarFile>) {
        self.preview.picker_changed(file);
    }

    pub fn select_file(&mut self, file: AvatarFile) -> Result<(), AvatarRejection> {
        self.preview.select_file(file)
    }

    pub fn remove_image(&mut self) {
        self.preview.clear();
    }

    pub fn submit(&mut self, input: &FormInput) -> SubmitOutcome {
        self.submissions.submit(input, &mut self.preview)
    }

    pub fn complete_decode(&mut self, completion: DecodeCompletion) -> DecodeApplied {
        self.submissions
            .complete_decode(completion, &mut self.preview)
    }

    pub fn start_over(&mut self) {
        self.submissions.start_over();
    }

    pub fn stage(&self) -> FormStage {
        self.submissions.stage()
    }

    pub fn ticket(&self) -> Option<&Ticket> {
        self.submissions.ticket()
    }

    pub fn preview(&self) -> &PreviewManager<U> {
        &self.preview
    }

    pub fn view(&self) -> FormView {
        let stage = self.submissions.stage();
        FormView {
            stage,
            form_visible: stage.form_visible(),
            ticket_visible: stage.ticket_visible(),
            errors: self.submissions.errors().clone(),
            drop_zone: self.preview.view(),
            ticket: self.submissions.ticket().map(Ticket::view),
        }
    }

    /// Release the preview handle ahead of dropping the controller.
    pub fn teardown(&mut self) {
        self.preview.teardown();
    }
}
