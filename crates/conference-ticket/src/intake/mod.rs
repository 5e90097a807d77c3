//! Ticket intake: the form controller and the pieces it composes.
//!
//! Validation and serial generation are pure. The preview manager owns the single avatar
//! preview slot, the submission handler owns the collecting/issued lifecycle, and the avatar
//! decode is the one asynchronous step, delivered back to the controller as a tagged completion.

pub mod controller;
pub mod decode;
pub mod domain;
pub mod preview;
pub mod roster;
pub mod serial;
pub mod submission;
pub mod validation;

#[cfg(test)]
mod tests;

pub use controller::{FormController, FormView};
pub use decode::{
    AvatarDecoder, DataUriDecoder, DecodeCompletion, DecodeDispatcher, DecodeError, PendingDecode,
};
pub use domain::{
    Applicant, AvatarFile, FieldErrors, FormField, FormInput, GithubHandle, SubmissionId, Ticket,
    TicketAvatar, TicketView, ValidationResult,
};
pub use preview::{
    DropZoneAction, DropZoneEvent, DropZoneKey, DropZoneView, ObjectUrl, ObjectUrlRegistry,
    PreviewManager, PreviewState, UploadHint,
};
pub use roster::{RosterEntry, RosterError, RosterImporter};
pub use serial::{make_serial, SerialCode};
pub use submission::{DecodeApplied, FormStage, StageEvent, SubmissionHandler, SubmitOutcome};
pub use validation::{
    validate_avatar, validate_email, validate_name, AvatarPolicy, AvatarRejection,
};
