use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::domain::{AvatarFile, FormField, ValidationResult};
use super::validation::{AvatarPolicy, AvatarRejection};

/// Displayable reference to file bytes, e.g. a `blob:` URL. Must be revoked once replaced.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ObjectUrl(pub String);

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host primitive that mints and revokes object URLs.
pub trait ObjectUrlRegistry {
    fn create(&mut self, file: &AvatarFile) -> ObjectUrl;
    fn revoke(&mut self, url: ObjectUrl);
}

/// The live preview held by the drop zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewState {
    pub object_url: ObjectUrl,
    pub file_name: String,
}

/// Text under the drop zone; in error state it carries the avatar validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadHint {
    pub text: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZoneKey {
    Enter,
    Space,
    Other,
}

/// Interactions the host forwards from the drop zone and its action buttons.
#[derive(Debug, Clone)]
pub enum DropZoneEvent {
    DragEnter,
    DragOver,
    DragLeave,
    Drop(Option<AvatarFile>),
    Click,
    KeyDown(DropZoneKey),
    ChangeImage,
    RemoveImage,
}

/// Follow-up the host must perform after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZoneAction {
    None,
    OpenPicker,
}

/// Presentation flags for the drop zone, read by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropZoneView {
    pub dragover: bool,
    pub has_image: bool,
    pub icon_visible: bool,
    pub instructions_visible: bool,
    pub thumbnail: Option<ObjectUrl>,
    pub actions_visible: bool,
    pub hint: UploadHint,
}

/// Owner of the single avatar preview slot and the form's avatar input.
///
/// At most one object URL is live at a time: the previous one is revoked before a new one is
/// minted, on [`clear`](Self::clear), and on teardown.
pub struct PreviewManager<U: ObjectUrlRegistry> {
    registry: U,
    policy: AvatarPolicy,
    input: Option<AvatarFile>,
    preview: Option<PreviewState>,
    hint: UploadHint,
    dragover: bool,
}

impl<U: ObjectUrlRegistry> PreviewManager<U> {
    pub fn new(registry: U, policy: AvatarPolicy) -> Self {
        let hint = UploadHint {
            text: policy.default_hint(),
            is_error: false,
        };
        Self {
            registry,
            policy,
            input: None,
            preview: None,
            hint,
            dragover: false,
        }
    }

    pub fn policy(&self) -> &AvatarPolicy {
        &self.policy
    }

    pub fn registry(&self) -> &U {
        &self.registry
    }

    /// File currently attached to the avatar input, valid or not.
    pub fn selected(&self) -> Option<&AvatarFile> {
        self.input.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewState> {
        self.preview.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.preview.is_some()
    }

    pub fn hint(&self) -> &UploadHint {
        &self.hint
    }

    pub fn handle_event(&mut self, event: DropZoneEvent) -> DropZoneAction {
        match event {
            DropZoneEvent::DragEnter | DropZoneEvent::DragOver => {
                self.dragover = true;
                DropZoneAction::None
            }
            DropZoneEvent::DragLeave => {
                self.dragover = false;
                DropZoneAction::None
            }
            DropZoneEvent::Drop(file) => {
                self.dragover = false;
                if let Some(file) = file {
                    // The outcome is already reflected on the hint.
                    let _ = self.select_file(file);
                }
                DropZoneAction::None
            }
            DropZoneEvent::Click
            | DropZoneEvent::KeyDown(DropZoneKey::Enter | DropZoneKey::Space)
            | DropZoneEvent::ChangeImage => DropZoneAction::OpenPicker,
            DropZoneEvent::KeyDown(DropZoneKey::Other) => DropZoneAction::None,
            DropZoneEvent::RemoveImage => {
                self.clear();
                DropZoneAction::None
            }
        }
    }

    /// Native picker `change` handler; an empty selection is ignored.
    pub fn picker_changed(&mut self, file: Option<AvatarFile>) {
        if let Some(file) = file {
            let _ = self.select_file(file);
        }
    }

    /// Attach `file` to the avatar input and preview it if it passes validation.
    ///
    /// A rejected file stays attached (submission re-validates it) but the existing preview is
    /// left untouched.
    pub fn select_file(&mut self, file: AvatarFile) -> Result<(), AvatarRejection> {
        self.input = Some(file);
        let result = self.policy.check(self.input.as_ref());
        self.report(&result);

        if result.is_ok() {
            self.release();
            if let Some(file) = &self.input {
                let object_url = self.registry.create(file);
                debug!(file = %file.name, url = %object_url, "avatar preview activated");
                self.preview = Some(PreviewState {
                    object_url,
                    file_name: file.name.clone(),
                });
            }
        }

        result
    }

    /// Re-run the avatar check on the attached file, updating the hint.
    pub fn validate_selected(&mut self) -> ValidationResult {
        let result = self.policy.check(self.input.as_ref());
        self.report(&result);
        match result {
            Ok(()) => ValidationResult::passed(FormField::Avatar),
            Err(rejection) => {
                ValidationResult::failed(FormField::Avatar, self.policy.message(&rejection))
            }
        }
    }

    /// Put the hint into error state with `message`.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.hint = UploadHint {
            text: message.into(),
            is_error: true,
        };
    }

    /// Drop the preview and the attached file, restoring the empty drop zone.
    pub fn clear(&mut self) {
        self.release();
        self.input = None;
        self.reset_hint();
    }

    /// Release the held object URL. Called automatically on drop.
    pub fn teardown(&mut self) {
        self.release();
    }

    pub fn view(&self) -> DropZoneView {
        let has_image = self.preview.is_some();
        DropZoneView {
            dragover: self.dragover,
            has_image,
            icon_visible: !has_image,
            instructions_visible: !has_image,
            thumbnail: self.preview.as_ref().map(|state| state.object_url.clone()),
            actions_visible: has_image,
            hint: self.hint.clone(),
        }
    }

    fn release(&mut self) {
        if let Some(state) = self.preview.take() {
            debug!(url = %state.object_url, "avatar preview released");
            self.registry.revoke(state.object_url);
        }
    }

    fn report(&mut self, result: &Result<(), AvatarRejection>) {
        match result {
            Ok(()) => self.reset_hint(),
            Err(rejection) => {
                debug!(%rejection, "avatar rejected");
                let message = self.policy.message(rejection);
                self.show_error(message);
            }
        }
    }

    fn reset_hint(&mut self) {
        self.hint = UploadHint {
            text: self.policy.default_hint(),
            is_error: false,
        };
    }
}

impl<U: ObjectUrlRegistry> Drop for PreviewManager<U> {
    fn drop(&mut self) {
        self.teardown();
    }
}
