use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::domain::{AvatarFile, SubmissionId};

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Failure to turn avatar bytes into an embeddable image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("avatar file '{name}' is empty")]
    Empty { name: String },
    #[error("avatar file '{name}' is not a readable {declared} image")]
    Unreadable { name: String, declared: String },
    #[error("decode task for {submission} did not complete")]
    Interrupted { submission: SubmissionId },
}

/// Converts avatar bytes into a `data:` URI the ticket can embed.
pub trait AvatarDecoder: Send + Sync {
    fn decode(&self, file: &AvatarFile) -> Result<String, DecodeError>;
}

/// Base64 `data:` URI encoder that refuses bytes which are neither PNG nor JPEG.
///
/// The URI carries the declared type even when the bytes are the other accepted format, so a
/// JPEG saved as `photo.png` still renders.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriDecoder;

impl AvatarDecoder for DataUriDecoder {
    fn decode(&self, file: &AvatarFile) -> Result<String, DecodeError> {
        let bytes = file.bytes();
        if bytes.is_empty() {
            return Err(DecodeError::Empty {
                name: file.name.clone(),
            });
        }

        match sniff(bytes) {
            Some(actual) if actual.essence_str() != file.declared_type => {
                debug!(
                    name = %file.name,
                    declared = %file.declared_type,
                    %actual,
                    "avatar bytes do not match the declared type"
                );
            }
            Some(_) => {}
            None => {
                return Err(DecodeError::Unreadable {
                    name: file.name.clone(),
                    declared: file.declared_type.clone(),
                });
            }
        }

        Ok(format!(
            "data:{};base64,{}",
            file.declared_type,
            STANDARD.encode(bytes)
        ))
    }
}

fn sniff(bytes: &[u8]) -> Option<mime::Mime> {
    if bytes.starts_with(PNG_SIGNATURE) {
        Some(mime::IMAGE_PNG)
    } else if bytes.starts_with(JPEG_SIGNATURE) {
        Some(mime::IMAGE_JPEG)
    } else {
        None
    }
}

/// Decode requested by an accepted submission, tagged with that submission's id.
#[derive(Debug, Clone)]
pub struct PendingDecode {
    pub submission: SubmissionId,
    pub file: AvatarFile,
}

impl PendingDecode {
    /// Run the decode inline on the current thread.
    pub fn run<D: AvatarDecoder + ?Sized>(self, decoder: &D) -> DecodeCompletion {
        DecodeCompletion {
            submission: self.submission,
            result: decoder.decode(&self.file),
        }
    }
}

/// Result of a decode, delivered back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeCompletion {
    pub submission: SubmissionId,
    pub result: Result<String, DecodeError>,
}

/// Runs decodes on tokio's blocking pool and funnels completions into a single channel.
///
/// Completions arrive in whatever order the decodes finish; the controller discards stale ones.
#[derive(Clone)]
pub struct DecodeDispatcher {
    decoder: Arc<dyn AvatarDecoder>,
    completions: mpsc::UnboundedSender<DecodeCompletion>,
}

impl DecodeDispatcher {
    pub fn channel(
        decoder: Arc<dyn AvatarDecoder>,
    ) -> (Self, mpsc::UnboundedReceiver<DecodeCompletion>) {
        let (completions, receiver) = mpsc::unbounded_channel();
        (
            Self {
                decoder,
                completions,
            },
            receiver,
        )
    }

    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, pending: PendingDecode) {
        let decoder = Arc::clone(&self.decoder);
        let completions = self.completions.clone();
        let submission = pending.submission;

        tokio::spawn(async move {
            let completion =
                match tokio::task::spawn_blocking(move || pending.run(decoder.as_ref())).await {
                    Ok(completion) => completion,
                    Err(err) => {
                        warn!(%submission, error = %err, "avatar decode task failed");
                        DecodeCompletion {
                            submission,
                            result: Err(DecodeError::Interrupted { submission }),
                        }
                    }
                };

            if completions.send(completion).is_err() {
                debug!(%submission, "decode completion dropped; controller is gone");
            }
        });
    }
}
