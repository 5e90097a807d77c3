use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use crate::intake::domain::{AvatarFile, FormInput};
use crate::intake::preview::{ObjectUrl, ObjectUrlRegistry, PreviewManager};
use crate::intake::validation::AvatarPolicy;
use crate::intake::FormController;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub(super) fn png(name: &str, size: usize) -> AvatarFile {
    let mut bytes = vec![0u8; size];
    bytes[..PNG_SIGNATURE.len()].copy_from_slice(&PNG_SIGNATURE);
    AvatarFile::new(name, "image/png", bytes)
}

pub(super) fn jpeg(name: &str, size: usize) -> AvatarFile {
    let mut bytes = vec![0u8; size];
    bytes[..3].copy_from_slice(&[0xFF, 0xD8, 0xFF]);
    AvatarFile::new(name, "image/jpeg", bytes)
}

pub(super) fn gif(name: &str) -> AvatarFile {
    AvatarFile::new(name, "image/gif", b"GIF89a".to_vec())
}

pub(super) fn grace() -> FormInput {
    FormInput {
        full_name: "Grace Hopper".to_string(),
        email: "grace@navy.mil".to_string(),
        github: "@gracehopper".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum UrlEvent {
    Created(ObjectUrl),
    Revoked(ObjectUrl),
}

#[derive(Debug, Default)]
pub(super) struct UrlLog {
    next: u32,
    live: BTreeSet<ObjectUrl>,
    peak_live: usize,
    events: Vec<UrlEvent>,
}

/// Object URL registry that records every create/revoke and the peak number of live URLs.
#[derive(Debug, Default, Clone)]
pub(super) struct RecordingUrls {
    log: Arc<Mutex<UrlLog>>,
}

impl RecordingUrls {
    pub(super) fn live(&self) -> Vec<ObjectUrl> {
        let log = self.log.lock().expect("url log poisoned");
        log.live.iter().cloned().collect()
    }

    pub(super) fn peak_live(&self) -> usize {
        self.log.lock().expect("url log poisoned").peak_live
    }

    pub(super) fn events(&self) -> Vec<UrlEvent> {
        self.log.lock().expect("url log poisoned").events.clone()
    }
}

impl ObjectUrlRegistry for RecordingUrls {
    fn create(&mut self, file: &AvatarFile) -> ObjectUrl {
        let mut log = self.log.lock().expect("url log poisoned");
        log.next += 1;
        let url = ObjectUrl(format!("blob:test/{}/{}", log.next, file.name));
        log.live.insert(url.clone());
        log.peak_live = log.peak_live.max(log.live.len());
        log.events.push(UrlEvent::Created(url.clone()));
        url
    }

    fn revoke(&mut self, url: ObjectUrl) {
        let mut log = self.log.lock().expect("url log poisoned");
        assert!(log.live.remove(&url), "revoked unknown url {url}");
        log.events.push(UrlEvent::Revoked(url));
    }
}

pub(super) fn preview_manager() -> (PreviewManager<RecordingUrls>, RecordingUrls) {
    let urls = RecordingUrls::default();
    (PreviewManager::new(urls.clone(), AvatarPolicy::default()), urls)
}

pub(super) fn controller() -> (FormController<RecordingUrls>, RecordingUrls) {
    let urls = RecordingUrls::default();
    (FormController::new(urls.clone(), AvatarPolicy::default()), urls)
}
