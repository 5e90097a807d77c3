use std::collections::BTreeSet;
use std::path::Path;

use conference_ticket::intake::{AvatarFile, ObjectUrl, ObjectUrlRegistry};
use tracing::debug;

/// Object URLs for a headless host: opaque `blob:` names tracked until revoked.
#[derive(Debug, Default)]
pub(crate) struct LocalObjectUrls {
    next: u64,
    live: BTreeSet<ObjectUrl>,
}

impl LocalObjectUrls {
    pub(crate) fn live(&self) -> usize {
        self.live.len()
    }
}

impl ObjectUrlRegistry for LocalObjectUrls {
    fn create(&mut self, file: &AvatarFile) -> ObjectUrl {
        self.next += 1;
        let url = ObjectUrl(format!("blob:conference-ticket/{:04}", self.next));
        debug!(%url, file = %file.name, "object url created");
        self.live.insert(url.clone());
        url
    }

    fn revoke(&mut self, url: ObjectUrl) {
        if self.live.remove(&url) {
            debug!(%url, "object url revoked");
        }
    }
}

/// Read an avatar from disk, declaring its type from the extension the way a browser does.
pub(crate) fn load_avatar(path: &Path) -> std::io::Result<AvatarFile> {
    let bytes = std::fs::read(path)?;
    let declared_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_default();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(AvatarFile::new(name, declared_type, bytes))
}
