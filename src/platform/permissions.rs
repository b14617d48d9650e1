use super::{PermissionResponse, PermissionService};
use async_trait::async_trait;

/// Answers permission requests from configuration instead of a system dialog
#[derive(Debug, Clone, Copy)]
pub struct PolicyPermissions {
    pub location: bool,
    pub media_library: bool,
}

impl PolicyPermissions {
    pub fn new(location: bool, media_library: bool) -> Self {
        Self {
            location,
            media_library,
        }
    }

    pub fn allow_all() -> Self {
        Self::new(true, true)
    }
}

impl Default for PolicyPermissions {
    fn default() -> Self {
        Self::allow_all()
    }
}

fn respond(kind: &str, granted: bool) -> PermissionResponse {
    if granted {
        log::debug!("[permissions] {} granted", kind);
        PermissionResponse::granted()
    } else {
        log::warn!("[permissions] {} denied by policy", kind);
        PermissionResponse::denied()
    }
}

#[async_trait]
impl PermissionService for PolicyPermissions {
    async fn request_foreground_location(&self) -> PermissionResponse {
        respond("foreground location", self.location)
    }

    async fn request_media_library(&self) -> PermissionResponse {
        respond("media library", self.media_library)
    }
}
