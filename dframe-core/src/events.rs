use crate::error::FrameworkError;
use std::sync::Arc;

/// Framework-wide, non-fatal notifications (component load failures, registration failures).
#[derive(Debug, Clone)]
pub enum FrameworkEvent {
    Error(Arc<FrameworkError>),
}

impl FrameworkEvent {
    pub fn error(err: FrameworkError) -> Self {
        FrameworkEvent::Error(Arc::new(err))
    }
}
