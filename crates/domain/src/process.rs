use crate::profile::LayeredProfile;
use std::sync::Arc;

/// Originating local process of a connection. Read-only for the decision
/// core; identification itself happens in the process subsystem.
///
/// A negative PID marks a synthetic or unknown process.
#[derive(Debug)]
pub struct ProcessInfo {
    pub pid: i32,
    pub path: String,
    pub name: String,
    pub exec_name: String,
    pub is_system_resolver: bool,
    profile: Option<Arc<LayeredProfile>>,
}

impl ProcessInfo {
    pub fn new(pid: i32, path: impl Into<String>) -> Self {
        let path = path.into();
        let exec_name = path.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            pid,
            name: exec_name.clone(),
            exec_name,
            path,
            is_system_resolver: false,
            profile: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn as_system_resolver(mut self) -> Self {
        self.is_system_resolver = true;
        self
    }

    pub fn with_profile(mut self, profile: Arc<LayeredProfile>) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn profile(&self) -> Option<&Arc<LayeredProfile>> {
        self.profile.as_ref()
    }

    pub fn is_known(&self) -> bool {
        self.pid >= 0
    }
}
