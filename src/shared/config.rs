// This is free and unencumbered software released into the public domain.

use core::time::Duration;

/// What `start` does when its slot already holds a running pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Fail with [`CameraError::AlreadyRunning`](super::CameraError::AlreadyRunning)
    /// and leave the running pipeline untouched.
    #[default]
    Reject,
    /// Stop the running pipeline, then start the new one. An error while
    /// stopping the old pipeline is logged and does not fail the start.
    Restart,
}

#[derive(Clone, Debug)]
pub struct ManagerConfig {
    pub restart: RestartPolicy,
    /// Upper bound on waiting for the platform to confirm a device open.
    /// `None` waits for as long as it takes.
    pub open_timeout: Option<Duration>,
    pub event_capacity: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            restart: RestartPolicy::Reject,
            open_timeout: None,
            event_capacity: 64,
        }
    }
}

impl ManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_restart_policy(mut self, policy: RestartPolicy) -> Self {
        self.restart = policy;
        self
    }

    pub fn with_open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = Some(timeout);
        self
    }

    pub fn with_event_capacity(mut self, n: usize) -> Self {
        self.event_capacity = n.max(1);
        self
    }
}
