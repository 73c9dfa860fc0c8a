// This is free and unencumbered software released into the public domain.

use super::{CameraError, CameraResult, DeviceEvent};
use core::time::Duration;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceState {
    Opening,
    Opened,
    Disconnected,
    Failed(i32),
}

/// Tracks the device state reported by platform callbacks.
///
/// Written from platform threads, read by the control thread while a
/// pipeline starts and afterwards for diagnostics.
#[derive(Debug)]
pub struct DeviceMonitor {
    state: Mutex<DeviceState>,
    changed: Condvar,
}

impl Default for DeviceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceMonitor {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DeviceState::Opening),
            changed: Condvar::new(),
        }
    }

    pub fn state(&self) -> DeviceState {
        *self.lock()
    }

    pub fn record(&self, event: DeviceEvent) {
        let mut state = self.lock();
        *state = match (*state, event) {
            (DeviceState::Opening, DeviceEvent::Opened) => DeviceState::Opened,
            // a late open confirmation never revives a lost device
            (current, DeviceEvent::Opened) => current,
            (_, DeviceEvent::Disconnected) => DeviceState::Disconnected,
            (_, DeviceEvent::Error(code)) => DeviceState::Failed(code),
        };
        self.changed.notify_all();
    }

    /// Blocks until the device leaves [`DeviceState::Opening`], then reports
    /// whether it is usable.
    pub fn wait_opened(&self, camera_id: &str, timeout: Option<Duration>) -> CameraResult {
        let guard = self.lock();
        let still_opening = |state: &mut DeviceState| *state == DeviceState::Opening;

        let state = match timeout {
            None => *self
                .changed
                .wait_while(guard, still_opening)
                .unwrap_or_else(PoisonError::into_inner),
            Some(timeout) => {
                let (guard, _) = self
                    .changed
                    .wait_timeout_while(guard, timeout, still_opening)
                    .unwrap_or_else(PoisonError::into_inner);
                if *guard == DeviceState::Opening {
                    return Err(CameraError::OpenTimedOut {
                        camera_id: camera_id.into(),
                    });
                }
                *guard
            },
        };

        usable(state, camera_id)
    }

    pub fn ensure_usable(&self, camera_id: &str) -> CameraResult {
        usable(self.state(), camera_id)
    }

    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn usable(state: DeviceState, camera_id: &str) -> CameraResult {
    match state {
        DeviceState::Opened => Ok(()),
        DeviceState::Opening => Err(CameraError::other(format!(
            "camera {camera_id} is not open yet"
        ))),
        DeviceState::Disconnected => Err(CameraError::DeviceDisconnected {
            camera_id: camera_id.into(),
        }),
        DeviceState::Failed(code) => Err(CameraError::DeviceFailed {
            camera_id: camera_id.into(),
            code,
        }),
    }
}
