// This is free and unencumbered software released into the public domain.

use super::CameraStatus;
use crate::shared::{CameraResult, DeviceEvent, DeviceSink};
use alloc::{boxed::Box, ffi::CString};
use core::{
    ffi::{c_int, c_void},
    ptr::null_mut,
};
use ndk_sys::{ACameraDevice, ACameraDevice_StateCallbacks, ACameraDevice_close};
use tracing::warn;

/// An open camera device. Closed on drop if not closed explicitly.
pub struct CameraDevice {
    pub(crate) handle: *mut ACameraDevice,
    pub(crate) id: CString,
    pub(crate) state_callbacks: Box<ACameraDevice_StateCallbacks>,
    // Boxed so the callback context stays put while the device moves.
    sink: Box<DeviceSink>,
}

unsafe impl Send for CameraDevice {}

impl core::fmt::Debug for CameraDevice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CameraDevice")
            .field("handle", &self.handle)
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for CameraDevice {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(%err, "failed to close camera device");
        }
    }
}

unsafe extern "C" fn on_disconnected(context: *mut c_void, _device: *mut ACameraDevice) {
    let sink = unsafe { &*(context as *const DeviceSink) };
    sink(DeviceEvent::Disconnected);
}

unsafe extern "C" fn on_error(context: *mut c_void, _device: *mut ACameraDevice, error: c_int) {
    let sink = unsafe { &*(context as *const DeviceSink) };
    sink(DeviceEvent::Error(error));
}

impl CameraDevice {
    /// Prepares an unopened device whose callbacks report to `sink`.
    pub(crate) fn new(id: CString, sink: DeviceSink) -> Self {
        let sink = Box::new(sink);
        let context = (&*sink as *const DeviceSink) as *mut c_void;
        Self {
            handle: null_mut(),
            id,
            state_callbacks: Box::new(ACameraDevice_StateCallbacks {
                context,
                onDisconnected: Some(on_disconnected),
                onError: Some(on_error),
            }),
            sink,
        }
    }

    /// Tells the owner the platform has handed out a usable device.
    pub(crate) fn notify_opened(&self) {
        (self.sink)(DeviceEvent::Opened);
    }

    pub fn id(&self) -> &str {
        self.id.to_str().unwrap_or_default()
    }

    /// See: https://developer.android.com/ndk/reference/group/camera#acameradevice_close
    pub fn close(&mut self) -> CameraResult {
        if self.handle.is_null() {
            return Ok(());
        }
        let status = unsafe { ACameraDevice_close(self.handle) };
        self.handle = null_mut();
        CameraStatus::check(status, "closing camera device")
    }
}
