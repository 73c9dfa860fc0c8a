// This is free and unencumbered software released into the public domain.

use super::{CameraDevice, CameraStatus, CaptureRequest, CaptureSessionOutputContainer};
use crate::shared::{CameraResult, SessionEvent, SessionSink};
use alloc::boxed::Box;
use core::{ffi::c_void, ptr::null_mut};
use ndk_sys::{
    ACameraCaptureSession, ACameraCaptureSession_close,
    ACameraCaptureSession_setRepeatingRequest, ACameraCaptureSession_stateCallbacks,
    ACameraCaptureSession_stopRepeating, ACameraDevice_createCaptureSession,
};
use tracing::{debug, warn};

/// A capture session. Dropping it stops any repeating request and closes
/// the session.
///
/// The callback context is released by `on_closed`, the last callback the
/// platform delivers for a session.
#[derive(Debug)]
pub struct CameraCaptureSession {
    handle: *mut ACameraCaptureSession,
    state_callbacks: ACameraCaptureSession_stateCallbacks,
}

unsafe impl Send for CameraCaptureSession {}

impl Drop for CameraCaptureSession {
    fn drop(&mut self) {
        self.close()
    }
}

unsafe extern "C" fn on_ready(context: *mut c_void, _session: *mut ACameraCaptureSession) {
    let sink = unsafe { &*(context as *const SessionSink) };
    sink(SessionEvent::Ready);
}

unsafe extern "C" fn on_active(context: *mut c_void, _session: *mut ACameraCaptureSession) {
    let sink = unsafe { &*(context as *const SessionSink) };
    sink(SessionEvent::Active);
}

unsafe extern "C" fn on_closed(context: *mut c_void, _session: *mut ACameraCaptureSession) {
    let sink = unsafe { Box::from_raw(context as *mut SessionSink) };
    sink(SessionEvent::Closed);
}

impl CameraCaptureSession {
    pub fn open(
        device: &CameraDevice,
        outputs: &CaptureSessionOutputContainer,
        sink: SessionSink,
    ) -> CameraResult<Self> {
        let context = Box::into_raw(Box::new(sink)) as *mut c_void;
        let mut result = Self {
            handle: null_mut(),
            state_callbacks: ACameraCaptureSession_stateCallbacks {
                context,
                onClosed: Some(on_closed),
                onReady: Some(on_ready),
                onActive: Some(on_active),
            },
        };

        let status = unsafe {
            ACameraDevice_createCaptureSession(
                device.handle,
                outputs.handle,
                &result.state_callbacks,
                &mut result.handle,
            )
        };
        debug!(?status, "ACameraDevice_createCaptureSession");
        if let Err(err) = CameraStatus::check(status, "creating capture session") {
            // no session, so no on_closed to free the context
            drop(unsafe { Box::from_raw(context as *mut SessionSink) });
            result.handle = null_mut();
            return Err(err);
        }

        Ok(result)
    }

    /// See: https://developer.android.com/ndk/reference/group/camera#acameracapturesession_setrepeatingrequest
    pub fn set_repeating_request(&mut self, request: &CaptureRequest) -> CameraResult {
        let mut requests = request.handle;
        let status = unsafe {
            ACameraCaptureSession_setRepeatingRequest(
                self.handle,
                null_mut(),
                1,
                &mut requests,
                null_mut(),
            )
        };
        debug!(?status, "ACameraCaptureSession_setRepeatingRequest");
        CameraStatus::check(status, "setting repeating request")
    }

    /// See: https://developer.android.com/ndk/reference/group/camera#acameracapturesession_stoprepeating
    pub fn stop_repeating(&mut self) -> CameraResult {
        let status = unsafe { ACameraCaptureSession_stopRepeating(self.handle) };
        CameraStatus::check(status, "stopping repeating request")
    }

    pub fn close(&mut self) {
        if self.handle.is_null() {
            return;
        }
        if let Err(err) = self.stop_repeating() {
            warn!(%err, "failed to stop repeating request");
        }
        unsafe { ACameraCaptureSession_close(self.handle) }
        self.handle = null_mut();
    }
}
