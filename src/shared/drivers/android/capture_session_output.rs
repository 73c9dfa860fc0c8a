// This is free and unencumbered software released into the public domain.

use super::{CameraStatus, NativeWindow};
use crate::shared::CameraResult;
use core::ptr::null_mut;
use ndk_sys::{ACaptureSessionOutput, ACaptureSessionOutput_create, ACaptureSessionOutput_free};

#[derive(Debug)]
pub struct CaptureSessionOutput {
    pub(crate) handle: *mut ACaptureSessionOutput,
}

unsafe impl Send for CaptureSessionOutput {}

impl Drop for CaptureSessionOutput {
    fn drop(&mut self) {
        if self.handle.is_null() {
            return;
        }
        unsafe { ACaptureSessionOutput_free(self.handle) };
        self.handle = null_mut();
    }
}

impl CaptureSessionOutput {
    pub fn new(window: &NativeWindow) -> CameraResult<Self> {
        // See: https://developer.android.com/ndk/reference/group/camera#acapturesessionoutput_create
        let mut result = Self { handle: null_mut() };
        let status = unsafe { ACaptureSessionOutput_create(window.handle, &mut result.handle) };
        CameraStatus::check(status, "creating session output")?;
        Ok(result)
    }
}
