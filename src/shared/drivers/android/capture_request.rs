// This is free and unencumbered software released into the public domain.

use super::{CameraDevice, CameraOutputTarget, CameraStatus};
use crate::shared::{CameraResult, RequestTemplate};
use core::ptr::null_mut;
use ndk_sys::{
    ACameraDevice_createCaptureRequest, ACameraDevice_request_template, ACaptureRequest,
    ACaptureRequest_addTarget, ACaptureRequest_free,
};

#[derive(Debug)]
pub struct CaptureRequest {
    pub(crate) handle: *mut ACaptureRequest,
}

unsafe impl Send for CaptureRequest {}

impl Drop for CaptureRequest {
    fn drop(&mut self) {
        if self.handle.is_null() {
            return;
        }
        unsafe { ACaptureRequest_free(self.handle) }
        self.handle = null_mut();
    }
}

impl CaptureRequest {
    pub fn new(device: &CameraDevice, template: RequestTemplate) -> CameraResult<Self> {
        let template = match template {
            RequestTemplate::Preview => ACameraDevice_request_template::TEMPLATE_PREVIEW,
            RequestTemplate::StillCapture => ACameraDevice_request_template::TEMPLATE_STILL_CAPTURE,
        };

        let mut result = Self { handle: null_mut() };
        let status = unsafe {
            ACameraDevice_createCaptureRequest(device.handle, template, &mut result.handle)
        };
        CameraStatus::check(status, "creating capture request")?;
        Ok(result)
    }

    pub fn add_target(&mut self, target: &CameraOutputTarget) -> CameraResult {
        let status = unsafe { ACaptureRequest_addTarget(self.handle, target.handle) };
        CameraStatus::check(status, "adding output target")
    }
}
