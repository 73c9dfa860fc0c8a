// This is free and unencumbered software released into the public domain.

use crate::shared::{CameraError, CameraResult};
use derive_more::Display;
use ndk_sys::camera_status_t;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[display("camera status {}", _0.0)]
pub struct CameraStatus(pub(crate) camera_status_t);

impl core::error::Error for CameraStatus {}

impl Default for CameraStatus {
    fn default() -> Self {
        CameraStatus(camera_status_t::ACAMERA_OK)
    }
}

impl From<camera_status_t> for CameraStatus {
    fn from(input: camera_status_t) -> Self {
        Self(input)
    }
}

impl CameraStatus {
    /// Maps a non-OK status to a driver error naming the failed call.
    pub fn check(status: camera_status_t, context: &'static str) -> CameraResult {
        if status == camera_status_t::ACAMERA_OK {
            return Ok(());
        }
        Err(CameraError::driver(context, CameraStatus(status)))
    }
}
