// This is free and unencumbered software released into the public domain.

//! Camera platform backed by the NDK `libcamera2ndk` API.

use crate::shared::{CameraError, CameraPlatform, CameraResult, RequestTemplate, SessionSink};
use alloc::borrow::Cow;
use ndk_sys::android_get_device_api_level;
use tracing::debug;

mod camera_capture_session;
pub use camera_capture_session::*;

mod camera_device;
pub use camera_device::*;

mod camera_manager;
pub use camera_manager::*;

mod camera_output_target;
pub use camera_output_target::*;

mod camera_status;
pub use camera_status::*;

mod capture_request;
pub use capture_request::*;

mod capture_session_output;
pub use capture_session_output::*;

mod capture_session_output_container;
pub use capture_session_output_container::*;

#[cfg(feature = "jni")]
pub mod logcat;

mod native_window;
pub use native_window::*;

#[link(name = "camera2ndk")]
unsafe extern "C" {}

#[link(name = "android")]
unsafe extern "C" {}

/// First API level shipping the NDK camera API.
pub const MIN_API_LEVEL: u32 = 24;

#[derive(Clone, Debug)]
pub struct NdkCameraPlatform {
    pub api_level: u32,
}

impl NdkCameraPlatform {
    pub fn new() -> CameraResult<Self> {
        let raw = unsafe { android_get_device_api_level() };
        debug!(api_level = raw, "android_get_device_api_level");
        let api_level = supported_api_level(raw)?;
        Ok(Self { api_level })
    }
}

/// Checks the value reported by `android_get_device_api_level`, which is
/// `-1` when the level cannot be determined.
fn supported_api_level(raw: i32) -> CameraResult<u32> {
    let api_level = u32::try_from(raw).map_err(|_| {
        CameraError::unsupported(format!("device API level is unknown ({raw})"))
    })?;
    if api_level < MIN_API_LEVEL {
        return Err(CameraError::unsupported(format!(
            "camera2 NDK needs API level {MIN_API_LEVEL}, device has {api_level}"
        )));
    }
    Ok(api_level)
}

impl dogma::Named for NdkCameraPlatform {
    fn name(&self) -> Cow<'_, str> {
        "camera2".into()
    }
}

impl CameraPlatform for NdkCameraPlatform {
    type Window = NativeWindow;
    type Device = CameraDevice;
    type Manager = CameraManager;
    type SessionOutput = CaptureSessionOutput;
    type OutputContainer = CaptureSessionOutputContainer;
    type OutputTarget = CameraOutputTarget;
    type Request = CaptureRequest;
    type Session = CameraCaptureSession;

    fn camera_manager(&self) -> CameraResult<CameraManager> {
        CameraManager::new()
    }

    fn close_camera(&self, mut device: CameraDevice) -> CameraResult {
        device.close()
    }

    fn create_session_output(&self, window: &NativeWindow) -> CameraResult<CaptureSessionOutput> {
        CaptureSessionOutput::new(window)
    }

    fn create_output_container(&self) -> CameraResult<CaptureSessionOutputContainer> {
        CaptureSessionOutputContainer::new()
    }

    fn add_session_output(
        &self,
        container: &mut CaptureSessionOutputContainer,
        output: &CaptureSessionOutput,
    ) -> CameraResult {
        container.add(output)
    }

    fn create_output_target(&self, window: &NativeWindow) -> CameraResult<CameraOutputTarget> {
        CameraOutputTarget::new(window)
    }

    fn create_capture_request(
        &self,
        device: &CameraDevice,
        template: RequestTemplate,
    ) -> CameraResult<CaptureRequest> {
        CaptureRequest::new(device, template)
    }

    fn add_target(
        &self,
        request: &mut CaptureRequest,
        target: &CameraOutputTarget,
    ) -> CameraResult {
        request.add_target(target)
    }

    fn create_capture_session(
        &self,
        device: &CameraDevice,
        outputs: &CaptureSessionOutputContainer,
        sink: SessionSink,
    ) -> CameraResult<CameraCaptureSession> {
        CameraCaptureSession::open(device, outputs, sink)
    }

    fn set_repeating_request(
        &self,
        session: &mut CameraCaptureSession,
        request: &CaptureRequest,
    ) -> CameraResult {
        session.set_repeating_request(request)
    }
}
