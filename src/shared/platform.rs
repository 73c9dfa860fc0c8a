// This is free and unencumbered software released into the public domain.

//! The camera capabilities a pipeline needs from the platform.
//!
//! Every handle type is owned and releases its platform resource on drop,
//! except camera devices, which are closed through
//! [`CameraPlatform::close_camera`] so that a failing close can be reported.

use super::CameraResult;
use alloc::sync::Arc;
use derive_more::Display;
use dogma::Named;

pub type DeviceSink = Arc<dyn Fn(DeviceEvent) + Send + Sync + 'static>;
pub type SessionSink = Arc<dyn Fn(SessionEvent) + Send + Sync + 'static>;

/// Capture request template.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum RequestTemplate {
    #[display("preview")]
    Preview,
    #[display("still-capture")]
    StillCapture,
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum LensFacing {
    #[display("front")]
    Front,
    #[display("back")]
    Back,
    #[display("external")]
    External,
    #[display("unknown({_0})")]
    Unknown(u8),
}

impl LensFacing {
    /// Decodes the `android.lens.facing` characteristic.
    pub fn from_raw(value: u8) -> Self {
        match value {
            0 => Self::Front,
            1 => Self::Back,
            2 => Self::External,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceEvent {
    Opened,
    Disconnected,
    Error(i32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Ready,
    Active,
    Closed,
}

/// A short-lived handle used to enumerate and open cameras.
pub trait CameraManager {
    type Device;

    fn camera_ids(&self) -> CameraResult<Vec<String>>;

    fn lens_facing(&self, camera_id: &str) -> CameraResult<LensFacing>;

    /// Opens `camera_id`. The returned device is usable once `sink` has
    /// received [`DeviceEvent::Opened`].
    fn open_camera(&self, camera_id: &str, sink: DeviceSink) -> CameraResult<Self::Device>;
}

pub trait CameraPlatform: Named + Send + Sync {
    type Window: Send;
    type Device: Send;
    type Manager: CameraManager<Device = Self::Device>;
    type SessionOutput: Send;
    type OutputContainer: Send;
    type OutputTarget: Send;
    type Request: Send;
    type Session: Send;

    fn camera_manager(&self) -> CameraResult<Self::Manager>;

    fn close_camera(&self, device: Self::Device) -> CameraResult;

    fn create_session_output(&self, window: &Self::Window) -> CameraResult<Self::SessionOutput>;

    fn create_output_container(&self) -> CameraResult<Self::OutputContainer>;

    fn add_session_output(
        &self,
        container: &mut Self::OutputContainer,
        output: &Self::SessionOutput,
    ) -> CameraResult;

    fn create_output_target(&self, window: &Self::Window) -> CameraResult<Self::OutputTarget>;

    fn create_capture_request(
        &self,
        device: &Self::Device,
        template: RequestTemplate,
    ) -> CameraResult<Self::Request>;

    fn add_target(&self, request: &mut Self::Request, target: &Self::OutputTarget)
    -> CameraResult;

    fn create_capture_session(
        &self,
        device: &Self::Device,
        outputs: &Self::OutputContainer,
        sink: SessionSink,
    ) -> CameraResult<Self::Session>;

    /// Submits `request` for continuous capture until the session is closed.
    fn set_repeating_request(
        &self,
        session: &mut Self::Session,
        request: &Self::Request,
    ) -> CameraResult;
}
