// This is free and unencumbered software released into the public domain.

use super::{
    CameraError, CameraManager, CameraPlatform, CameraResult, DeviceEvent, DeviceMonitor,
    DeviceSink, EventSink, PipelineEvent, RequestTemplate, SessionEvent, SessionSink,
};
use alloc::sync::Arc;
use core::time::Duration;
use derive_more::Display;
use tracing::{debug, error, info, warn};

/// One of the two capture pipelines.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Camera 0, preview template, main view.
    #[display("primary")]
    Primary,
    /// Camera 1, still-capture template, extra view.
    #[display("secondary")]
    Secondary,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Primary, Slot::Secondary];

    pub fn camera_index(self) -> usize {
        match self {
            Slot::Primary => 0,
            Slot::Secondary => 1,
        }
    }

    pub fn template(self) -> RequestTemplate {
        match self {
            Slot::Primary => RequestTemplate::Preview,
            Slot::Secondary => RequestTemplate::StillCapture,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// A fully started capture pipeline.
///
/// Only `start` constructs one and only `stop` takes one apart, so a
/// partially built pipeline is never observable.
pub struct Pipeline<P: CameraPlatform> {
    slot: Slot,
    camera_id: String,
    monitor: Arc<DeviceMonitor>,
    session: P::Session,
    request: P::Request,
    target: P::OutputTarget,
    output: P::SessionOutput,
    container: P::OutputContainer,
    device: P::Device,
    window: P::Window,
}

impl<P: CameraPlatform> core::fmt::Debug for Pipeline<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pipeline")
            .field("slot", &self.slot)
            .field("camera_id", &self.camera_id)
            .field("device_state", &self.monitor.state())
            .finish_non_exhaustive()
    }
}

impl<P: CameraPlatform> Pipeline<P> {
    /// Builds the whole pipeline for `slot` on top of `window`.
    ///
    /// On failure every resource acquired so far, `window` included, is
    /// released in reverse order of acquisition.
    pub(crate) fn start(
        platform: &P,
        slot: Slot,
        window: P::Window,
        open_timeout: Option<Duration>,
        events: &EventSink,
    ) -> CameraResult<Self> {
        let monitor = Arc::new(DeviceMonitor::new());
        let (camera_id, device) = open(platform, slot, &monitor, events)?;
        monitor.wait_opened(&camera_id, open_timeout)?;

        let output = platform.create_session_output(&window)?;
        let mut container = platform.create_output_container()?;
        platform.add_session_output(&mut container, &output)?;

        let target = platform.create_output_target(&window)?;
        let mut request = platform.create_capture_request(&device, slot.template())?;
        platform.add_target(&mut request, &target)?;

        monitor.ensure_usable(&camera_id)?;
        let mut session =
            platform.create_capture_session(&device, &container, session_sink(slot, events))?;
        platform.set_repeating_request(&mut session, &request)?;

        Ok(Self {
            slot,
            camera_id,
            monitor,
            session,
            request,
            target,
            output,
            container,
            device,
            window,
        })
    }

    /// Tears the pipeline down. A failing device close is logged and
    /// returned; every other resource is released regardless.
    pub(crate) fn stop(self, platform: &P) -> CameraResult {
        let Self {
            slot,
            camera_id,
            session,
            request,
            target,
            output,
            container,
            device,
            window,
            ..
        } = self;

        drop(session);
        drop(request);
        drop(target);
        let closed = platform.close_camera(device);
        if let Err(err) = &closed {
            error!(%slot, %camera_id, %err, "failed to close camera device");
        }
        drop(output);
        drop(container);

        drop(window);
        info!(%slot, "view surface is released");

        closed
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn camera_id(&self) -> &str {
        &self.camera_id
    }

    pub fn monitor(&self) -> &DeviceMonitor {
        &self.monitor
    }
}

/// Opens the camera at the slot's fixed index. The camera manager lives
/// only for the duration of this call.
fn open<P: CameraPlatform>(
    platform: &P,
    slot: Slot,
    monitor: &Arc<DeviceMonitor>,
    events: &EventSink,
) -> CameraResult<(String, P::Device)> {
    let manager = platform.camera_manager()?;

    let camera_ids = manager
        .camera_ids()
        .inspect_err(|err| error!(%slot, %err, "failed to get camera id list"))?;
    if camera_ids.is_empty() {
        error!(%slot, "no camera device detected");
        return Err(CameraError::NoCamera);
    }

    let index = slot.camera_index();
    let Some(camera_id) = camera_ids.get(index).cloned() else {
        error!(%slot, index, cameras = camera_ids.len(), "camera index out of range");
        return Err(CameraError::CameraIndexOutOfRange {
            index,
            available: camera_ids.len(),
        });
    };

    info!(%slot, %camera_id, cameras = camera_ids.len(), "trying to open camera");

    match manager.lens_facing(&camera_id) {
        Ok(facing) => info!(%slot, %camera_id, %facing, "lens facing"),
        Err(err) => warn!(%slot, %camera_id, %err, "failed to read camera characteristics"),
    }

    let sink = device_sink(slot, camera_id.clone(), Arc::clone(monitor), events.clone());
    let device = manager
        .open_camera(&camera_id, sink)
        .inspect_err(|err| error!(%slot, %camera_id, %err, "failed to open camera device"))?;

    Ok((camera_id, device))
}

fn device_sink(
    slot: Slot,
    camera_id: String,
    monitor: Arc<DeviceMonitor>,
    events: EventSink,
) -> DeviceSink {
    Arc::new(move |event: DeviceEvent| {
        match event {
            DeviceEvent::Opened => debug!(%slot, %camera_id, "camera is open"),
            DeviceEvent::Disconnected => warn!(%slot, %camera_id, "camera is disconnected"),
            DeviceEvent::Error(code) => error!(%slot, %camera_id, code, "camera device error"),
        }
        monitor.record(event);
        events.emit(PipelineEvent::Device { slot, event });
    })
}

fn session_sink(slot: Slot, events: &EventSink) -> SessionSink {
    let events = events.clone();
    Arc::new(move |event: SessionEvent| {
        match event {
            SessionEvent::Ready => info!(%slot, "session is ready"),
            SessionEvent::Active => info!(%slot, "session is activated"),
            SessionEvent::Closed => info!(%slot, "session is closed"),
        }
        events.emit(PipelineEvent::Session { slot, event });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::testing::{Kind, MockPlatform, OpenBehavior, Step};

    fn start(
        platform: &MockPlatform,
        slot: Slot,
        label: &str,
    ) -> CameraResult<Pipeline<MockPlatform>> {
        let (events, _rx) = EventSink::channel(16);
        Pipeline::start(platform, slot, platform.window(label), None, &events)
    }

    #[test]
    fn slots_have_fixed_camera_and_template() {
        assert_eq!(Slot::Primary.camera_index(), 0);
        assert_eq!(Slot::Primary.template(), RequestTemplate::Preview);
        assert_eq!(Slot::Secondary.camera_index(), 1);
        assert_eq!(Slot::Secondary.template(), RequestTemplate::StillCapture);
    }

    #[test]
    fn started_pipeline_holds_one_of_each_resource() {
        let platform = MockPlatform::with_cameras(2);
        let pipeline = start(&platform, Slot::Primary, "main").unwrap();

        for kind in [
            Kind::Window,
            Kind::Device,
            Kind::SessionOutput,
            Kind::Container,
            Kind::Target,
            Kind::Request,
            Kind::Session,
        ] {
            assert_eq!(platform.live_count(kind), 1, "{kind:?}");
        }
        assert_eq!(platform.live_count(Kind::Manager), 0);
        assert_eq!(pipeline.camera_id(), "0");

        pipeline.stop(&platform).unwrap();
        assert_eq!(platform.live_total(), 0);
    }

    #[test]
    fn failure_at_any_step_releases_everything() {
        for step in [
            Step::Manager,
            Step::CameraIds,
            Step::Open,
            Step::SessionOutput,
            Step::Container,
            Step::AddOutput,
            Step::Target,
            Step::Request,
            Step::AddTarget,
            Step::Session,
            Step::Repeating,
        ] {
            let platform = MockPlatform::with_cameras(2).failing_at(step);
            assert!(start(&platform, Slot::Primary, "main").is_err(), "{step:?}");
            assert_eq!(platform.live_total(), 0, "{step:?} leaked {:?}", platform.live());
            assert!(platform.submissions().is_empty(), "{step:?}");
        }
    }

    #[test]
    fn stop_releases_in_session_to_window_order() {
        let platform = MockPlatform::with_cameras(2);
        let pipeline = start(&platform, Slot::Primary, "main").unwrap();
        assert_eq!(platform.take_released(), [Kind::Manager]);

        pipeline.stop(&platform).unwrap();
        assert_eq!(
            platform.take_released(),
            [
                Kind::Session,
                Kind::Request,
                Kind::Target,
                Kind::Device,
                Kind::SessionOutput,
                Kind::Container,
                Kind::Window,
            ]
        );
    }

    #[test]
    fn failed_session_rolls_back_in_reverse_order() {
        let platform = MockPlatform::with_cameras(2).failing_at(Step::Session);
        assert!(start(&platform, Slot::Primary, "main").is_err());

        assert_eq!(
            platform.take_released(),
            [
                Kind::Manager,
                Kind::Request,
                Kind::Target,
                Kind::Container,
                Kind::SessionOutput,
                Kind::Device,
                Kind::Window,
            ]
        );
    }

    #[test]
    fn device_error_before_session_aborts_start() {
        let platform = MockPlatform::with_cameras(2).with_open(OpenBehavior::DisconnectAfterOpen);
        let result = start(&platform, Slot::Secondary, "extra");

        assert!(matches!(
            result,
            Err(CameraError::DeviceDisconnected { camera_id }) if camera_id == "1"
        ));
        assert_eq!(platform.live_total(), 0);
    }

    #[test]
    fn lens_facing_failure_does_not_abort() {
        let platform = MockPlatform::with_cameras(2).failing_at(Step::LensFacing);
        let pipeline = start(&platform, Slot::Primary, "main").unwrap();
        pipeline.stop(&platform).unwrap();
    }
}
