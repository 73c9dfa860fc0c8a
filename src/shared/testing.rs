// This is free and unencumbered software released into the public domain.

//! In-memory camera platform that records every handle it hands out.

use super::{
    CameraError, CameraManager, CameraPlatform, CameraResult, DeviceEvent, DeviceSink,
    LensFacing, RequestTemplate, SessionEvent, SessionSink,
};
use alloc::{borrow::Cow, sync::Arc};
use core::time::Duration;
use std::{
    collections::BTreeMap,
    sync::{Barrier, Mutex, MutexGuard},
    thread,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Manager,
    Window,
    Device,
    SessionOutput,
    Container,
    Target,
    Request,
    Session,
}

/// Platform call that can be made to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Manager,
    CameraIds,
    LensFacing,
    Open,
    SessionOutput,
    Container,
    AddOutput,
    Target,
    Request,
    AddTarget,
    Session,
    Repeating,
}

/// How the platform confirms a device open.
#[derive(Clone, Copy, Debug)]
pub enum OpenBehavior {
    Immediate,
    Deferred(Duration),
    Never,
    Fails(i32),
    DisconnectAfterOpen,
}

/// A repeating request as submitted to a session.
#[derive(Clone, Debug)]
pub struct Submission {
    pub camera_id: String,
    pub device: u64,
    pub session: u64,
    pub request: u64,
    pub template: RequestTemplate,
    pub targets: Vec<u64>,
    pub windows: Vec<String>,
}

#[derive(Default)]
pub struct Ledger {
    next_id: u64,
    live: BTreeMap<u64, (Kind, String)>,
    created: BTreeMap<Kind, usize>,
    peak: BTreeMap<Kind, usize>,
    released: Vec<Kind>,
    submissions: Vec<Submission>,
    device_sinks: Vec<(String, DeviceSink)>,
}

type SharedLedger = Arc<Mutex<Ledger>>;

fn lock(ledger: &SharedLedger) -> MutexGuard<'_, Ledger> {
    ledger.lock().unwrap_or_else(|p| p.into_inner())
}

/// A ledger entry removed again on drop.
#[derive(Debug)]
pub struct Handle {
    pub id: u64,
    kind: Kind,
    ledger: SharedLedger,
}

impl Handle {
    fn new(ledger: &SharedLedger, kind: Kind, label: impl Into<String>) -> Self {
        let mut guard = lock(ledger);
        guard.next_id += 1;
        let id = guard.next_id;
        guard.live.insert(id, (kind, label.into()));
        *guard.created.entry(kind).or_default() += 1;
        let live = guard.live.values().filter(|(k, _)| *k == kind).count();
        let peak = guard.peak.entry(kind).or_default();
        *peak = (*peak).max(live);
        Self {
            id,
            kind,
            ledger: Arc::clone(ledger),
        }
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        let mut ledger = lock(&self.ledger);
        ledger.live.remove(&self.id);
        ledger.released.push(self.kind);
    }
}

impl core::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ledger").field("live", &self.live).finish()
    }
}

#[derive(Debug)]
pub struct MockWindow {
    _handle: Handle,
    label: String,
}

pub struct MockDevice {
    handle: Handle,
    camera_id: String,
}

#[derive(Debug)]
pub struct MockSessionOutput {
    handle: Handle,
}

#[derive(Debug)]
pub struct MockContainer {
    _handle: Handle,
    outputs: Vec<u64>,
}

#[derive(Debug)]
pub struct MockTarget {
    handle: Handle,
    window: String,
}

#[derive(Debug)]
pub struct MockRequest {
    handle: Handle,
    template: RequestTemplate,
    targets: Vec<u64>,
    windows: Vec<String>,
}

pub struct MockSession {
    handle: Handle,
    device: u64,
    camera_id: String,
    sink: SessionSink,
}

impl Drop for MockSession {
    fn drop(&mut self) {
        (self.sink)(SessionEvent::Closed);
    }
}

pub struct MockManager {
    _handle: Handle,
    platform: MockPlatform,
}

#[derive(Clone)]
pub struct MockPlatform {
    ledger: SharedLedger,
    cameras: Vec<(String, LensFacing)>,
    fail_at: Option<Step>,
    open: OpenBehavior,
    close_fails: bool,
    close_gate: Arc<Mutex<Option<(Arc<Barrier>, Duration)>>>,
}

impl MockPlatform {
    /// Cameras "0", "1", ... alternating back and front.
    pub fn with_cameras(count: usize) -> Self {
        let cameras = (0..count)
            .map(|i| (i.to_string(), LensFacing::from_raw((i % 2 == 0) as u8)))
            .collect();
        Self {
            ledger: SharedLedger::default(),
            cameras,
            fail_at: None,
            open: OpenBehavior::Immediate,
            close_fails: false,
            close_gate: Arc::default(),
        }
    }

    pub fn failing_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self
    }

    pub fn with_open(mut self, behavior: OpenBehavior) -> Self {
        self.open = behavior;
        self
    }

    pub fn with_close_failure(mut self) -> Self {
        self.close_fails = true;
        self
    }

    /// Makes the next `close_camera` meet `gate` and then take `delay`
    /// before the device goes away.
    pub fn with_slow_close(self, gate: Arc<Barrier>, delay: Duration) -> Self {
        *self.close_gate.lock().unwrap_or_else(|p| p.into_inner()) = Some((gate, delay));
        self
    }

    pub fn window(&self, label: &str) -> MockWindow {
        MockWindow {
            _handle: Handle::new(&self.ledger, Kind::Window, label),
            label: label.into(),
        }
    }

    pub fn live(&self) -> Vec<(Kind, String)> {
        lock(&self.ledger).live.values().cloned().collect()
    }

    pub fn live_total(&self) -> usize {
        lock(&self.ledger).live.len()
    }

    pub fn live_count(&self, kind: Kind) -> usize {
        self.live().iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn live_windows(&self) -> Vec<String> {
        self.live()
            .into_iter()
            .filter(|(k, _)| *k == Kind::Window)
            .map(|(_, label)| label)
            .collect()
    }

    pub fn created(&self, kind: Kind) -> usize {
        lock(&self.ledger).created.get(&kind).copied().unwrap_or(0)
    }

    /// Highest number of handles of `kind` that were live at once.
    pub fn peak_live(&self, kind: Kind) -> usize {
        lock(&self.ledger).peak.get(&kind).copied().unwrap_or(0)
    }

    /// Kinds released since the last call, in release order.
    pub fn take_released(&self) -> Vec<Kind> {
        core::mem::take(&mut lock(&self.ledger).released)
    }

    pub fn submissions(&self) -> Vec<Submission> {
        lock(&self.ledger).submissions.clone()
    }

    /// Delivers `event` to the most recently opened device for `camera_id`.
    pub fn fire_device_event(&self, camera_id: &str, event: DeviceEvent) {
        let sink = lock(&self.ledger)
            .device_sinks
            .iter()
            .rev()
            .find(|(id, _)| id == camera_id)
            .map(|(_, sink)| Arc::clone(sink));
        if let Some(sink) = sink {
            sink(event);
        }
    }

    fn check(&self, step: Step) -> CameraResult {
        if self.fail_at == Some(step) {
            return Err(CameraError::other(format!("injected failure at {step:?}")));
        }
        Ok(())
    }
}

impl dogma::Named for MockPlatform {
    fn name(&self) -> Cow<'_, str> {
        "mock".into()
    }
}

impl CameraManager for MockManager {
    type Device = MockDevice;

    fn camera_ids(&self) -> CameraResult<Vec<String>> {
        self.platform.check(Step::CameraIds)?;
        Ok(self.platform.cameras.iter().map(|(id, _)| id.clone()).collect())
    }

    fn lens_facing(&self, camera_id: &str) -> CameraResult<LensFacing> {
        self.platform.check(Step::LensFacing)?;
        self.platform
            .cameras
            .iter()
            .find(|(id, _)| id == camera_id)
            .map(|(_, facing)| *facing)
            .ok_or_else(|| CameraError::other(format!("unknown camera {camera_id}")))
    }

    fn open_camera(&self, camera_id: &str, sink: DeviceSink) -> CameraResult<MockDevice> {
        self.platform.check(Step::Open)?;
        let device = MockDevice {
            handle: Handle::new(&self.platform.ledger, Kind::Device, camera_id),
            camera_id: camera_id.into(),
        };
        lock(&self.platform.ledger)
            .device_sinks
            .push((camera_id.into(), Arc::clone(&sink)));

        match self.platform.open {
            OpenBehavior::Immediate => sink(DeviceEvent::Opened),
            OpenBehavior::Deferred(delay) => {
                thread::spawn(move || {
                    thread::sleep(delay);
                    sink(DeviceEvent::Opened);
                });
            },
            OpenBehavior::Never => {},
            OpenBehavior::Fails(code) => sink(DeviceEvent::Error(code)),
            OpenBehavior::DisconnectAfterOpen => {
                sink(DeviceEvent::Opened);
                sink(DeviceEvent::Disconnected);
            },
        }
        Ok(device)
    }
}

impl CameraPlatform for MockPlatform {
    type Window = MockWindow;
    type Device = MockDevice;
    type Manager = MockManager;
    type SessionOutput = MockSessionOutput;
    type OutputContainer = MockContainer;
    type OutputTarget = MockTarget;
    type Request = MockRequest;
    type Session = MockSession;

    fn camera_manager(&self) -> CameraResult<MockManager> {
        self.check(Step::Manager)?;
        Ok(MockManager {
            _handle: Handle::new(&self.ledger, Kind::Manager, "manager"),
            platform: self.clone(),
        })
    }

    fn close_camera(&self, device: MockDevice) -> CameraResult {
        let gate = self.close_gate.lock().unwrap_or_else(|p| p.into_inner()).take();
        if let Some((gate, delay)) = gate {
            gate.wait();
            thread::sleep(delay);
        }
        drop(device);
        if self.close_fails {
            return Err(CameraError::driver(
                "closing camera device",
                std::io::Error::other("device busy"),
            ));
        }
        Ok(())
    }

    fn create_session_output(&self, window: &MockWindow) -> CameraResult<MockSessionOutput> {
        self.check(Step::SessionOutput)?;
        Ok(MockSessionOutput {
            handle: Handle::new(&self.ledger, Kind::SessionOutput, &window.label),
        })
    }

    fn create_output_container(&self) -> CameraResult<MockContainer> {
        self.check(Step::Container)?;
        Ok(MockContainer {
            _handle: Handle::new(&self.ledger, Kind::Container, "container"),
            outputs: Vec::new(),
        })
    }

    fn add_session_output(
        &self,
        container: &mut MockContainer,
        output: &MockSessionOutput,
    ) -> CameraResult {
        self.check(Step::AddOutput)?;
        container.outputs.push(output.handle.id);
        Ok(())
    }

    fn create_output_target(&self, window: &MockWindow) -> CameraResult<MockTarget> {
        self.check(Step::Target)?;
        Ok(MockTarget {
            handle: Handle::new(&self.ledger, Kind::Target, &window.label),
            window: window.label.clone(),
        })
    }

    fn create_capture_request(
        &self,
        device: &MockDevice,
        template: RequestTemplate,
    ) -> CameraResult<MockRequest> {
        self.check(Step::Request)?;
        Ok(MockRequest {
            handle: Handle::new(&self.ledger, Kind::Request, &device.camera_id),
            template,
            targets: Vec::new(),
            windows: Vec::new(),
        })
    }

    fn add_target(&self, request: &mut MockRequest, target: &MockTarget) -> CameraResult {
        self.check(Step::AddTarget)?;
        request.targets.push(target.handle.id);
        request.windows.push(target.window.clone());
        Ok(())
    }

    fn create_capture_session(
        &self,
        device: &MockDevice,
        outputs: &MockContainer,
        sink: SessionSink,
    ) -> CameraResult<MockSession> {
        self.check(Step::Session)?;
        if outputs.outputs.is_empty() {
            return Err(CameraError::other("session without outputs"));
        }
        let session = MockSession {
            handle: Handle::new(&self.ledger, Kind::Session, &device.camera_id),
            device: device.handle.id,
            camera_id: device.camera_id.clone(),
            sink,
        };
        (session.sink)(SessionEvent::Ready);
        Ok(session)
    }

    fn set_repeating_request(
        &self,
        session: &mut MockSession,
        request: &MockRequest,
    ) -> CameraResult {
        self.check(Step::Repeating)?;
        lock(&self.ledger).submissions.push(Submission {
            camera_id: session.camera_id.clone(),
            device: session.device,
            session: session.handle.id,
            request: request.handle.id,
            template: request.template,
            targets: request.targets.clone(),
            windows: request.windows.clone(),
        });
        (session.sink)(SessionEvent::Active);
        Ok(())
    }
}
