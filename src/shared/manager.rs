// This is free and unencumbered software released into the public domain.

use super::{
    CameraError, CameraPlatform, CameraResult, DeviceState, EventSink, ManagerConfig, Pipeline,
    PipelineEvent, RestartPolicy, Slot,
};
use dogma::Named;
use std::sync::{Mutex, MutexGuard, PoisonError, mpsc::Receiver};
use tracing::{debug, error, info, warn};

type Slots<P> = [Option<Pipeline<P>>; 2];

/// Owns the primary and secondary capture pipelines.
///
/// All entry points are synchronous and serialized on an internal lock, so
/// callers always observe a slot as either stopped or fully running.
pub struct DualCameraManager<P: CameraPlatform> {
    platform: P,
    config: ManagerConfig,
    pipelines: Mutex<Slots<P>>,
    events: EventSink,
    events_rx: Mutex<Option<Receiver<PipelineEvent>>>,
}

impl<P: CameraPlatform> core::fmt::Debug for DualCameraManager<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DualCameraManager")
            .field("platform", &self.platform.name())
            .field("config", &self.config)
            .field("pipelines", &*self.lock())
            .finish()
    }
}

impl<P: CameraPlatform> DualCameraManager<P> {
    pub fn new(platform: P, config: ManagerConfig) -> Self {
        let (events, events_rx) = EventSink::channel(config.event_capacity);
        debug!(platform = %platform.name(), ?config, "camera manager created");
        Self {
            platform,
            config,
            pipelines: Mutex::new([None, None]),
            events,
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Hands out the event receiver. Only the first call gets it.
    pub fn take_events(&self) -> Option<Receiver<PipelineEvent>> {
        self.events_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Starts the primary pipeline on camera 0 with the preview template.
    pub fn start_preview(&self, window: P::Window) -> CameraResult {
        self.start(Slot::Primary, window)
    }

    pub fn stop_preview(&self) -> CameraResult {
        self.stop(Slot::Primary)
    }

    /// Starts the secondary pipeline on camera 1 with the still-capture
    /// template.
    pub fn start_extra_view(&self, window: P::Window) -> CameraResult {
        self.start(Slot::Secondary, window)
    }

    pub fn stop_extra_view(&self) -> CameraResult {
        self.stop(Slot::Secondary)
    }

    pub fn start(&self, slot: Slot, window: P::Window) -> CameraResult {
        let mut pipelines = self.lock();
        let entry = &mut pipelines[slot.index()];

        if entry.is_some() {
            match self.config.restart {
                RestartPolicy::Reject => {
                    warn!(%slot, "pipeline is already running, rejecting start");
                    return Err(CameraError::AlreadyRunning(slot));
                },
                RestartPolicy::Restart => {
                    info!(%slot, "pipeline is already running, restarting");
                    if let Some(running) = entry.take() {
                        if let Err(err) = self.teardown(running) {
                            warn!(%slot, %err, "previous pipeline stopped with an error");
                        }
                    }
                },
            }
        }

        match Pipeline::start(
            &self.platform,
            slot,
            window,
            self.config.open_timeout,
            &self.events,
        ) {
            Ok(pipeline) => {
                info!(%slot, camera_id = pipeline.camera_id(), "pipeline started");
                self.events.emit(PipelineEvent::Started {
                    slot,
                    camera_id: pipeline.camera_id().into(),
                });
                *entry = Some(pipeline);
                Ok(())
            },
            Err(err) => {
                error!(%slot, %err, "failed to start pipeline");
                self.events.emit(PipelineEvent::Failed {
                    slot,
                    message: err.to_string(),
                });
                Err(err)
            },
        }
    }

    /// Stops the pipeline in `slot`. Stopping an idle slot does nothing.
    ///
    /// The slot is stopped even when an error is returned.
    pub fn stop(&self, slot: Slot) -> CameraResult {
        let mut pipelines = self.lock();
        let Some(running) = pipelines[slot.index()].take() else {
            debug!(%slot, "pipeline is not running");
            return Ok(());
        };
        self.teardown(running)
    }

    pub fn is_running(&self, slot: Slot) -> bool {
        self.lock()[slot.index()].is_some()
    }

    pub fn camera_id(&self, slot: Slot) -> Option<String> {
        self.lock()[slot.index()]
            .as_ref()
            .map(|p| p.camera_id().to_string())
    }

    /// Device state as last reported by the platform, for a running slot.
    pub fn device_state(&self, slot: Slot) -> Option<DeviceState> {
        self.lock()[slot.index()]
            .as_ref()
            .map(|p| p.monitor().state())
    }

    fn teardown(&self, pipeline: Pipeline<P>) -> CameraResult {
        let slot = pipeline.slot();
        let result = pipeline.stop(&self.platform);
        info!(%slot, "close camera");
        self.events.emit(PipelineEvent::Stopped { slot });
        result
    }

    fn lock(&self) -> MutexGuard<'_, Slots<P>> {
        self.pipelines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: CameraPlatform> Drop for DualCameraManager<P> {
    fn drop(&mut self) {
        for slot in Slot::ALL {
            let _ = self.stop(slot);
        }
    }
}
