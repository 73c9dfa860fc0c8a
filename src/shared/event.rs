// This is free and unencumbered software released into the public domain.

use super::{DeviceEvent, SessionEvent, Slot};
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineEvent {
    Started { slot: Slot, camera_id: String },
    Stopped { slot: Slot },
    Device { slot: Slot, event: DeviceEvent },
    Session { slot: Slot, event: SessionEvent },
    Failed { slot: Slot, message: String },
}

impl PipelineEvent {
    pub fn slot(&self) -> Slot {
        match self {
            Self::Started { slot, .. }
            | Self::Stopped { slot }
            | Self::Device { slot, .. }
            | Self::Session { slot, .. }
            | Self::Failed { slot, .. } => *slot,
        }
    }
}

/// Non-blocking sender shared by the manager and the platform callbacks.
///
/// Events are dropped when the channel is full or nobody listens; platform
/// callback threads must never block on a slow consumer.
#[derive(Clone, Debug)]
pub struct EventSink {
    tx: SyncSender<PipelineEvent>,
}

impl EventSink {
    pub fn channel(capacity: usize) -> (Self, Receiver<PipelineEvent>) {
        let (tx, rx) = sync_channel(capacity.max(1));
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: PipelineEvent) {
        let _ = self.tx.try_send(event);
    }
}
