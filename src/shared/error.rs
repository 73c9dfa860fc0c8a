// This is free and unencumbered software released into the public domain.

use super::Slot;
use std::error::Error as StdError;
use thiserror::Error;

pub type CameraResult<T = ()> = core::result::Result<T, CameraError>;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("no suitable camera backend available")]
    NoDriver,

    #[error("no camera device available")]
    NoCamera,

    #[error("camera index {index} out of range ({available} camera(s) available)")]
    CameraIndexOutOfRange { index: usize, available: usize },

    #[error("{0} pipeline is already running")]
    AlreadyRunning(Slot),

    #[error("camera {camera_id} was disconnected")]
    DeviceDisconnected { camera_id: String },

    #[error("camera {camera_id} reported error code {code}")]
    DeviceFailed { camera_id: String, code: i32 },

    #[error("timed out waiting for camera {camera_id} to open")]
    OpenTimedOut { camera_id: String },

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("driver error while {context}")]
    DriverError {
        context: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("{0}")]
    Other(String),
}

impl CameraError {
    #[inline]
    pub fn driver(context: &'static str, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::DriverError {
            context,
            source: Box::new(source),
        }
    }

    #[inline]
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    #[inline]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
