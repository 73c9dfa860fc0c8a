// This is free and unencumbered software released into the public domain.

//! Dual-camera preview pipelines over the Android Camera2 NDK.
//!
//! A [`shared::DualCameraManager`] owns two independent capture pipelines,
//! one per [`shared::Slot`], and drives them through a
//! [`shared::CameraPlatform`]. On Android the platform is the NDK camera
//! stack; the `jni` feature exposes the manager to
//! `org.freedesktop.nativecamera2.NativeCamera2`.

extern crate alloc;

pub mod cli;
pub mod shared;

#[cfg(all(feature = "jni", target_os = "android"))]
pub mod bridge;
