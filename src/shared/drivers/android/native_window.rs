// This is free and unencumbered software released into the public domain.

use crate::shared::{CameraError, CameraResult};
use core::ptr::null_mut;
use ndk_sys::{ANativeWindow, ANativeWindow_fromSurface, ANativeWindow_release, JNIEnv, jobject};

/// A display surface handed over by the JVM. Released on drop.
#[derive(Debug)]
pub struct NativeWindow {
    pub(crate) handle: *mut ANativeWindow,
}

unsafe impl Send for NativeWindow {}

impl Drop for NativeWindow {
    fn drop(&mut self) {
        if self.handle.is_null() {
            return;
        }
        unsafe { ANativeWindow_release(self.handle) };
        self.handle = null_mut();
    }
}

impl NativeWindow {
    /// Acquires the native window behind an `android.view.Surface`.
    ///
    /// # Safety
    /// `env` must be the calling thread's JNI environment and `surface` a
    /// live local or global reference to a `Surface`.
    pub unsafe fn from_surface(env: *mut JNIEnv, surface: jobject) -> CameraResult<Self> {
        // See: https://developer.android.com/ndk/reference/group/native-activity#anativewindow_fromsurface
        let handle = unsafe { ANativeWindow_fromSurface(env, surface) };
        if handle.is_null() {
            return Err(CameraError::other("surface has no native window"));
        }
        Ok(Self { handle })
    }
}
