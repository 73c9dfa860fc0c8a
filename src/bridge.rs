// This is free and unencumbered software released into the public domain.

//! JNI entry points for `org.freedesktop.nativecamera2.NativeCamera2`.
//!
//! The Java side owns an opaque `long` handle created by `create` and
//! passes it to every other call. Failures end in a log line; nothing is
//! thrown into the JVM.

use crate::shared::{
    DualCameraManager, ManagerConfig, Slot,
    drivers::android::{NativeWindow, NdkCameraPlatform, logcat},
};
use jni::{
    JNIEnv,
    objects::{JClass, JObject},
    sys::jlong,
};
use tracing::{error, info, warn};

type Manager = DualCameraManager<NdkCameraPlatform>;

fn manager<'a>(handle: jlong) -> Option<&'a Manager> {
    if handle == 0 {
        warn!("camera manager handle is null");
        return None;
    }
    // SAFETY: non-zero handles come from `create` and stay valid until `destroy`.
    Some(unsafe { &*(handle as *const Manager) })
}

fn start(env: &JNIEnv, handle: jlong, slot: Slot, surface: &JObject) {
    let Some(manager) = manager(handle) else {
        return;
    };

    let window =
        unsafe { NativeWindow::from_surface(env.get_raw().cast(), surface.as_raw().cast()) };
    let window = match window {
        Ok(window) => window,
        Err(err) => {
            error!(%slot, %err, "failed to acquire view surface");
            return;
        },
    };
    info!(%slot, surface = ?surface.as_raw(), "view surface is prepared");

    if let Err(err) = manager.start(slot, window) {
        error!(%slot, %err, "start failed");
    }
}

fn stop(handle: jlong, slot: Slot) {
    let Some(manager) = manager(handle) else {
        return;
    };
    if let Err(err) = manager.stop(slot) {
        warn!(%slot, %err, "stop finished with an error");
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_freedesktop_nativecamera2_NativeCamera2_create(
    _env: JNIEnv,
    _class: JClass,
) -> jlong {
    logcat::init();

    match NdkCameraPlatform::new() {
        Ok(platform) => {
            let manager = Box::new(Manager::new(platform, ManagerConfig::default()));
            Box::into_raw(manager) as jlong
        },
        Err(err) => {
            error!(%err, "failed to create camera manager");
            0
        },
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_freedesktop_nativecamera2_NativeCamera2_destroy(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    if handle == 0 {
        return;
    }
    // SAFETY: the handle came from `create` and Java never uses it again.
    drop(unsafe { Box::from_raw(handle as *mut Manager) });
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_freedesktop_nativecamera2_NativeCamera2_startPreview(
    env: JNIEnv,
    _class: JClass,
    handle: jlong,
    surface: JObject,
) {
    start(&env, handle, Slot::Primary, &surface);
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_freedesktop_nativecamera2_NativeCamera2_stopPreview(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    stop(handle, Slot::Primary);
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_freedesktop_nativecamera2_NativeCamera2_startExtraView(
    env: JNIEnv,
    _class: JClass,
    handle: jlong,
    surface: JObject,
) {
    start(&env, handle, Slot::Secondary, &surface);
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_freedesktop_nativecamera2_NativeCamera2_stopExtraView(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    stop(handle, Slot::Secondary);
}
