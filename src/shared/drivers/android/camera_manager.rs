// This is free and unencumbered software released into the public domain.

use super::{CameraDevice, CameraStatus};
use crate::shared::{self, CameraError, CameraResult, DeviceSink, LensFacing};
use alloc::ffi::CString;
use core::{ffi::CStr, mem::zeroed, ptr::null_mut};
use ndk_sys::{
    ACameraManager, ACameraManager_create, ACameraManager_delete,
    ACameraManager_deleteCameraIdList, ACameraManager_getCameraCharacteristics,
    ACameraManager_getCameraIdList, ACameraManager_openCamera, ACameraMetadata_const_entry,
    ACameraMetadata_free, ACameraMetadata_getConstEntry, acamera_metadata_tag,
};
use scopeguard::defer;
use tracing::debug;

#[derive(Debug)]
pub struct CameraManager {
    pub(crate) handle: *mut ACameraManager,
}

impl Drop for CameraManager {
    fn drop(&mut self) {
        unsafe {
            ACameraManager_delete(self.handle);
            self.handle = null_mut();
        }
    }
}

impl CameraManager {
    pub fn new() -> CameraResult<Self> {
        let handle = unsafe { ACameraManager_create() };
        if handle.is_null() {
            return Err(CameraError::other("ACameraManager_create returned null"));
        }
        Ok(Self { handle })
    }
}

fn camera_id(id: &str) -> CameraResult<CString> {
    CString::new(id).map_err(|_| CameraError::invalid_config(format!("bad camera id {id:?}")))
}

impl shared::CameraManager for CameraManager {
    type Device = CameraDevice;

    fn camera_ids(&self) -> CameraResult<Vec<String>> {
        let mut list_ptr = null_mut();
        let status = unsafe { ACameraManager_getCameraIdList(self.handle, &mut list_ptr) };
        CameraStatus::check(status, "getting camera id list")?;

        defer! {
            unsafe { ACameraManager_deleteCameraIdList(list_ptr); }
        }

        let list = unsafe { &*list_ptr };
        if list.numCameras < 1 {
            return Ok(Vec::new()); // no devices
        }

        let ids = unsafe { core::slice::from_raw_parts(list.cameraIds, list.numCameras as usize) };

        let result: Vec<String> = ids
            .iter()
            .map(|p| unsafe { CStr::from_ptr(*p).to_string_lossy().into_owned() })
            .collect();

        Ok(result)
    }

    fn lens_facing(&self, id: &str) -> CameraResult<LensFacing> {
        let id = camera_id(id)?;

        let mut metadata = null_mut();
        let status = unsafe {
            ACameraManager_getCameraCharacteristics(self.handle, id.as_ptr(), &mut metadata)
        };
        CameraStatus::check(status, "getting camera characteristics")?;

        defer! {
            unsafe { ACameraMetadata_free(metadata); }
        }

        let mut entry: ACameraMetadata_const_entry = unsafe { zeroed() };
        let status = unsafe {
            ACameraMetadata_getConstEntry(
                metadata,
                acamera_metadata_tag::ACAMERA_LENS_FACING.0 as u32,
                &mut entry,
            )
        };
        CameraStatus::check(status, "reading lens facing")?;

        if entry.count < 1 {
            return Err(CameraError::other("lens facing entry is empty"));
        }

        // ACAMERA_LENS_FACING is a byte enum.
        let facing = unsafe { *entry.data.u8_ };
        Ok(LensFacing::from_raw(facing))
    }

    fn open_camera(&self, id: &str, sink: DeviceSink) -> CameraResult<CameraDevice> {
        let mut device = CameraDevice::new(camera_id(id)?, sink);
        let status = unsafe {
            ACameraManager_openCamera(
                self.handle,
                device.id.as_ptr(),
                &mut *device.state_callbacks,
                &mut device.handle,
            )
        };
        debug!(camera_id = id, ?status, "ACameraManager_openCamera");
        CameraStatus::check(status, "opening camera device")?;

        // the NDK hands the device out already open
        device.notify_opened();
        Ok(device)
    }
}
