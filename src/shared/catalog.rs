// This is free and unencumbered software released into the public domain.

use super::{CameraManager, CameraPlatform, CameraResult, LensFacing, Slot};
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraInfo {
    pub index: usize,
    pub id: String,
    pub facing: Option<LensFacing>,
}

impl CameraInfo {
    /// The pipeline slot that opens this camera, if any.
    pub fn slot(&self) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|slot| slot.camera_index() == self.index)
    }
}

/// Enumerates the platform's cameras in the order pipelines index them.
pub fn list_cameras<P: CameraPlatform>(platform: &P) -> CameraResult<Vec<CameraInfo>> {
    let manager = platform.camera_manager()?;
    let ids = manager.camera_ids()?;

    let cameras = ids
        .into_iter()
        .enumerate()
        .map(|(index, id)| {
            let facing = manager
                .lens_facing(&id)
                .inspect_err(|err| warn!(camera_id = %id, %err, "failed to read lens facing"))
                .ok();
            CameraInfo { index, id, facing }
        })
        .collect();

    Ok(cameras)
}
