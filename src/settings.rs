use std::path::Path;

use serde::Deserialize;

use kiwi_behavior::BehaviorParams;

use crate::harness::WheelSpeedProfile;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub behavior: BehaviorParams,
    pub harness: WheelSpeedProfile,
}

impl Settings {
    pub fn load(path: &Path) -> kiwi_core::Result<Self> {
        kiwi_core::config::load_settings(path)
    }
}
