use serde::Serialize;
use ts_rs::TS;

use super::entities::{Capabilities, Profile};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct ProfileResponse {
    pub profile: Profile,
    pub capabilities: Capabilities,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let capabilities = profile.capabilities();
        Self {
            profile,
            capabilities,
        }
    }
}
