use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::export::EXPORT_FILE_NAME;

/// Page wiring: storage keys, CSS classes, selectors and file names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Page", inline)]
#[serde(default)]
pub struct PageOptions {
    /// Client-storage key for the panel's collapsed flag.
    pub panel_state_key: String,
    /// Class toggled on the panel when collapsed.
    pub collapsed_class: String,
    /// Class that fades the loading overlay out.
    pub fade_out_class: String,
    /// Selector the scene raycaster is restricted to.
    pub raycaster_selector: String,
    /// Download name of the transform export.
    pub export_file_name: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            panel_state_key: "uiPanelCollapsed".to_owned(),
            collapsed_class: "collapsed".to_owned(),
            fade_out_class: "fade-out".to_owned(),
            raycaster_selector: "[data-raycastable]".to_owned(),
            export_file_name: EXPORT_FILE_NAME.to_owned(),
        }
    }
}
