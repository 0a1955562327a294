//! Platform-agnostic UI events.
//!
//! Hosts forward raw DOM callbacks as [`UiEvent`]s and convert them with
//! [`UiEvent::into_command`]. Events with no panel meaning map to `None`.
//!
//! # Example
//!
//! ```ignore
//! if let Some(cmd) = UiEvent::Click(ElementId::ClearObjects).into_command() {
//!     controller.execute(cmd)?;
//! }
//! ```

use super::PanelCommand;
use crate::orientation::OrientationSample;
use crate::ui::{ElementId, StepDirection};

/// A raw event from the page.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A button was clicked.
    Click(ElementId),
    /// A form control's value changed while typing or dragging.
    Input {
        /// The control.
        target: ElementId,
        /// Its new value.
        value: String,
    },
    /// A form control lost focus.
    Blur(ElementId),
    /// A ± button beside a position field was clicked.
    StepButton {
        /// The field the button targets (`data-input`).
        field: ElementId,
        /// `"increment"` or `"decrement"` (`data-action`).
        action: String,
    },
    /// A key was pressed inside a form control.
    KeyDown {
        /// The focused control.
        target: ElementId,
        /// `KeyboardEvent.key`.
        key: String,
        /// Ctrl held.
        ctrl: bool,
        /// Cmd/Meta held.
        meta: bool,
    },
    /// Click anywhere in the document outside the panel.
    DocumentClick,
    /// A video reported `loadeddata`.
    VideoReady {
        /// The video's media source.
        source: String,
    },
    /// A video reported `error`.
    VideoError {
        /// The video's media source.
        source: String,
        /// Failure description.
        detail: String,
    },
    /// A device-orientation sample.
    Orientation(OrientationSample),
    /// Immersive mode entered (`true`) or exited.
    VrModeChanged(bool),
}

impl UiEvent {
    /// Translate into a controller command.
    #[must_use]
    pub fn into_command(self) -> Option<PanelCommand> {
        match self {
            Self::Click(target) => click_command(target),
            Self::Input { target, value } => input_command(target, &value),
            Self::Blur(target) => target
                .axis()
                .map(|axis| PanelCommand::BlurPosition { axis }),
            Self::StepButton { field, action } => {
                field.axis().map(|axis| PanelCommand::StepPosition {
                    axis,
                    direction: StepDirection::from_action(&action),
                })
            }
            Self::KeyDown {
                target,
                key,
                ctrl,
                meta,
            } => (target == ElementId::ModelUrl
                && (ctrl || meta)
                && key.eq_ignore_ascii_case("v"))
            .then_some(PanelCommand::PasteModelUrl),
            Self::DocumentClick => Some(PanelCommand::UserGesture),
            Self::VideoReady { source } => {
                Some(PanelCommand::VideoReady { source })
            }
            Self::VideoError { source, detail } => {
                Some(PanelCommand::VideoError { source, detail })
            }
            Self::Orientation(sample) => {
                Some(PanelCommand::Orientation(sample))
            }
            Self::VrModeChanged(entered) => {
                Some(PanelCommand::VrModeChanged { entered })
            }
        }
    }
}

fn click_command(target: ElementId) -> Option<PanelCommand> {
    let cmd = match target {
        ElementId::TogglePanel => PanelCommand::TogglePanel,
        ElementId::AddObject => PanelCommand::AddObject,
        ElementId::ClearObjects => PanelCommand::ClearObjects,
        ElementId::ToggleBackground => PanelCommand::ToggleBackground,
        ElementId::PasteUrl => PanelCommand::PasteModelUrl,
        ElementId::ToggleAudio => PanelCommand::ToggleAudio,
        ElementId::SavePositions => PanelCommand::SaveVideoTransforms,
        ElementId::ToggleGyroscope => PanelCommand::ToggleGyroscope,
        _ => return None,
    };
    Some(cmd)
}

fn input_command(target: ElementId, value: &str) -> Option<PanelCommand> {
    match target {
        ElementId::ScaleSlider => {
            parse_slider(value).map(PanelCommand::SetScale)
        }
        ElementId::RotationSlider => {
            parse_slider(value).map(PanelCommand::SetRotation)
        }
        _ => target.axis().map(|axis| PanelCommand::EditPosition {
            axis,
            raw: value.to_owned(),
        }),
    }
}

fn parse_slider(value: &str) -> Option<f32> {
    match value.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            log::debug!("ignoring non-numeric slider value {value:?}");
            None
        }
    }
}
