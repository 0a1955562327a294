//! Typed handles onto the panel's DOM elements.
//!
//! The controller never looks elements up by string; every element it
//! touches is an [`ElementId`], and the host resolves all of them once at
//! startup.

pub mod numeric;

/// Every panel element the controller reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementId {
    /// The collapsible panel container.
    UiPanel,
    /// Collapse/expand button.
    TogglePanel,
    /// Spawn button.
    AddObject,
    /// Remove-all button.
    ClearObjects,
    /// Object type dropdown.
    ObjectType,
    /// Scale slider.
    ScaleSlider,
    /// Scale readout.
    ScaleValue,
    /// Rotation slider.
    RotationSlider,
    /// Rotation readout.
    RotationValue,
    /// Position X field.
    PosX,
    /// Position Y field.
    PosY,
    /// Position Z field.
    PosZ,
    /// Backdrop visibility button.
    ToggleBackground,
    /// Model URL field.
    ModelUrl,
    /// Paste-from-clipboard button.
    PasteUrl,
    /// Mute/play button.
    ToggleAudio,
    /// Export button.
    SavePositions,
    /// Gyroscope button.
    ToggleGyroscope,
    /// Loading overlay.
    LoadingScreen,
    /// Loading bar fill.
    ProgressBar,
    /// Loading percentage text.
    LoadingText,
}

impl ElementId {
    /// All elements, in markup order.
    pub const ALL: [Self; 21] = [
        Self::UiPanel,
        Self::TogglePanel,
        Self::AddObject,
        Self::ClearObjects,
        Self::ObjectType,
        Self::ScaleSlider,
        Self::ScaleValue,
        Self::RotationSlider,
        Self::RotationValue,
        Self::PosX,
        Self::PosY,
        Self::PosZ,
        Self::ToggleBackground,
        Self::ModelUrl,
        Self::PasteUrl,
        Self::ToggleAudio,
        Self::SavePositions,
        Self::ToggleGyroscope,
        Self::LoadingScreen,
        Self::ProgressBar,
        Self::LoadingText,
    ];

    /// CSS selector the host uses to resolve this element.
    #[must_use]
    pub fn selector(self) -> &'static str {
        match self {
            Self::UiPanel => "#ui-panel",
            Self::TogglePanel => "#toggle-ui",
            Self::AddObject => "#add-object",
            Self::ClearObjects => "#clear-objects",
            Self::ObjectType => "#object-type",
            Self::ScaleSlider => "#scale",
            Self::ScaleValue => "#scale-value",
            Self::RotationSlider => "#rotation",
            Self::RotationValue => "#rotation-value",
            Self::PosX => "#pos-x",
            Self::PosY => "#pos-y",
            Self::PosZ => "#pos-z",
            Self::ToggleBackground => "#toggle-sphere",
            Self::ModelUrl => "#model-url",
            Self::PasteUrl => "#paste-url",
            Self::ToggleAudio => "#toggle-audio",
            Self::SavePositions => "#save-positions",
            Self::ToggleGyroscope => "#toggle-gyroscope",
            Self::LoadingScreen => "#loading-screen",
            Self::ProgressBar => ".progress-bar",
            Self::LoadingText => ".loading-text",
        }
    }

    /// Reverse lookup of a DOM `id` attribute (without `#`).
    #[must_use]
    pub fn from_dom_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|el| el.selector().strip_prefix('#') == Some(id))
    }

    /// The position field for an axis.
    #[must_use]
    pub fn position_field(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::PosX,
            Axis::Y => Self::PosY,
            Axis::Z => Self::PosZ,
        }
    }

    /// The axis of a position field.
    #[must_use]
    pub fn axis(self) -> Option<Axis> {
        match self {
            Self::PosX => Some(Axis::X),
            Self::PosY => Some(Axis::Y),
            Self::PosZ => Some(Axis::Z),
            _ => None,
        }
    }
}

/// A position axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
    /// Depth.
    Z,
}

/// Direction of a ± step button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepDirection {
    /// `+`.
    Increment,
    /// `−`.
    Decrement,
}

impl StepDirection {
    /// Parse the `data-action` value of a step button.
    #[must_use]
    pub fn from_action(action: &str) -> Self {
        if action == "increment" {
            Self::Increment
        } else {
            Self::Decrement
        }
    }
}

/// The consumed UI interface: value/text/class writes on resolved elements.
pub trait UiSurface {
    /// Current `value` of a form control.
    fn value(&self, id: ElementId) -> String;

    /// Replace the `value` of a form control.
    fn set_value(&mut self, id: ElementId, value: &str);

    /// Replace an element's text content.
    fn set_text(&mut self, id: ElementId, text: &str);

    /// Add (`on`) or remove a CSS class.
    fn set_class(&mut self, id: ElementId, class: &str, on: bool);

    /// Whether an element carries a CSS class.
    fn has_class(&self, id: ElementId, class: &str) -> bool;

    /// Set an element's inline width as a percentage.
    fn set_width_percent(&mut self, id: ElementId, percent: u32);

    /// Show a blocking notice to the user.
    fn notify(&mut self, message: &str);
}

/// What the panel container does with a raw DOM event, so presses and
/// drags on the panel never steer the scene behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelEventPolicy {
    /// Stop propagation.
    Swallow,
    /// Stop propagation and cancel the default action (page scroll).
    SwallowAndBlock,
}

impl PanelEventPolicy {
    /// Every event the panel container listens for.
    pub const EVENTS: [&'static str; 8] = [
        "mousedown",
        "mousemove",
        "mouseup",
        "touchstart",
        "touchmove",
        "touchend",
        "wheel",
        "click",
    ];

    /// Policy for one of [`EVENTS`](Self::EVENTS). `touchstart` keeps its
    /// default so taps still synthesize clicks on the panel's buttons.
    #[must_use]
    pub fn for_event(name: &str) -> Self {
        if name == "touchmove" {
            Self::SwallowAndBlock
        } else {
            Self::Swallow
        }
    }
}
