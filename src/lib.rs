// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Control panel for declarative 3D/VR scenes.
//!
//! The crate binds UI controls (buttons, sliders, numeric fields) to
//! attribute writes on a string-attributed scene graph, tracks video-texture
//! load progress behind a loading overlay, and steers the camera from
//! device-orientation samples.
//!
//! # Key entry points
//!
//! - [`controller::SceneController`] - owns every piece of panel state and
//!   executes [`controller::PanelCommand`]s
//! - [`scene::SceneGraph`] - the scene collaborator (create/remove/query
//!   entities by tag, string attributes)
//! - [`ui::UiSurface`] - typed handles onto the panel's DOM elements
//! - [`options::Options`] - spawn defaults, slider ranges, labels
//!
//! # Architecture
//!
//! Everything runs on the single event-loop thread. Platform collaborators
//! are injected through a [`controller::Platform`] bundle, so the same
//! controller runs against the in-memory doubles in [`testing`] and, behind
//! the `web` feature, against the live DOM. Work that must suspend
//! (permission prompts, clipboard reads, audio playback) is handed back to
//! the host as a [`controller::Deferred`] carrying a [`task::TaskToken`];
//! stale tokens are dropped when the host resumes them.

pub mod audio;
pub mod camera;
pub mod controller;
pub mod error;
pub mod export;
pub mod options;
pub mod orientation;
pub mod progress;
pub mod scene;
pub mod storage;
pub mod task;
pub mod testing;
pub mod ui;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use controller::{Deferred, PanelCommand, Platform, SceneController};
pub use error::PanelError;
pub use options::Options;
