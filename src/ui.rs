//! Control surface
//!
//! Each button or slider maps to exactly one [`ControlAction`]. The labels
//! live here so the DOM glue only has to copy strings around.

use crate::sim::IconId;

/// CSS class marking a toggle that is on
pub const ACTIVE_CLASS: &str = "active";

/// Shown in place of launch buttons when no icons are configured
pub const EMPTY_MANIFEST_HINT: &str = "Add PNG files to images/ and update the icon list in the tuning file";

/// A user-triggered state change
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    Launch(IconId),
    ToggleFreeze,
    ToggleDrain,
    SetSpin(f32),
    ToggleRecord,
}

pub fn launch_label(name: &str) -> String {
    format!("Launch {}", name)
}

pub fn freeze_label(frozen: bool) -> &'static str {
    if frozen { "Unfreeze" } else { "Freeze" }
}

pub fn drain_label(draining: bool) -> &'static str {
    if draining { "Resume" } else { "Drain" }
}

pub fn record_label(recording: bool) -> &'static str {
    if recording { "Stop" } else { "Record" }
}

/// Spin slider readout
pub fn spin_readout(spin_factor: f32) -> String {
    format!("{:.3}", spin_factor)
}
