//! Shared application-wide constants.
//! Centralizes the step scales and the user-facing messages of a rescale run.

// Scale tables
/// Divisor applied before a ratio: values are counted in whole 16px steps.
pub const STEP_SIZE: f64 = 16.0;
/// Values at or below this bound are never rescaled.
pub const PASS_THROUGH_BOUND: f64 = 16.0;
/// Padding/spacing/grid rules as (upper bound, ratio). The final ratio is the catch-all.
pub const PADDING_STEPS: &[(f64, f64)] = &[
    (24.0, 14.0),
    (32.0, 12.0),
    (48.0, 10.0),
    (80.0, 8.0),
    (128.0, 6.0),
];
/// Catch-all ratio for padding values above the last bound.
pub const PADDING_CATCH_ALL: f64 = 4.0;
/// Font size and line height rules as (upper bound, ratio).
pub const FONT_STEPS: &[(f64, f64)] = &[
    (24.0, 14.0),
    (32.0, 14.0),
    (48.0, 12.0),
    (80.0, 10.0),
    (128.0, 8.0),
    (256.0, 8.0),
];
/// Catch-all ratio for font values above the last bound.
pub const FONT_CATCH_ALL: f64 = 4.0;

// Notifications
/// Shown when nothing frame-shaped is selected.
pub const MSG_NO_SELECTION: &str = "Please select a frame.";
/// Shown when the selection held no text nodes.
pub const MSG_SPACINGS_UPDATED: &str = "Spacings updated successfully.";
/// Shown once every text node has been rescaled.
pub const MSG_FONTS_AND_SPACINGS_UPDATED: &str = "Font sizes and spacings updated successfully.";
