//! The rescale driver.
//!
//! A run picks the selected frame, rewrites its spacing, and (when the frame
//! holds text) rescales every text node once its fonts are available. Every
//! run ends with exactly one notification followed by `close`:
//!
//! - nothing frame-like selected: "Please select a frame.", no mutation
//! - no text nodes: spacing pass only
//! - text nodes: spacing pass, then all font units joined before reporting

use crate::config::RescaleOptions;
use crate::constants::{MSG_FONTS_AND_SPACINGS_UPDATED, MSG_NO_SELECTION, MSG_SPACINGS_UPDATED};
use crate::host::{FontLoadError, FontLoader, Notifier};
use crate::mutate::{apply_spacing, rescale_text_nodes, text_nodes_mut, SpacingPass, TextPass};
use crate::types::{Document, Node};
use thiserror::Error;


/// Which success path a run took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The selection held no text; only spacing changed
    SpacingsUpdated,
    /// Spacing changed and every text node was rescaled
    FontsAndSpacingsUpdated,
}

impl Outcome {
    /// The notification shown for this outcome.
    pub fn message(self) -> &'static str {
        match self {
            Outcome::SpacingsUpdated => MSG_SPACINGS_UPDATED,
            Outcome::FontsAndSpacingsUpdated => MSG_FONTS_AND_SPACINGS_UPDATED,
        }
    }
}

/// What a successful run changed.
#[derive(Debug, Clone, PartialEq)]
pub struct RescaleReport {
    /// Success path taken
    pub outcome: Outcome,
    /// Spacing pass counts
    pub spacing: SpacingPass,
    /// Text pass counts; empty when there was no text
    pub text: TextPass,
}

/// Why a run ended without success.
#[derive(Debug, Error)]
pub enum RescaleError {
    /// Nothing frame-like was selected.
    #[error("{}", MSG_NO_SELECTION)]
    NoSelection,
    /// Some text nodes kept their size because a font never loaded.
    ///
    /// Spacing and the remaining text nodes were still rescaled.
    #[error("{failed} text node(s) were not rescaled: {source}")]
    FontLoad {
        /// First failure encountered
        #[source]
        source: FontLoadError,
        /// Number of text nodes that failed
        failed: usize,
    },
}

/// Runs rescales with a font loader and a fixed set of options.
pub struct Rescaler<L> {
    loader: L,
    options: RescaleOptions,
}

impl<L: FontLoader> Rescaler<L> {
    /// Creates a rescaler.
    pub fn new(loader: L, options: RescaleOptions) -> Self {
        Self { loader, options }
    }

    /// The options every run uses.
    pub fn options(&self) -> &RescaleOptions {
        &self.options
    }

    /// The font loader every run uses.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Rescales the document's selected frame and reports through `notifier`.
    ///
    /// `notifier` is always closed before this returns.
    pub async fn run<N: Notifier>(
        &self,
        document: &mut Document,
        notifier: &mut N,
    ) -> Result<RescaleReport, RescaleError> {
        let Some(root) = document.selected_frame_mut() else {
            log::warn!("No frame-like node selected");
            notifier.notify(MSG_NO_SELECTION);
            notifier.close();
            return Err(RescaleError::NoSelection);
        };

        let result = self.rescale(root).await;
        match &result {
            Ok(report) => notifier.notify(report.outcome.message()),
            Err(err) => notifier.notify(&err.to_string()),
        }
        notifier.close();
        result
    }

    /// Rescales the subtree under `root`: spacing first, then text.
    pub async fn rescale(&self, root: &mut Node) -> Result<RescaleReport, RescaleError> {
        log::info!("Rescaling \"{}\" ({})", root.name, root.id);

        let spacing = apply_spacing(root, &self.options.padding_table);
        log::info!(
            "Spacing pass: {} distinct values, {} properties rewritten",
            spacing.distinct_values,
            spacing.rewritten
        );

        let texts = text_nodes_mut(root);
        if texts.is_empty() {
            return Ok(RescaleReport {
                outcome: Outcome::SpacingsUpdated,
                spacing,
                text: TextPass::default(),
            });
        }

        log::debug!("Launching font units for {} text node(s)", texts.len());
        let text = rescale_text_nodes(
            texts,
            &self.loader,
            &self.options.font_table,
            self.options.reset_line_heights,
        )
        .await;
        log::info!(
            "Text pass: {} node(s) rescaled, {} font load(s), {} failure(s)",
            text.rescaled,
            text.fonts_loaded,
            text.failures.len()
        );

        if let Some(first) = text.failures.first() {
            return Err(RescaleError::FontLoad {
                source: first.clone(),
                failed: text.failures.len(),
            });
        }

        Ok(RescaleReport {
            outcome: Outcome::FontsAndSpacingsUpdated,
            spacing,
            text,
        })
    }
}
