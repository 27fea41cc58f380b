//! # Spacing Rescale
//!
//! Rescales the spacing and typography of a selected design frame from one
//! step scale to another. Values are remapped through piecewise step tables:
//! - **Spacing**: padding, item spacing and grid values share one lookup, so
//!   equal values anywhere in the frame land on the same new value
//! - **Typography**: font sizes and pixel line heights go through their own
//!   table once every font used by the text node has loaded
//!
//! ## Features
//! - Capability-typed document model with JSON import and export
//! - Configurable scale tables and line height reset
//! - Concurrent font loading joined before the run reports success
//! - System font lookup through `fontdb`

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod collect;
pub mod config;
pub mod constants;
pub mod host;
pub mod mutate;
pub mod rescale;
pub mod samples;
pub mod scale;
mod types;

// Re-export public types and functions
pub use collect::{collect_scalable_values, ScalableValue, ScaleLookup};
pub use config::{ConfigError, RescaleOptions};
pub use host::{ConsoleNotifier, FontLoadError, FontLoader, Notifier, SystemFontLoader};
pub use rescale::{Outcome, RescaleError, RescaleReport, Rescaler};
pub use scale::{scale, ScaleRule, ScaleTable, ScaleTableError};
pub use types::*;

/// Rescales the document's selection with the default options.
///
/// # Example
///
/// ```
/// use spacing_rescale::*;
///
/// let mut doc = Document::new("Example");
/// let frame = Node::frame("Card", Container::new().with_padding(Padding::uniform(32.0)));
/// let id = doc.add_node(frame);
/// doc.select(id);
///
/// let mut notifier = ConsoleNotifier::new();
/// let report = futures::executor::block_on(rescale_selection(
///     &mut doc,
///     &SystemFontLoader::new(),
///     &mut notifier,
/// ))
/// .unwrap();
///
/// assert_eq!(report.outcome, Outcome::SpacingsUpdated);
/// assert_eq!(doc.children[0].padding(), Some(&Padding::uniform(24.0)));
/// ```
pub async fn rescale_selection<L: FontLoader, N: Notifier>(
    document: &mut Document,
    loader: &L,
    notifier: &mut N,
) -> Result<RescaleReport, RescaleError> {
    Rescaler::new(loader, RescaleOptions::default())
        .run(document, notifier)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_default() {
        let document = Document::default();
        assert!(document.children.is_empty());
        assert!(document.selection.is_empty());
    }

    #[test]
    fn test_default_tables() {
        assert_eq!(scale(20.0, &ScaleTable::padding()), 14.0);
        assert_eq!(scale(257.0, &ScaleTable::font()), 64.0);
    }
}
