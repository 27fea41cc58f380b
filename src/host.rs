//! Host collaborators: font loading and the notification sink.
//!
//! The rescaler never talks to a host directly. It asks a [`FontLoader`] to make
//! fonts available before touching a text node, and reports its outcome through
//! a [`Notifier`], whose `close` ends the invocation.

use crate::types::FontName;
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Failure to make a font available.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FontLoadError {
    /// No installed face matches the font.
    #[error("font \"{0}\" is not available")]
    Unavailable(FontName),
    /// The host reported a failure while loading.
    #[error("font \"{font}\" could not be loaded: {reason}")]
    Failed {
        /// The font being loaded
        font: FontName,
        /// Host-supplied reason
        reason: String,
    },
}

/// Asynchronously ensures fonts can be used.
pub trait FontLoader {
    /// Resolves once `font` is usable, or fails with the reason it isn't.
    fn load_font(&self, font: &FontName) -> impl Future<Output = Result<(), FontLoadError>>;
}

impl<T: FontLoader + ?Sized> FontLoader for &T {
    fn load_font(&self, font: &FontName) -> impl Future<Output = Result<(), FontLoadError>> {
        (**self).load_font(font)
    }
}

/// Fire-and-forget messages plus the terminal close signal.
pub trait Notifier {
    /// Shows a message to the user.
    fn notify(&mut self, message: &str);
    /// Ends the invocation.
    fn close(&mut self);
}

/// Font loader backed by a `fontdb` database.
///
/// A font counts as loaded when the database holds a face of its family; the
/// style name picks the weight and slant used for the query.
pub struct SystemFontLoader {
    db: Database,
    loaded: Mutex<HashSet<FontName>>,
}

impl Default for SystemFontLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemFontLoader {
    /// Creates a loader with an empty database.
    pub fn new() -> Self {
        Self {
            db: Database::new(),
            loaded: Mutex::new(HashSet::new()),
        }
    }

    /// Creates a loader seeded with the fonts installed on this machine.
    pub fn with_system_fonts() -> Self {
        let mut loader = Self::new();
        loader.db.load_system_fonts();
        log::debug!("Loaded {} system font faces", loader.db.len());
        loader
    }

    /// Adds every font file found under `dir`.
    pub fn load_fonts_dir(&mut self, dir: impl AsRef<Path>) {
        let before = self.db.len();
        self.db.load_fonts_dir(dir.as_ref());
        log::debug!(
            "Loaded {} font faces from {}",
            self.db.len() - before,
            dir.as_ref().display()
        );
    }

    /// Number of faces in the database.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Looks `font` up, remembering fonts that were already resolved.
    pub fn resolve(&self, font: &FontName) -> Result<(), FontLoadError> {
        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
        if loaded.contains(font) {
            return Ok(());
        }

        let (weight, style) = parse_style(&font.style);
        let families = [Family::Name(&font.family)];
        let query = Query {
            families: &families,
            weight,
            stretch: Stretch::Normal,
            style,
        };

        let id = self
            .db
            .query(&query)
            .ok_or_else(|| FontLoadError::Unavailable(font.clone()))?;
        if let Some(face) = self.db.face(id) {
            if face.weight != weight || face.style != style {
                log::debug!(
                    "Using {} (weight {}) for {}",
                    face.post_script_name,
                    face.weight.0,
                    font
                );
            }
        }
        loaded.insert(font.clone());
        Ok(())
    }
}

impl FontLoader for SystemFontLoader {
    fn load_font(&self, font: &FontName) -> impl Future<Output = Result<(), FontLoadError>> {
        futures::future::ready(self.resolve(font))
    }
}

/// Maps a host style name such as "Semi Bold Italic" to a weight and slant.
fn parse_style(style: &str) -> (Weight, Style) {
    let normalized: String = style
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_ascii_lowercase();

    let slant = if normalized.contains("italic") {
        Style::Italic
    } else if normalized.contains("oblique") {
        Style::Oblique
    } else {
        Style::Normal
    };

    // Longest names first so "extrabold" isn't read as "bold"
    let weight = [
        ("extralight", Weight::EXTRA_LIGHT),
        ("ultralight", Weight::EXTRA_LIGHT),
        ("extrabold", Weight::EXTRA_BOLD),
        ("ultrabold", Weight::EXTRA_BOLD),
        ("semibold", Weight::SEMIBOLD),
        ("demibold", Weight::SEMIBOLD),
        ("hairline", Weight::THIN),
        ("thin", Weight::THIN),
        ("light", Weight::LIGHT),
        ("medium", Weight::MEDIUM),
        ("black", Weight::BLACK),
        ("heavy", Weight::BLACK),
        ("bold", Weight::BOLD),
    ]
    .into_iter()
    .find(|(name, _)| normalized.contains(name))
    .map_or(Weight::NORMAL, |(_, weight)| weight);

    (weight, slant)
}

/// Notifier that writes messages to stderr and the log.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    messages: Vec<String>,
    closed: bool,
}

impl ConsoleNotifier {
    /// Creates a notifier with no messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages shown so far.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Whether the invocation has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, message: &str) {
        log::info!("{message}");
        eprintln!("{message}");
        self.messages.push(message.to_string());
    }

    fn close(&mut self) {
        log::debug!("Closing after {} notification(s)", self.messages.len());
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_parse_style_names() {
        assert_eq!(parse_style("Regular"), (Weight::NORMAL, Style::Normal));
        assert_eq!(parse_style("Bold"), (Weight::BOLD, Style::Normal));
        assert_eq!(parse_style("Semi Bold Italic"), (Weight::SEMIBOLD, Style::Italic));
        assert_eq!(parse_style("ExtraBold"), (Weight::EXTRA_BOLD, Style::Normal));
        assert_eq!(parse_style("Extra-Light"), (Weight::EXTRA_LIGHT, Style::Normal));
        assert_eq!(parse_style("Light Oblique"), (Weight::LIGHT, Style::Oblique));
        assert_eq!(parse_style("Black"), (Weight::BLACK, Style::Normal));
    }

    #[test]
    fn test_empty_database_reports_unavailable() {
        let loader = SystemFontLoader::new();
        let font = FontName::new("Definitely Not Installed", "Regular");
        let result = block_on(loader.load_font(&font));
        assert_eq!(result, Err(FontLoadError::Unavailable(font)));
    }

    #[test]
    fn test_font_load_error_messages() {
        let font = FontName::new("Inter", "Bold");
        assert_eq!(
            FontLoadError::Unavailable(font.clone()).to_string(),
            "font \"Inter Bold\" is not available"
        );
        assert_eq!(
            FontLoadError::Failed {
                font,
                reason: "timeout".into()
            }
            .to_string(),
            "font \"Inter Bold\" could not be loaded: timeout"
        );
    }

    #[test]
    fn test_console_notifier_records_messages_and_close() {
        let mut notifier = ConsoleNotifier::new();
        notifier.notify("hello");
        assert!(!notifier.is_closed());
        notifier.close();
        assert_eq!(notifier.messages(), ["hello".to_string()]);
        assert!(notifier.is_closed());
    }
}
