//! Built-in sample documents that can be rescaled without an input file.
//!
//! Each sample comes with its root frame already selected.

use crate::types::*;

/// Kinds of built-in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// Auto-layout toolbar with padding and gaps, no text
    Toolbar,
    /// Card with a heading, body copy and a button label
    PricingCard,
    /// Landing page section with nested frames sharing spacing values
    LandingSection,
}

/// Metadata for a single sample.
pub struct SampleInfo {
    /// Stable identifier for the sample
    pub kind: SampleKind,
    /// Name accepted on the command line
    pub slug: &'static str,
    /// Human-friendly display name
    pub name: &'static str,
}

/// Returns all samples with their names.
pub const fn all_samples() -> &'static [SampleInfo] {
    const SAMPLES: &[SampleInfo] = &[
        SampleInfo {
            kind: SampleKind::Toolbar,
            slug: "toolbar",
            name: "Toolbar (spacing only)",
        },
        SampleInfo {
            kind: SampleKind::PricingCard,
            slug: "pricing-card",
            name: "Pricing Card",
        },
        SampleInfo {
            kind: SampleKind::LandingSection,
            slug: "landing-section",
            name: "Landing Section (shared spacing)",
        },
    ];
    SAMPLES
}

/// Looks a sample up by its command-line name.
pub fn find_sample(slug: &str) -> Option<SampleKind> {
    all_samples()
        .iter()
        .find(|info| info.slug == slug)
        .map(|info| info.kind)
}

/// Builds a document for the given sample kind.
pub fn build_sample(kind: SampleKind) -> Document {
    match kind {
        SampleKind::Toolbar => build_toolbar(),
        SampleKind::PricingCard => build_pricing_card(),
        SampleKind::LandingSection => build_landing_section(),
    }
}

fn icon_button(name: &str) -> Node {
    Node::new(
        name,
        NodeKind::Instance(
            Container::new()
                .with_padding(Padding::uniform(12.0))
                .with_child(Node::new("Icon", NodeKind::Shape)),
        ),
    )
}

fn build_toolbar() -> Document {
    let mut doc = Document::new("Toolbar");

    let toolbar = Node::frame(
        "Toolbar",
        Container::new()
            .with_padding(Padding::sides(24.0, 24.0, 20.0, 20.0))
            .with_item_spacing(32.0)
            .with_child(icon_button("Back"))
            .with_child(icon_button("Forward"))
            .with_child(Node::new(
                "Actions",
                NodeKind::Group(Group {
                    children: vec![icon_button("Share"), icon_button("More")],
                }),
            )),
    );
    let id = doc.add_node(toolbar);
    doc.select(id);
    doc
}

fn build_pricing_card() -> Document {
    let mut doc = Document::new("Pricing");

    let heading = TextNode::new("Pro plan", 40.0, LineHeight::Pixels { value: 48.0 })
        .with_font(FontName::new("Inter", "Bold"));
    // Price with a semibold currency sign
    let price = TextNode::new("$29 / month", 64.0, LineHeight::Pixels { value: 72.0 })
        .with_font(FontName::new("Inter", "Regular"))
        .with_style(0, 3, FontName::new("Inter", "Semi Bold"));
    let body = TextNode::new(
        "Everything in Starter, plus unlimited projects.",
        18.0,
        LineHeight::Percent { value: 150.0 },
    );
    let label = TextNode::new("Upgrade", 16.0, LineHeight::Auto)
        .with_font(FontName::new("Inter", "Medium"));

    let button = Node::new(
        "Button",
        NodeKind::Instance(
            Container::new()
                .with_padding(Padding::sides(32.0, 32.0, 16.0, 16.0))
                .with_child(Node::text("Label", label)),
        ),
    );

    let card = Node::frame(
        "Card",
        Container::new()
            .with_padding(Padding::uniform(48.0))
            .with_item_spacing(24.0)
            .with_child(Node::text("Heading", heading))
            .with_child(Node::text("Price", price))
            .with_child(Node::text("Body", body))
            .with_child(button),
    );
    let id = doc.add_node(card);
    doc.select(id);
    doc
}

fn build_landing_section() -> Document {
    let mut doc = Document::new("Landing");

    let feature = |title: &str| {
        Node::new(
            title,
            NodeKind::Component(
                Container::new()
                    .with_padding(Padding::uniform(32.0))
                    .with_item_spacing(16.0)
                    .with_child(Node::text(
                        "Title",
                        TextNode::new(title, 24.0, LineHeight::Pixels { value: 32.0 }),
                    ))
                    .with_child(Node::text(
                        "Copy",
                        TextNode::new("Short supporting copy.", 16.0, LineHeight::Auto),
                    )),
            ),
        )
    };

    let features = Node::frame(
        "Features",
        Container::new()
            .with_item_spacing(32.0)
            .with_grid(80.0)
            .with_child(feature("Fast"))
            .with_child(feature("Secure"))
            .with_child(feature("Simple")),
    );

    let section = Node::frame(
        "Section",
        Container::new()
            .with_padding(Padding::sides(128.0, 128.0, 96.0, 96.0))
            .with_item_spacing(48.0)
            .with_child(Node::text(
                "Headline",
                TextNode::new("Built for teams", 72.0, LineHeight::Pixels { value: 80.0 })
                    .with_font(FontName::new("Inter", "Extra Bold")),
            ))
            .with_child(features),
    );
    let id = doc.add_node(section);
    doc.select(id);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::collect_scalable_values;

    #[test]
    fn test_every_sample_has_a_selected_frame() {
        for info in all_samples() {
            let mut doc = build_sample(info.kind);
            assert!(
                doc.selected_frame_mut().is_some(),
                "{} should select its root frame",
                info.name
            );
        }
    }

    #[test]
    fn test_find_sample_by_slug() {
        assert_eq!(find_sample("pricing-card"), Some(SampleKind::PricingCard));
        assert_eq!(find_sample("unknown"), None);
    }

    #[test]
    fn test_toolbar_values() {
        let mut doc = build_sample(SampleKind::Toolbar);
        let root = doc.selected_frame_mut().unwrap();
        let values: Vec<f64> = collect_scalable_values(root)
            .into_iter()
            .map(|v| v.get())
            .collect();
        assert_eq!(values, vec![12.0, 20.0, 24.0, 32.0]);
    }
}
