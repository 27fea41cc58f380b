//! Tree mutation passes.
//!
//! Pass A rewrites the scalable properties of every node through a
//! [`ScaleLookup`] that is complete before the first write. Pass B rescales
//! text nodes directly through the font table, each node only after all of
//! its fonts have loaded.

use crate::collect::ScaleLookup;
use crate::host::{FontLoadError, FontLoader};
use crate::scale::{scale, ScaleTable};
use crate::types::{LineHeight, Node, NodeKind, ScalableProperty, TextNode};
use futures::future;

/// Counts from the spacing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpacingPass {
    /// Distinct values in the lookup
    pub distinct_values: usize,
    /// Properties written with their looked-up value
    pub rewritten: usize,
    /// Properties left unchanged because the lookup had no entry
    pub unmatched: usize,
}

/// Counts from the text pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPass {
    /// Text nodes whose size and line height were written
    pub rescaled: usize,
    /// Font loads awaited across all nodes
    pub fonts_loaded: usize,
    /// One entry per text node whose fonts failed to load
    pub failures: Vec<FontLoadError>,
}

/// Collects `root`'s values, builds the lookup, then rewrites every property.
pub fn apply_spacing(root: &mut Node, table: &ScaleTable) -> SpacingPass {
    let lookup = ScaleLookup::for_tree(root, table);
    let mut pass = apply_lookup(root, &lookup);
    pass.distinct_values = lookup.len();
    pass
}

/// Rewrites every scalable property in the subtree through `lookup`.
///
/// A value missing from the lookup is left as it is and logged.
pub fn apply_lookup(root: &mut Node, lookup: &ScaleLookup) -> SpacingPass {
    let mut pass = SpacingPass::default();
    let mut pending: Vec<&mut Node> = vec![root];
    while let Some(node) = pending.pop() {
        let id = node.id;
        for property in ScalableProperty::ALL {
            let Some(slot) = node.scalable_mut(property) else {
                continue;
            };
            match lookup.get(*slot) {
                Some(new_value) => {
                    *slot = new_value;
                    pass.rewritten += 1;
                }
                None => {
                    log::warn!(
                        "No scaled value for {} = {} on node {id}, leaving it unchanged",
                        property.name(),
                        slot
                    );
                    pass.unmatched += 1;
                }
            }
        }
        pending.extend(node.children_mut().iter_mut());
    }
    pass
}

/// Rescales one text node's font size and pixel line height.
///
/// With `reset_line_heights` the line height always ends up auto.
pub fn rescale_text(text: &mut TextNode, table: &ScaleTable, reset_line_heights: bool) {
    text.font_size = scale(text.font_size, table);
    if let LineHeight::Pixels { value } = text.line_height {
        text.line_height = LineHeight::Pixels {
            value: scale(value, table),
        };
    }
    if reset_line_heights {
        text.line_height = LineHeight::Auto;
    }
}

/// Text nodes below `root`, in document order. `root` itself is not included.
pub fn text_nodes_mut(root: &mut Node) -> Vec<&mut TextNode> {
    let mut texts = Vec::new();
    gather_text(root.children_mut(), &mut texts);
    texts
}

fn gather_text<'a>(nodes: &'a mut [Node], texts: &mut Vec<&'a mut TextNode>) {
    for node in nodes {
        if matches!(node.kind, NodeKind::Text(_)) {
            texts.extend(node.as_text_mut());
        } else {
            gather_text(node.children_mut(), texts);
        }
    }
}

/// Loads a node's fonts, then rescales it. Returns how many fonts were loaded.
async fn rescale_text_unit<L: FontLoader>(
    text: &mut TextNode,
    loader: &L,
    table: &ScaleTable,
    reset_line_heights: bool,
) -> Result<usize, FontLoadError> {
    let fonts = text.fonts();
    future::try_join_all(fonts.iter().map(|font| loader.load_font(font))).await?;
    rescale_text(text, table, reset_line_heights);
    Ok(fonts.len())
}

/// Runs every text node's unit concurrently and waits for all of them.
///
/// Units are independent: a failure leaves only that node untouched.
pub async fn rescale_text_nodes<L: FontLoader>(
    texts: Vec<&mut TextNode>,
    loader: &L,
    table: &ScaleTable,
    reset_line_heights: bool,
) -> TextPass {
    let units = texts
        .into_iter()
        .map(|text| rescale_text_unit(text, loader, table, reset_line_heights));
    let results = future::join_all(units).await;

    let mut pass = TextPass::default();
    for result in results {
        match result {
            Ok(fonts) => {
                pass.rescaled += 1;
                pass.fonts_loaded += fonts;
            }
            Err(err) => {
                log::error!("Skipping text node: {err}");
                pass.failures.push(err);
            }
        }
    }
    pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Container, FontName, Group, Padding};
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// Loader that accepts everything except the listed families.
    #[derive(Default)]
    struct StubLoader {
        missing: HashSet<String>,
        requests: RefCell<Vec<FontName>>,
    }

    impl FontLoader for StubLoader {
        fn load_font(
            &self,
            font: &FontName,
        ) -> impl std::future::Future<Output = Result<(), FontLoadError>> {
            self.requests.borrow_mut().push(font.clone());
            let result = if self.missing.contains(&font.family) {
                Err(FontLoadError::Unavailable(font.clone()))
            } else {
                Ok(())
            };
            future::ready(result)
        }
    }

    fn text(size: f64, line_height: LineHeight) -> TextNode {
        TextNode::new("Sample", size, line_height)
    }

    #[test]
    fn test_apply_spacing_rewrites_root_and_descendants() {
        let child = Node::frame(
            "Child",
            Container::new().with_padding(Padding {
                padding_left: Some(20.0),
                ..Padding::default()
            }),
        );
        let mut root = Node::frame(
            "Root",
            Container::new()
                .with_padding(Padding::uniform(32.0))
                .with_item_spacing(12.0)
                .with_child(child),
        );

        let pass = apply_spacing(&mut root, &ScaleTable::padding());

        assert_eq!(pass.distinct_values, 3);
        assert_eq!(pass.rewritten, 6);
        assert_eq!(pass.unmatched, 0);
        assert_eq!(root.padding(), Some(&Padding::uniform(24.0)));
        assert_eq!(root.scalable(ScalableProperty::ItemSpacing), Some(12.0));
        assert_eq!(
            root.children()[0].scalable(ScalableProperty::PaddingLeft),
            Some(14.0)
        );
    }

    #[test]
    fn test_values_are_not_remapped_twice() {
        // 32 -> 24 and 24 -> 14; a single lookup must not chain them
        let mut root = Node::frame(
            "Root",
            Container::new()
                .with_padding(Padding::sides(32.0, 24.0, 32.0, 24.0)),
        );
        apply_spacing(&mut root, &ScaleTable::padding());
        assert_eq!(root.padding(), Some(&Padding::sides(24.0, 14.0, 24.0, 14.0)));
    }

    #[test]
    fn test_missing_lookup_value_is_left_unchanged() {
        let mut root = Node::frame("Root", Container::new().with_item_spacing(64.0));
        let pass = apply_lookup(&mut root, &ScaleLookup::default());
        assert_eq!(pass.unmatched, 1);
        assert_eq!(pass.rewritten, 0);
        assert_eq!(root.scalable(ScalableProperty::ItemSpacing), Some(64.0));
    }

    #[test]
    fn test_rescale_text_pixels() {
        let mut node = text(40.0, LineHeight::Pixels { value: 40.0 });
        rescale_text(&mut node, &ScaleTable::font(), false);
        assert_eq!(node.font_size, 24.0);
        assert_eq!(node.line_height, LineHeight::Pixels { value: 24.0 });
    }

    #[test]
    fn test_rescale_text_leaves_percent_and_auto() {
        let mut percent = text(32.0, LineHeight::Percent { value: 150.0 });
        rescale_text(&mut percent, &ScaleTable::font(), false);
        assert_eq!(percent.font_size, 28.0);
        assert_eq!(percent.line_height, LineHeight::Percent { value: 150.0 });

        let mut auto = text(12.0, LineHeight::Auto);
        rescale_text(&mut auto, &ScaleTable::font(), false);
        assert_eq!(auto.font_size, 12.0);
        assert_eq!(auto.line_height, LineHeight::Auto);
    }

    #[test]
    fn test_reset_line_heights_overrides_pixels() {
        let mut node = text(64.0, LineHeight::Pixels { value: 72.0 });
        rescale_text(&mut node, &ScaleTable::font(), true);
        assert_eq!(node.font_size, 40.0);
        assert_eq!(node.line_height, LineHeight::Auto);

        let mut percent = text(64.0, LineHeight::Percent { value: 120.0 });
        rescale_text(&mut percent, &ScaleTable::font(), true);
        assert_eq!(percent.line_height, LineHeight::Auto);
    }

    #[test]
    fn test_text_nodes_mut_finds_nested_text_only() {
        let nested = Node::new(
            "Group",
            NodeKind::Group(Group {
                children: vec![Node::text("Deep", text(20.0, LineHeight::Auto))],
            }),
        );
        let mut root = Node::frame(
            "Root",
            Container::new()
                .with_child(Node::text("Top", text(10.0, LineHeight::Auto)))
                .with_child(Node::new("Shape", NodeKind::Shape))
                .with_child(nested),
        );

        let sizes: Vec<f64> = text_nodes_mut(&mut root)
            .into_iter()
            .map(|t| t.font_size)
            .collect();
        assert_eq!(sizes, vec![10.0, 20.0]);
    }

    #[test]
    fn test_rescale_text_nodes_loads_fonts_first() {
        let loader = StubLoader::default();
        let mut a = text(48.0, LineHeight::Pixels { value: 56.0 })
            .with_style(0, 2, FontName::new("Inter", "Bold"));
        let mut b = text(24.0, LineHeight::Auto);

        let pass = block_on(rescale_text_nodes(
            vec![&mut a, &mut b],
            &loader,
            &ScaleTable::font(),
            false,
        ));

        assert_eq!(pass.rescaled, 2);
        assert_eq!(pass.fonts_loaded, 3);
        assert!(pass.failures.is_empty());
        assert_eq!(a.font_size, 36.0);
        assert_eq!(a.line_height, LineHeight::Pixels { value: 30.0 });
        assert_eq!(b.font_size, 14.0);
        assert_eq!(loader.requests.borrow().len(), 3);
    }

    #[test]
    fn test_failed_unit_leaves_its_node_untouched() {
        let loader = StubLoader {
            missing: HashSet::from(["Missing Sans".to_string()]),
            ..StubLoader::default()
        };
        let mut broken = text(48.0, LineHeight::Pixels { value: 48.0 })
            .with_font(FontName::new("Missing Sans", "Regular"));
        let mut fine = text(48.0, LineHeight::Pixels { value: 48.0 });

        let pass = block_on(rescale_text_nodes(
            vec![&mut broken, &mut fine],
            &loader,
            &ScaleTable::font(),
            false,
        ));

        assert_eq!(pass.rescaled, 1);
        assert_eq!(
            pass.failures,
            vec![FontLoadError::Unavailable(FontName::new(
                "Missing Sans",
                "Regular"
            ))]
        );
        assert_eq!(broken.font_size, 48.0);
        assert_eq!(fine.font_size, 36.0);
    }
}
