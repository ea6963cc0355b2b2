//! Scene building: the last, infallible stage of a compile.

use gem_core::scene::SceneNode;

use crate::resolve::{ResolvedElement, ResolvedTree};

fn build_element(element: &ResolvedElement<'_>) -> SceneNode {
    let node = element.node();
    SceneNode::new(element.drawable().clone())
        .with_id(node.id.as_ref().map(|id| id.value()))
        .with_classes(node.classes.clone())
        .with_paint(element.paint())
        .with_children(element.children().iter().map(build_element).collect())
}

/// Turn a resolved tree into the scene graph handed to renderers.
///
/// The scene has the same shape as the document; raw attribute strings and
/// source spans are dropped.
pub fn build(tree: &ResolvedTree<'_>) -> SceneNode {
    build_element(tree.root())
}

#[cfg(test)]
mod tests {
    use gem_core::{color::Shade, scene::Drawable};

    use super::*;
    use crate::{
        parse,
        resolve::{CompileConfig, resolve},
        stylesheet::parse_stylesheet,
    };

    #[test]
    fn test_build_preserves_structure() {
        let document = parse(
            r#"<window><div class="a b"><rect id="r"/>hello</div><circle color="2"/></window>"#,
        )
        .unwrap();
        let stylesheet = parse_stylesheet(".a { background: 1; }").unwrap();
        let config = CompileConfig::default();
        let tree = resolve(&document, &stylesheet, &config).unwrap();

        let scene = build(&tree);
        let kinds: Vec<&str> = scene.iter().map(|node| node.drawable().kind()).collect();
        assert_eq!(kinds, ["window", "div", "rect", "text", "circle"]);

        let div = &scene.children()[0];
        assert_eq!(div.classes().len(), 2);
        assert_eq!(div.paint().background(), Some(Shade::Shade1));
        assert!(scene.find_by_id("r").is_some());
        assert_eq!(scene.children()[1].paint().foreground(), Some(Shade::Shade2));
        assert!(matches!(
            div.children()[1].drawable(),
            Drawable::Text { spans } if spans.len() == 1
        ));
    }
}
