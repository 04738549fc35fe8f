use super::*;
use crate::assets::library::MediaType;

fn media_node(start: f64, end: f64, trim_start: f64) -> MediaNode {
    MediaNode {
        element_id: "e".to_owned(),
        asset: MediaAsset::new("m", "clip", MediaType::Video),
        window: TimeWindow { start, end },
        trim_start,
    }
}

#[test]
fn window_is_half_open() {
    let w = TimeWindow {
        start: 1.0,
        end: 2.0,
    };
    assert!(!w.contains(0.99));
    assert!(w.contains(1.0));
    assert!(w.contains(1.5));
    assert!(!w.contains(2.0));
}

#[test]
fn source_time_offsets_by_trim() {
    let node = media_node(2.0, 6.0, 1.5);
    assert_eq!(node.source_time(2.0), 1.5);
    assert_eq!(node.source_time(3.0), 2.5);
}

#[test]
fn visible_at_filters_content() {
    let tree = RenderTree {
        children: vec![
            SceneNode::BlurBackground(BlurBackgroundNode {
                blur_intensity: 4.0,
                content: vec![ContentNode::Video(media_node(0.0, 10.0, 0.0))],
            }),
            SceneNode::Content(ContentNode::Video(media_node(0.0, 1.0, 0.0))),
            SceneNode::Content(ContentNode::Image(media_node(1.0, 2.0, 0.0))),
        ],
        ..RenderTree::empty(Canvas::new(10, 10).unwrap())
    };
    assert_eq!(tree.content().count(), 2);
    let visible: Vec<_> = tree.visible_at(1.5).collect();
    assert_eq!(visible.len(), 1);
    assert!(matches!(visible[0], ContentNode::Image(_)));
}
