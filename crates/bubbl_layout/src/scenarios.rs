//! End-to-end behaviour of the animators, frame by frame

use bubbl_animation::{AnimatedValue, AnimationConfig, Easing};
use bubbl_core::{noop_observer, Rect, Size};

use crate::bubble::{corner_radii, BottomLineWidth, BubbleGeometryEngine, LineEndpoint};
use crate::item::test_support::{block, Block};
use crate::item::ListItem;
use crate::layout::ListLayout;
use crate::layout::{FlowLayout, FlowSpacing, VerticalLayout};
use crate::list_animator::{ListDiffAnimator, ResetEvent};
use crate::mosaic::{MosaicConfig, MosaicLayout, MosaicPacker};
use crate::reactions::{ChipContent, ChipMetrics, MonospaceMeasurer, ReactionFlowLayout, ReactionSnapshot};

const FRAME_MS: f32 = 16.0;

fn linear() -> AnimationConfig {
    AnimationConfig {
        duration_ms: 160.0,
        easing: Easing::Linear,
    }
}

fn vertical() -> ListDiffAnimator<Block> {
    ListDiffAnimator::new(VerticalLayout, noop_observer(), &linear())
}

fn max_right<T: ListItem, L: ListLayout>(list: &ListDiffAnimator<T, L>) -> f32 {
    list.entries().map(|e| e.rect().right()).fold(0.0, f32::max)
}

#[test]
fn test_persisting_items_never_reenter() {
    let mut list = vertical();
    list.reset(vec![block("a", 10.0, 10.0), block("b", 20.0, 10.0), block("c", 30.0, 10.0)], false)
        .unwrap();
    let mut events = Vec::new();
    list.reset_with(
        vec![block("c", 30.0, 10.0), block("d", 5.0, 5.0), block("a", 10.0, 10.0)],
        true,
        |item, event| events.push((item.id, event)),
    )
    .unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.contains(&("b", ResetEvent::Removed)));
    assert!(events.contains(&("d", ResetEvent::Added { returned: false })));

    while list.tick(FRAME_MS) {
        for entry in list.entries() {
            if entry.item().id == "a" || entry.item().id == "c" {
                assert!(!entry.is_removing());
                assert_eq!(entry.visibility(), 1.0);
            }
        }
    }
    let ids: Vec<_> = list.entries().map(|e| e.item().id).collect();
    assert_eq!(ids, vec!["c", "d", "a"]);
}

#[test]
fn test_settled_width_matches_entries() {
    let mut list = vertical();
    let steps: Vec<Vec<Block>> = vec![
        vec![block("a", 120.0, 10.0), block("b", 80.0, 10.0)],
        vec![block("b", 80.0, 10.0)],
        vec![block("c", 200.0, 40.0), block("b", 90.0, 10.0)],
        vec![],
        vec![block("a", 33.0, 3.0)],
    ];
    for items in steps {
        list.reset(items, true).unwrap();
        while list.tick(FRAME_MS) {}
        assert!(!list.is_animating());
        assert_eq!(list.metadata().total_width(), max_right(&list));
    }

    let mut flow: ListDiffAnimator<Block, FlowLayout> =
        ListDiffAnimator::new(FlowLayout::new(FlowSpacing::default(), 100.0), noop_observer(), &linear());
    flow.reset(vec![block("a", 40.0, 20.0), block("b", 70.0, 20.0), block("c", 20.0, 20.0)], true)
        .unwrap();
    while flow.tick(FRAME_MS) {}
    assert_eq!(flow.metadata().total_width(), max_right(&flow));
}

#[test]
fn test_values_land_exactly_on_target() {
    let mut value = AnimatedValue::new(0.1_f32);
    value.set_to(0.3);
    value.prepare();
    value.apply(0.77);
    value.apply(1.0);
    assert_eq!(value.get(), 0.3);

    let mut list = vertical();
    list.reset(vec![block("a", 10.1, 10.3)], false).unwrap();
    list.reset(vec![block("b", 7.7, 3.3), block("a", 10.1, 10.3)], true)
        .unwrap();
    list.tick(FRAME_MS * 3.0);
    list.apply_animation(1.0);
    let a = list.entries().find(|e| e.item().id == "a").unwrap();
    assert_eq!(a.rect(), Rect::new(0.0, 3.3, 10.1, 10.3));
    assert_eq!(list.metadata().total_height(), 3.3 + 10.3);
}

#[test]
fn test_bottom_line_crossfade_boundaries() {
    let engine = BubbleGeometryEngine::default();
    let endpoints = [
        BottomLineWidth::Expand,
        BottomLineWidth::Keep(0.0),
        BottomLineWidth::Keep(77.7),
        BottomLineWidth::Animated(12.5),
    ];
    for from in endpoints {
        for to in endpoints {
            let a = LineEndpoint {
                line: from,
                content_width: 210.0,
            };
            let b = LineEndpoint {
                line: to,
                content_width: 180.0,
            };
            assert_eq!(engine.resolve_crossfade(a, b, 0.0, 48.0), from);
            assert_eq!(engine.resolve_crossfade(a, b, 1.0, 48.0), to);
        }
    }
}

#[test]
fn test_merged_corners_are_zero() {
    for radius in [0.0, 6.0, 18.0] {
        for above in [false, true] {
            for below in [false, true] {
                let r = corner_radii(above, below, radius);
                assert_eq!(r.top_left == 0.0 && r.top_right == 0.0, above || radius == 0.0);
                assert_eq!(r.bottom_left == 0.0 && r.bottom_right == 0.0, below || radius == 0.0);
            }
        }
    }
}

#[test]
fn test_mosaic_coverage() {
    let config = MosaicConfig::default();
    let albums: Vec<Vec<Size>> = vec![
        vec![Size::new(1.0, 1.0), Size::new(4.0, 3.0)],
        vec![Size::new(3.0, 4.0), Size::new(16.0, 9.0), Size::new(1.0, 1.0)],
        vec![Size::new(16.0, 9.0); 5],
        vec![Size::new(9.0, 16.0); 7],
        vec![
            Size::new(1.0, 1.0),
            Size::new(2.0, 1.0),
            Size::new(1.0, 2.0),
            Size::new(3.0, 2.0),
            Size::new(2.0, 3.0),
            Size::new(1.0, 1.0),
            Size::new(5.0, 4.0),
            Size::new(4.0, 5.0),
            Size::new(1.0, 1.0),
            Size::new(16.0, 9.0),
        ],
    ];
    let width = 320.0;
    for sizes in albums {
        let mosaic = MosaicPacker::new(config).pack(&sizes, width, f32::INFINITY);
        let area: f32 = mosaic.cells.iter().map(|c| c.rect.size.area()).sum();

        let mut gap_area = config.spacing * width * (mosaic.rows.len() - 1) as f32;
        let mut start = 0;
        for &count in &mosaic.rows {
            let row_height = mosaic.cells[start].rect.height();
            gap_area += config.spacing * (count - 1) as f32 * row_height;
            start += count;
        }
        assert!(area + gap_area <= width * mosaic.size.height + 0.5);

        for cell in &mosaic.cells {
            assert!(cell.rect.right() <= width + 1e-3);
            if cell.edges.right {
                continue;
            }
            let intrinsic = sizes[cell.index].aspect_ratio().unwrap();
            let clamped = intrinsic.clamp(config.min_item_ratio, config.max_item_ratio);
            let packed = cell.rect.width() / cell.rect.height();
            assert!((packed - clamped).abs() < 1e-3);
        }
    }
}

#[test]
fn test_removing_middle_item_closes_gap_smoothly() {
    let mut list = vertical();
    list.reset(
        vec![block("a", 100.0, 20.0), block("b", 100.0, 20.0), block("c", 100.0, 20.0)],
        false,
    )
    .unwrap();
    assert_eq!(list.metadata().total_height(), 60.0);

    list.reset(vec![block("a", 100.0, 20.0), block("c", 100.0, 20.0)], true)
        .unwrap();

    let b_visibility = |list: &ListDiffAnimator<Block>| {
        list.entries()
            .find(|e| e.item().id == "b")
            .map(|e| e.visibility())
    };
    let c_y = |list: &ListDiffAnimator<Block>| {
        list.entries()
            .find(|e| e.item().id == "c")
            .map(|e| e.rect().y())
            .unwrap()
    };

    let mut last_visibility = b_visibility(&list).unwrap();
    let mut last_y = c_y(&list);
    assert_eq!(last_visibility, 1.0);
    assert_eq!(last_y, 40.0);

    let max_step = 20.0 * FRAME_MS / linear().duration_ms + 1e-3;
    while list.tick(FRAME_MS) {
        let a = list.entries().find(|e| e.item().id == "a").unwrap();
        assert_eq!(a.rect().y(), 0.0);

        match b_visibility(&list) {
            Some(v) => {
                assert!(v < last_visibility, "b must fade out every frame");
                last_visibility = v;
            }
            None => assert!(!list.is_animating()),
        }
        let y = c_y(&list);
        assert!(y <= last_y);
        assert!(last_y - y <= max_step, "c jumped from {last_y} to {y}");
        last_y = y;
    }

    assert_eq!(b_visibility(&list), None);
    assert_eq!(last_y, 20.0);
    assert_eq!(list.metadata().total_height(), 40.0);
}

#[test]
fn test_reaction_added_while_counter_grows() {
    let mut flow = ReactionFlowLayout::new(
        noop_observer(),
        ChipMetrics::default(),
        &linear(),
        Box::new(MonospaceMeasurer::default()),
    );
    flow.set_max_width(300.0, false);

    let thumbs = ReactionSnapshot::new("👍", 3).with_senders([1, 2, 3]);
    flow.set_reactions(&[thumbs], false).unwrap();
    let before = flow.get("👍").unwrap().width();
    assert!(matches!(flow.get("👍").unwrap().content(), ChipContent::Avatars(_)));

    let next = [
        ReactionSnapshot::new("👍", 4).with_senders([1, 2, 3]),
        ReactionSnapshot::new("❤️", 1),
    ];
    flow.set_reactions(&next, true).unwrap();
    let after = flow.get("👍").unwrap().width();
    assert_ne!(before, after);

    let heart = flow.entries().find(|e| e.item().key() == "❤️").unwrap();
    assert_eq!(heart.visibility(), 0.0);
    let thumbs = flow.entries().find(|e| e.item().key() == "👍").unwrap();
    assert_eq!(thumbs.rect().width(), before);
    assert_eq!(thumbs.target_rect().width(), after);

    let mut last_heart = 0.0;
    while flow.tick(FRAME_MS) {
        assert_eq!(flow.entries().count(), 2);
        let thumbs = flow.entries().find(|e| e.item().key() == "👍").unwrap();
        assert!(!thumbs.is_removing());
        assert_eq!(thumbs.visibility(), 1.0);
        let heart = flow.entries().find(|e| e.item().key() == "❤️").unwrap();
        assert!(heart.visibility() > last_heart);
        last_heart = heart.visibility();
    }
    assert_eq!(last_heart, 1.0);
    let thumbs = flow.entries().find(|e| e.item().key() == "👍").unwrap();
    assert_eq!(thumbs.rect().width(), after);
}

#[test]
fn test_four_photo_album_rows() {
    let mut album: ListDiffAnimator<Block, MosaicLayout> = ListDiffAnimator::new(
        MosaicLayout::new(MosaicConfig::default(), 300.0, f32::INFINITY),
        noop_observer(),
        &linear(),
    );
    album
        .reset(
            vec![
                block("sq1", 1080.0, 1080.0),
                block("sq2", 1080.0, 1080.0),
                block("wide", 1920.0, 1080.0),
                block("tall", 1080.0, 1920.0),
            ],
            false,
        )
        .unwrap();

    let rect = |id: &str| {
        album
            .entries()
            .find(|e| e.item().id == id)
            .map(|e| e.rect())
            .unwrap()
    };
    let (sq1, sq2, wide, tall) = (rect("sq1"), rect("sq2"), rect("wide"), rect("tall"));

    assert_eq!(sq1.y(), sq2.y());
    assert!(sq1.x() < sq2.x());
    assert_eq!(wide.y(), tall.y());
    assert!(wide.x() < tall.x());
    assert!(wide.y() >= sq1.bottom());
    for r in [sq1, sq2, wide, tall] {
        assert!(r.right() <= 300.0 + 1e-3);
    }
    assert_eq!(album.metadata().total_width(), max_right(&album));
}
