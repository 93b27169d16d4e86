use std::sync::Arc;

use super::*;
use crate::animation::instruction::Instruction;
use crate::assets::store::PreparedImage;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Vec2;
use crate::scene::dsl::SceneBuilder;

const RED: [u8; 4] = [255, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

fn opts(w: u32, h: u32, fps: u32) -> RenderOpts {
    RenderOpts {
        canvas: Canvas::new(w, h).unwrap(),
        fps: Fps::whole(fps).unwrap(),
        bg_rgba: WHITE,
        duration: None,
    }
}

fn mover() -> Scene {
    let img = Arc::new(PreparedImage::solid(10, 10, RED));
    SceneBuilder::new()
        .sprite("hero", img, Vec2::ZERO)
        .unwrap()
        .instruction("hero", Instruction::entry(0.0, Vec2::ZERO).unwrap())
        .unwrap()
        .instruction(
            "hero",
            Instruction::move_between(0.0, 1.0, Vec2::ZERO, Vec2::new(100.0, 0.0)).unwrap(),
        )
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn frame_count_includes_boundary_sample() {
    let fps30 = Fps::whole(30).unwrap();
    assert_eq!(frame_count(2.0, fps30), 61);
    assert_eq!(frame_count(0.0, fps30), 1);
    assert_eq!(frame_count(1.0, Fps::whole(1).unwrap()), 2);
    assert_eq!(frame_count(0.1, Fps::whole(10).unwrap()), 2);
    assert_eq!(frame_count(0.7, Fps::whole(10).unwrap()), 8);
    assert_eq!(frame_count(1.05, fps30), 32);
}

#[test]
fn frame_count_matches_floor_formula() {
    for fps in [1u32, 12, 24, 25, 30, 60] {
        let f = Fps::whole(fps).unwrap();
        for tenth in 0..=50 {
            let d = f64::from(tenth) / 10.0;
            let expected = (d * f64::from(fps) + SAMPLE_EPSILON).floor() as u64 + 1;
            assert_eq!(frame_count(d, f), expected, "d={d} fps={fps}");
        }
    }
}

#[test]
fn render_yields_exact_count_lazily() {
    let mut scene = mover();
    let mut o = opts(200, 20, 30);
    o.duration = Some(2.0);
    let frames = render(&mut scene, &o).unwrap();
    assert_eq!(frames.total(), 61);
    assert_eq!(frames.len(), 61);
    let idx: Vec<u64> = frames.map(|(i, _)| i.0).collect();
    assert_eq!(idx.first(), Some(&0));
    assert_eq!(idx.last(), Some(&60));
}

#[test]
fn one_second_move_at_one_fps_gives_two_frames() {
    let mut scene = mover();
    let frames: Vec<_> = render(&mut scene, &opts(200, 20, 1)).unwrap().collect();
    assert_eq!(frames.len(), 2);

    let f0 = &frames[0].1;
    assert_eq!(f0.pixel_straight(0, 0), Some(RED));
    assert_eq!(f0.pixel_straight(9, 9), Some(RED));
    assert_eq!(f0.pixel_straight(10, 0), Some(WHITE));
    assert_eq!(f0.pixel_straight(100, 0), Some(WHITE));

    let f1 = &frames[1].1;
    assert_eq!(f1.pixel_straight(99, 0), Some(WHITE));
    assert_eq!(f1.pixel_straight(100, 0), Some(RED));
    assert_eq!(f1.pixel_straight(109, 9), Some(RED));
    assert_eq!(f1.pixel_straight(0, 0), Some(WHITE));

    assert_eq!(
        scene.sprite("hero").unwrap().state().position(),
        Vec2::new(100.0, 0.0)
    );
}

#[test]
fn repeated_renders_are_identical() {
    let mut scene = mover();
    let o = opts(120, 12, 10);
    let a: Vec<_> = render(&mut scene, &o).unwrap().collect();
    let b: Vec<_> = render(&mut scene, &o).unwrap().collect();
    assert_eq!(a, b);
}

#[test]
fn duration_override_wins_over_scene_duration() {
    let mut scene = mover();
    assert_eq!(scene.total_duration(), 1.0);
    let mut o = opts(8, 8, 10);
    o.duration = Some(0.25);
    assert_eq!(render(&mut scene, &o).unwrap().total(), 3);
}

#[test]
fn invalid_opts_are_export_errors() {
    let mut scene = mover();
    let mut o = opts(8, 8, 10);
    o.duration = Some(-1.0);
    assert!(matches!(
        render(&mut scene, &o).err(),
        Some(MotionError::Export(_))
    ));

    let mut o = opts(8, 8, 10);
    o.fps = Fps { num: 0, den: 1 };
    assert!(render(&mut scene, &o).is_err());

    let mut o = opts(8, 8, 10);
    o.canvas.width = 0;
    assert!(render(&mut scene, &o).is_err());
}

#[test]
fn export_streams_every_frame_into_sink() {
    let mut scene = mover();
    let mut sink = InMemorySink::new();
    let stats = export(&mut scene, &opts(200, 20, 4), &mut sink).unwrap();

    assert_eq!(stats.frames, 5);
    assert_eq!(stats.duration_secs, 1.0);
    assert!(sink.is_finished());
    assert_eq!(sink.frames().len(), 5);
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.fps.num), (200, 20, 4));
    // t = 0.5 -> x = 50
    assert_eq!(sink.frames()[2].1.pixel_straight(50, 0), Some(RED));
    assert_eq!(sink.frames()[2].1.pixel_straight(49, 0), Some(WHITE));
}

#[test]
fn render_frame_at_matches_exported_frame() {
    let mut scene = mover();
    let o = opts(200, 20, 4);
    let all: Vec<_> = render(&mut scene, &o).unwrap().collect();
    let single = render_frame_at(&mut scene, &o, 0.75).unwrap();
    assert_eq!(single, all[3].1);
    assert!(render_frame_at(&mut scene, &o, -1.0).is_err());
}

#[test]
fn frozen_values_survive_past_the_window() {
    let img = Arc::new(PreparedImage::solid(1, 1, RED));
    let mut scene = SceneBuilder::new()
        .sprite("s", img, Vec2::ZERO)
        .unwrap()
        .instruction("s", Instruction::entry(0.0, Vec2::ZERO).unwrap())
        .unwrap()
        .instruction("s", Instruction::fade(0.0, 1.0, 255, 0).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let mut o = opts(2, 2, 3);
    o.duration = Some(3.0);

    let mut frames = render(&mut scene, &o).unwrap();
    let _ = frames.by_ref().take(4).count();
    let rest: Vec<_> = frames.collect();
    assert_eq!(rest.len(), 6);
    for (_, f) in rest {
        assert_eq!(f.pixel_straight(0, 0), Some(WHITE));
    }
    assert_eq!(scene.sprite("s").unwrap().state().opacity(), 0);
}

#[test]
fn empty_scene_renders_background_only() {
    let mut scene = SceneBuilder::new().build().unwrap();
    let frames: Vec<_> = render(&mut scene, &opts(3, 3, 30)).unwrap().collect();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].1.pixel_straight(2, 2), Some(WHITE));
}

#[test]
fn far_off_canvas_move_renders_background() {
    let img = Arc::new(PreparedImage::solid(2, 2, RED));
    let mut scene = SceneBuilder::new()
        .sprite("far", img, Vec2::ZERO)
        .unwrap()
        .instruction("far", Instruction::entry(0.0, Vec2::ZERO).unwrap())
        .unwrap()
        .instruction(
            "far",
            Instruction::move_between(0.0, 1.0, Vec2::ZERO, Vec2::new(1e30, -1e30)).unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();

    let frames: Vec<_> = render(&mut scene, &opts(4, 4, 1)).unwrap().collect();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].1.pixel_straight(0, 0), Some(RED));
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(frames[1].1.pixel_straight(x, y), Some(WHITE));
        }
    }
}

#[test]
fn frame_count_saturates_for_huge_durations() {
    let fps30 = Fps::whole(30).unwrap();
    assert_eq!(frame_count(1e30, fps30), u64::MAX);
    assert_eq!(frame_count(f64::MAX, fps30), u64::MAX);
    assert_eq!(frame_count(f64::INFINITY, fps30), u64::MAX);
}

#[test]
fn oversized_passes_are_export_errors() {
    let mut scene = mover();
    let mut o = opts(8, 8, 30);
    o.duration = Some(1e30);
    assert!(matches!(
        render(&mut scene, &o).err(),
        Some(MotionError::Export(_))
    ));
    assert!(matches!(o.frames_for(&scene), Err(MotionError::Export(_))));

    let limit_secs = (MAX_FRAMES as f64) / 30.0;
    o.duration = Some(limit_secs + 1.0);
    assert!(render(&mut scene, &o).is_err());
    o.duration = Some(2.0);
    assert_eq!(o.frames_for(&scene).unwrap(), 61);

    let o = opts(8, 8, 30);
    assert!(matches!(
        render_frame_at(&mut scene, &o, 1e30),
        Err(MotionError::Export(_))
    ));
}

#[test]
fn oversized_scene_duration_is_rejected_before_sampling() {
    let img = Arc::new(PreparedImage::solid(1, 1, RED));
    let mut scene = SceneBuilder::new()
        .sprite("s", img, Vec2::ZERO)
        .unwrap()
        .instruction("s", Instruction::exit(1e30).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let mut sink = InMemorySink::new();
    assert!(export(&mut scene, &opts(2, 2, 30), &mut sink).is_err());
    assert!(sink.config().is_none());
}
