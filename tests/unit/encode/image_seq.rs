use std::io::BufReader;

use image::AnimationDecoder;
use image::codecs::gif::GifDecoder;

use super::*;
use crate::foundation::core::Fps;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "spritemotion_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn cfg(w: u32, h: u32) -> SinkConfig {
    SinkConfig {
        width: w,
        height: h,
        fps: Fps::whole(10).unwrap(),
    }
}

fn solid(w: u32, h: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
        premultiplied: true,
    }
}

#[test]
fn gif_sink_writes_all_frames_on_end() {
    let dir = temp_dir("gif_sink");
    let out = dir.join("anim.gif");
    let mut sink = GifSink::new(&out);

    sink.begin(cfg(4, 4)).unwrap();
    sink.push_frame(FrameIndex(0), &solid(4, 4, [255, 0, 0, 255]))
        .unwrap();
    sink.push_frame(FrameIndex(1), &solid(4, 4, [0, 0, 255, 255]))
        .unwrap();
    sink.push_frame(FrameIndex(2), &solid(4, 4, [0, 255, 0, 255]))
        .unwrap();
    assert!(!out.exists());
    sink.end().unwrap();

    let f = std::fs::File::open(&out).unwrap();
    let frames = GifDecoder::new(BufReader::new(f))
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].buffer().dimensions(), (4, 4));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn png_sequence_names_frames_by_index() {
    let dir = temp_dir("png_seq");
    let out = dir.join("shot.png");
    let mut sink = PngSequenceSink::new(&out);

    sink.begin(cfg(2, 1)).unwrap();
    sink.push_frame(FrameIndex(0), &solid(2, 1, [10, 20, 30, 255]))
        .unwrap();
    sink.push_frame(FrameIndex(1), &solid(2, 1, [40, 50, 60, 255]))
        .unwrap();
    sink.end().unwrap();

    assert_eq!(sink.frame_path(1), dir.join("shot_00001.png"));
    let second = image::open(dir.join("shot_00001.png")).unwrap().to_rgba8();
    assert_eq!(second.get_pixel(1, 0).0, [40, 50, 60, 255]);
    assert!(dir.join("shot_00000.png").is_file());
    assert!(!dir.join("shot_00002.png").exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn rejects_out_of_order_and_mismatched_frames() {
    let mut sink = GifSink::new(temp_dir("gif_reject").join("x.gif"));
    assert!(
        sink.push_frame(FrameIndex(0), &solid(1, 1, [0, 0, 0, 255]))
            .is_err()
    );

    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(3), &solid(2, 2, [0, 0, 0, 255]))
        .unwrap();
    assert!(
        sink.push_frame(FrameIndex(3), &solid(2, 2, [0, 0, 0, 255]))
            .is_err()
    );
    assert!(
        sink.push_frame(FrameIndex(4), &solid(3, 2, [0, 0, 0, 255]))
            .is_err()
    );
}

#[test]
fn end_without_begin_writes_nothing() {
    let dir = temp_dir("gif_unstarted");
    let out = dir.join("x.gif");
    let mut sink = GifSink::new(&out);
    assert!(sink.end().is_err());
    assert!(!out.exists());
}

#[test]
fn png_sequence_removes_stills_from_a_longer_run() {
    let dir = temp_dir("png_stale");
    let out = dir.join("shot.png");

    let mut long = PngSequenceSink::new(&out);
    long.begin(cfg(1, 1)).unwrap();
    for k in 0..4 {
        long.push_frame(FrameIndex(k), &solid(1, 1, [0, 0, 0, 255]))
            .unwrap();
    }
    long.end().unwrap();
    assert!(dir.join("shot_00003.png").is_file());

    let mut short = PngSequenceSink::new(&out);
    short.begin(cfg(1, 1)).unwrap();
    for k in 0..2 {
        short
            .push_frame(FrameIndex(k), &solid(1, 1, [9, 9, 9, 255]))
            .unwrap();
    }
    short.end().unwrap();

    assert!(dir.join("shot_00001.png").is_file());
    assert!(!dir.join("shot_00002.png").exists());
    assert!(!dir.join("shot_00003.png").exists());
    let first = image::open(dir.join("shot_00000.png")).unwrap().to_rgba8();
    assert_eq!(first.get_pixel(0, 0).0, [9, 9, 9, 255]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn png_sequence_rolls_back_when_a_still_cannot_be_placed() {
    let dir = temp_dir("png_rollback");
    let out = dir.join("shot.png");
    // A non-empty directory squatting on the second still's name blocks its rename.
    let blocker = dir.join("shot_00001.png");
    std::fs::create_dir_all(&blocker).unwrap();
    std::fs::write(blocker.join("keep"), b"x").unwrap();

    let mut sink = PngSequenceSink::new(&out);
    sink.begin(cfg(1, 1)).unwrap();
    for k in 0..3 {
        sink.push_frame(FrameIndex(k), &solid(1, 1, [0, 0, 0, 255]))
            .unwrap();
    }
    assert!(sink.end().is_err());

    let mut names: Vec<String> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["shot_00001.png".to_owned()]);

    std::fs::remove_dir_all(&dir).ok();
}
