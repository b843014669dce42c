use glam::Vec3;

use kochwave::fractal::{FractalSubdivider, GeneratorProfile, InitiatorPolygon};
use kochwave::params::audio_constants::SPECTRUM_BINS;
use kochwave::params::{Axis, EngineConfig, FractalConfig, Initiator, Keyframe};
use kochwave::sink::{FrameSink, JsonSink, LineVertex, VertexSink};
use kochwave::KochEngine;

const EPSILON: f32 = 1e-5;

fn bump_profile() -> Vec<Keyframe> {
    vec![
        Keyframe::new(0.0, 0.0),
        Keyframe::new(0.5, 0.3),
        Keyframe::new(1.0, 0.0),
    ]
}

#[test]
fn test_triangle_single_pass() {
    let polygon = InitiatorPolygon::new(Initiator::Triangle, Axis::Z, 1.0);
    let corners = polygon.positions();
    let edge_length = polygon.edge_length();
    assert!((edge_length - 3f32.sqrt() / 2.0).abs() < EPSILON);

    let profile = GeneratorProfile::new(bump_profile()).unwrap();
    let subdivider = FractalSubdivider::new(&profile, Axis::Z.rotation_axis(), 2);
    let outline = subdivider.pass(corners, edge_length);

    // 3 edges × (start + 1 interior key) + closing point
    assert_eq!(outline.len(), 7);
    assert_eq!(outline.source[6], outline.source[0]);

    for side in 0..3 {
        let (a, b) = (corners[side], corners[side + 1]);
        let edge = b - a;
        let mid = outline.source[side * 2 + 1];
        let apex = outline.target[side * 2 + 1];

        // Source stays on the original edge
        assert_eq!(outline.source[side * 2], a);
        assert!((mid - (a + b) * 0.5).length() < EPSILON);

        // Target bumps out perpendicular to the edge, in the polygon plane
        let bump = apex - mid;
        assert!((bump.length() - 0.3 * edge_length).abs() < EPSILON);
        assert!(bump.dot(edge).abs() < EPSILON);
        assert!(bump.z.abs() < EPSILON);
        assert!(apex.length() > mid.length());
    }
}

#[test]
fn test_engine_over_silence_then_sound() {
    let config = EngineConfig {
        fractal: FractalConfig {
            profile: bump_profile(),
            generators: vec![0.866],
            ..FractalConfig::default()
        },
        ..EngineConfig::default()
    };
    let mut engine = KochEngine::new(config).unwrap();
    let mut sink = JsonSink::new();
    let silence = [0.0; SPECTRUM_BINS];

    // Silence keeps the outline collapsed and stable
    for _ in 0..5 {
        let frame = engine.tick(1.0 / 60.0, &silence).unwrap();
        assert_eq!(frame.outline.len(), 7);
        for (point, source) in frame.outline.iter().zip(engine.fractal().source()) {
            assert!(point.distance(*source) < EPSILON);
        }
        assert_eq!(frame.amplitude.amplitude, 0.0);
        sink.present(&frame).unwrap();
    }
    assert_eq!(sink.frames()[0].outline, sink.frames()[4].outline);

    // Broadband sound opens every side toward the displaced outline
    let frame = engine.tick(1.0 / 60.0, &[0.02; SPECTRUM_BINS]).unwrap();
    for (point, target) in frame.outline.iter().zip(engine.fractal().target()) {
        assert!(point.distance(*target) < EPSILON);
    }
    assert!(frame.markers.iter().all(|m| m.is_finite()));

    let mut vertices = VertexSink::new();
    vertices.present(&frame).unwrap();
    assert_eq!(vertices.vertices().len(), 7);
    assert_eq!(vertices.vertices()[1].position, frame.outline[1].to_array());
    assert_eq!(vertices.vertices()[1].intensity, frame.emission);
    assert_eq!(vertices.bytes().len(), 7 * std::mem::size_of::<LineVertex>());

    // Sound stops: buffered bands release, outline moves back toward source
    let released = engine.tick(1.0 / 60.0, &silence).unwrap();
    let apex_target = engine.fractal().target()[1];
    let apex_source = engine.fractal().source()[1];
    let open = apex_target.distance(apex_source);
    let now = released.outline[1].distance(apex_source);
    assert!(now < open);
    assert!(now > 0.0);
    assert_ne!(released.outline[1], Vec3::ZERO);
}

#[test]
fn test_release_keeps_outline_between_source_and_target() {
    let mut engine = KochEngine::new(EngineConfig::default()).unwrap();
    let silence = [0.0; SPECTRUM_BINS];

    engine.tick(1.0 / 60.0, &[0.5; SPECTRUM_BINS]).unwrap();
    for _ in 0..30 {
        let frame = engine.tick(1.0 / 60.0, &silence).unwrap();
        let source = engine.fractal().source();
        let target = engine.fractal().target();
        for ((point, s), t) in frame.outline.iter().zip(source).zip(target) {
            let span = s.distance(*t);
            assert!(point.distance(*s) <= span + EPSILON);
            assert!(point.distance(*t) <= span + EPSILON);
        }
    }
}
