// Host-side tests for keyframe sampling, damping and scroll normalization.

use glam::Vec3;
use story_core::*;

fn close(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn close_v(a: Vec3, b: Vec3, eps: f32) -> bool {
    a.distance(b) <= eps
}

#[test]
fn keyframes_hit_first_and_last_exactly() {
    let track = Keyframes::new(CAMERA_POSITION_KEYS).unwrap();
    assert_eq!(track.sample(0.0), CAMERA_POSITION_KEYS[0]);
    assert_eq!(track.sample(1.0), CAMERA_POSITION_KEYS[4]);
    // Out-of-range progress clamps.
    assert_eq!(track.sample(-0.5), CAMERA_POSITION_KEYS[0]);
    assert_eq!(track.sample(3.0), CAMERA_POSITION_KEYS[4]);
}

#[test]
fn keyframes_pass_through_interior_keys() {
    let track = Keyframes::new(CAMERA_TARGET_KEYS).unwrap();
    for (i, key) in CAMERA_TARGET_KEYS.iter().enumerate() {
        let t = i as f32 / 4.0;
        assert!(close_v(track.sample(t), *key, 1e-6), "key {i} at t={t}");
    }
}

#[test]
fn keyframes_are_continuous_across_seams() {
    let track = Keyframes::new(CAMERA_POSITION_KEYS).unwrap();
    for i in 1..4 {
        let seam = i as f32 / 4.0;
        let before = track.sample(seam - 1e-4);
        let after = track.sample(seam + 1e-4);
        assert!(close_v(before, after, 1e-3), "jump at seam {seam}");
    }
}

#[test]
fn keyframes_reject_short_tracks() {
    assert!(matches!(
        Keyframes::new([Vec3::ZERO]),
        Err(StoryError::TooFewKeyframes { len: 1 })
    ));
}

#[test]
fn smoothstep_is_flat_at_both_ends() {
    assert_eq!(smoothstep(0.0), 0.0);
    assert_eq!(smoothstep(1.0), 1.0);
    assert!(close(smoothstep(0.5), 0.5, 1e-6));
    assert!(smoothstep(0.01) < 0.01);
}

#[test]
fn damping_is_frame_rate_independent() {
    let d = Damping::PerFrame(CAMERA_DAMPING);
    let dt = 1.0 / 30.0;
    let one_step = d.factor(dt);
    let half = d.factor(dt * 0.5);
    let two_steps = 1.0 - (1.0 - half) * (1.0 - half);
    assert!(close(one_step, two_steps, 1e-5));
    assert!(close(d.factor(1.0 / REFERENCE_FPS), CAMERA_DAMPING, 1e-5));
    assert_eq!(d.factor(0.0), 0.0);
}

#[test]
fn camera_rig_converges_on_keyframe_pose() {
    let mut rig = CameraRig::story().unwrap();
    let goal = rig.target_pose(1.0);
    let mut pose = rig.update(1.0, 1.0 / 60.0);
    assert!(pose.eye.distance(goal.eye) > 0.01, "damped, not snapped");
    assert_eq!(pose.target, goal.target, "look-at is not damped");
    for _ in 0..600 {
        pose = rig.update(1.0, 1.0 / 60.0);
    }
    assert!(close_v(pose.eye, goal.eye, 1e-3));
    assert!(close_v(goal.eye, CAMERA_POSITION_KEYS[4], 1e-6));
}

#[test]
fn camera_rig_rejects_misaligned_tracks() {
    let positions = Keyframes::new(CAMERA_POSITION_KEYS).unwrap();
    let targets = Keyframes::new([Vec3::ZERO, Vec3::X]).unwrap();
    assert!(matches!(
        CameraRig::new(positions, targets, Damping::PerFrame(CAMERA_DAMPING)),
        Err(StoryError::MisalignedTracks {
            positions: 5,
            targets: 2
        })
    ));
}

#[test]
fn scroll_offset_normalizes_and_clamps() {
    assert_eq!(normalize_offset(250.0, 500.0), 0.5);
    assert_eq!(normalize_offset(900.0, 500.0), 1.0);
    assert_eq!(normalize_offset(-10.0, 500.0), 0.0);
    assert_eq!(normalize_offset(100.0, 0.0), 0.0);
    assert_eq!(normalize_offset(f32::NAN, 500.0), 0.0);
}

#[test]
fn scroll_progress_eases_toward_target() {
    let mut p = ScrollProgress::default();
    let vh = 800.0;
    p.set_scroll(p.scroll_range(vh), vh);
    assert_eq!(p.target(), 1.0);
    let first = p.advance(1.0 / 60.0);
    assert!(first > 0.0 && first < 1.0);
    for _ in 0..600 {
        p.advance(1.0 / 60.0);
    }
    assert!(close(p.progress(), 1.0, 1e-4));
    p.set_target(0.25);
    assert_eq!(p.snap(), 0.25);
}

#[test]
fn lights_warm_with_progress() {
    let mut lights = AmbientLightController::default();
    assert_eq!(lights.levels().ambient, AMBIENT_INITIAL);
    let start = lights.update(0.0);
    assert_eq!(start.ambient, AMBIENT_INTENSITY.0);
    assert_eq!(start.directional, DIRECTIONAL_INTENSITY.0);
    let end = lights.update(1.0);
    assert_eq!(end.ambient, AMBIENT_INTENSITY.1);
    assert_eq!(end.directional, DIRECTIONAL_INTENSITY.1);
    let mid = lights.update(0.5);
    assert!(mid.ambient > start.ambient && mid.ambient < end.ambient);
}

#[test]
fn measured_scroll_range_reaches_the_end() {
    let mut p = ScrollProgress::default();
    // Container shorter than the nominal page count.
    p.set_scroll_measured(1200.0, 1200.0, 800.0);
    assert_eq!(p.target(), 1.0);
    p.set_scroll_measured(300.0, 1200.0, 800.0);
    assert_eq!(p.target(), 0.25);
    // Nothing measured: nominal pages.
    p.set_scroll_measured(1600.0, 0.0, 800.0);
    assert_eq!(p.target(), 0.5);
}

#[test]
fn viewport_width_grows_with_distance_and_aspect() {
    let cam = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 2.0);
    let size = cam.viewport_size_at(Vec3::ZERO);
    let expected_h = 2.0 * (CAMERA_FOV_DEG.to_radians() * 0.5).tan() * 5.0;
    assert!(close(size.y, expected_h, 1e-5));
    assert!(close(size.x, expected_h * 2.0, 1e-5));
    let far = cam.viewport_size_at(Vec3::new(0.0, 0.0, -5.0));
    assert!(close(far.x, size.x * 2.0, 1e-4));
}
