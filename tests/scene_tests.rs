// Host-side tests for the per-frame scene: gating, the boat route and the
// calibration lifecycle.

use std::time::Duration;

use glam::Vec3;
use instant::Instant;
use story_core::*;

fn close(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn pond() -> SceneAsset {
    SceneAsset::new(POND_POSITION).with_part(
        AssetPart::new(
            "PondSurface",
            Some(Aabb::new(Vec3::new(-2.0, 0.0, -1.5), Vec3::new(2.0, 0.1, 1.5))),
        )
        .with_material("Water"),
    )
}

fn calibrated(viewport_width: f32) -> (Calibration, f32) {
    let mut cal = SurfaceCalibrator::default();
    let report = cal.fit_and_calibrate(&mut pond(), viewport_width, POND_FIT_FRACTION);
    (cal.calibration(), report.surface_y)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn school_gate_scenario() {
    let mut school = GatedProp::school(None).unwrap();
    let tr = *school.update(0.5, Calibration::UNSET);
    assert!(close(tr.scale.x, GATE_MIN_SCALE, 1e-6));
    assert!(!tr.visible);

    let tr = *school.update(0.71, Calibration::UNSET);
    assert!(close(tr.scale.x, 0.5005, 1e-3));
    assert!(tr.visible);

    let tr = *school.update(0.9, Calibration::UNSET);
    assert_eq!(tr.scale, Vec3::ONE);
    assert!(tr.visible);
}

#[test]
fn gate_rejects_empty_window() {
    assert!(matches!(
        ThresholdGate::new(0.5, 0.0),
        Err(StoryError::EmptyGateWindow { .. })
    ));
}

#[test]
fn school_placeholder_rests_on_surface() {
    let (cal, v) = calibrated(8.0);
    let mut school = GatedProp::school(None).unwrap();
    match school.source() {
        PropSource::GeneratedPlaceholder { surface_y, .. } => assert_eq!(*surface_y, 0.0),
        other => panic!("unexpected source {other:?}"),
    }
    school.update(0.7, cal);
    let PropSource::GeneratedPlaceholder { surface_y, parts } = school.source() else {
        panic!("placeholder expected");
    };
    assert_eq!(*surface_y, v);
    let names: Vec<_> = parts.iter().map(|p| p.name).collect();
    assert_eq!(names, ["body", "roof", "door"]);
    assert!(parts.iter().all(|p| p.transform.position.y > v));
    assert_eq!(parts[0].color, rgb_from_hex(SCHOOL_BODY_COLOR));
}

#[test]
fn external_school_model_is_kept() {
    let school = GatedProp::school(Some(SceneAsset::new(Vec3::ZERO))).unwrap();
    assert!(matches!(school.source(), PropSource::ExternalAsset(_)));
}

#[test]
fn boat_path_endpoints_ride_the_surface() {
    let (_, v) = calibrated(8.0);
    let curve = boat_path(v).unwrap();
    let y = v + BOAT_WATERLINE_OFFSET;
    let start = curve.point_at(0.0);
    let end = curve.point_at(1.0);
    assert!(start.distance(Vec3::new(0.0, y, 0.0)) < 1e-5);
    assert!(end.distance(Vec3::new(2.4, y, 0.1)) < 1e-5);
    assert!(curve.length() > 2.4);
}

#[test]
fn follower_turns_toward_travel_direction() {
    let (cal, _) = calibrated(8.0);
    let mut follower = PathFollower::new();
    for _ in 0..300 {
        follower.update(0.5, 0.0, 1.0 / 60.0, cal);
    }
    let tangent = follower.curve().unwrap().tangent_at(0.5);
    let heading = follower.transform().rotation * BOAT_FORWARD;
    assert!(heading.dot(tangent) > 0.999);
}

#[test]
fn follower_rebuilds_path_when_surface_moves() {
    let (low, v_low) = calibrated(6.0);
    let (high, v_high) = calibrated(12.0);
    assert_ne!(v_low, v_high);
    let mut follower = PathFollower::new();
    let a = follower.update(0.0, 0.0, 1.0 / 60.0, low).unwrap().position.y;
    let b = follower.update(0.0, 0.0, 1.0 / 60.0, high).unwrap().position.y;
    assert!(close(b - a, v_high - v_low, 1e-5));
}

#[test]
fn flock_lifts_off_at_the_end() {
    let mut flock = Flock::new(FlockConfig::default()).unwrap();
    assert_eq!(flock.len(), FLOCK_SIZE);
    flock.update(0.5, 0.0, 1.0 / 60.0);
    assert!(!flock.is_visible());
    let grounded: Vec<f32> = flock.transforms().map(|t| t.position.y).collect();
    flock.update(1.0, 0.0, 1.0 / 60.0);
    assert!(flock.is_visible());
    for (tr, y0) in flock.transforms().zip(&grounded) {
        assert!(tr.visible);
        assert!(tr.position.y > y0 + FLOCK_LIFT * 0.9);
    }
}

#[test]
fn flock_layout_is_seeded() {
    let a = Flock::new(FlockConfig::default()).unwrap();
    let b = Flock::new(FlockConfig::default()).unwrap();
    let pa: Vec<Vec3> = a.transforms().map(|t| t.position).collect();
    let pb: Vec<Vec3> = b.transforms().map(|t| t.position).collect();
    assert_eq!(pa, pb);
}

#[test]
fn frame_before_pond_has_no_boat() {
    let base = Instant::now();
    let mut scene = StoryScene::new(SceneConfig::default(), 16.0 / 9.0, base).unwrap();
    let out = scene.frame(base);
    assert!(out.boat.is_none());
    assert!(out.pond.is_none());
    assert!(!out.calibration.is_set());
    assert!(!out.school.visible);
    assert!(out.flock.is_empty());
    assert!(out.camera.eye.distance(CAMERA_POSITION_KEYS[0]) < 1e-6);
}

#[test]
fn calibration_passes_follow_attach() {
    let base = Instant::now();
    let mut scene = StoryScene::new(SceneConfig::default(), 16.0 / 9.0, base).unwrap();
    let report = scene.attach_pond(pond(), base).unwrap();
    assert_eq!(scene.calibration().revision(), 1);

    let out = scene.frame(base + ms(16));
    assert_eq!(out.calibration.revision(), 2);
    let boat = out.boat.unwrap();
    let y = report.surface_y + BOAT_WATERLINE_OFFSET;
    assert!(close(boat.follower.position.y, y, BOAT_BOB_AMPLITUDE + 1e-5));
    assert!(close(boat.follower.position.x, 0.0, 1e-3));
    let pond_tr = out.pond.unwrap();
    assert!(close(pond_tr.scale.x, report.scale, 1e-5));

    assert_eq!(scene.frame(base + ms(32)).calibration.revision(), 2);
    assert_eq!(scene.frame(base + ms(80)).calibration.revision(), 3);
    assert_eq!(scene.frame(base + ms(200)).calibration.revision(), 3);
    let settled = scene.calibration().value().unwrap();
    assert!(close(settled, report.surface_y, 1e-5));
}

#[test]
fn resize_refits_on_next_frame() {
    let base = Instant::now();
    let mut scene = StoryScene::new(SceneConfig::default(), 16.0 / 9.0, base).unwrap();
    let wide = scene.attach_pond(pond(), base).unwrap();
    scene.frame(base + ms(100));
    let rev = scene.calibration().revision();

    scene.resize(9.0 / 16.0);
    let out = scene.frame(base + ms(116));
    assert_eq!(out.calibration.revision(), rev + 1);
    assert!(out.pond.unwrap().scale.x < wide.scale);
}

#[test]
fn scroll_drives_the_whole_frame() {
    let base = Instant::now();
    let config = SceneConfig {
        flock: Some(FlockConfig::default()),
        ..Default::default()
    };
    let mut scene = StoryScene::new(config, 16.0 / 9.0, base).unwrap();
    scene.attach_pond(pond(), base);
    scene.progress_mut().set_target(1.0);
    scene.progress_mut().snap();

    let mut now = base;
    let mut out = scene.frame(now);
    for _ in 0..600 {
        now += ms(16);
        out = scene.frame(now);
    }
    assert_eq!(out.progress, 1.0);
    assert!(out.camera.eye.distance(CAMERA_POSITION_KEYS[4]) < 1e-3);
    assert_eq!(out.camera.target, CAMERA_TARGET_KEYS[4]);
    assert_eq!(out.lights.ambient, AMBIENT_INTENSITY.1);
    assert!(out.school.visible);
    assert_eq!(out.flock.len(), FLOCK_SIZE);
    assert!(out.flock.iter().all(|f| f.visible));
    let boat = out.boat.unwrap();
    assert!(close(boat.follower.position.x, 2.4, 1e-3));
    assert!(close(boat.follower.position.z, 0.1, 1e-3));
}

#[test]
fn teardown_stops_recalibration() {
    let base = Instant::now();
    let mut scene = StoryScene::new(SceneConfig::default(), 16.0 / 9.0, base).unwrap();
    scene.attach_pond(pond(), base);
    scene.teardown();
    scene.resize(1.0);
    let out = scene.frame(base + ms(500));
    assert_eq!(out.calibration.revision(), 1);
    assert!(out.boat.is_some());
    assert!(scene.attach_pond(pond(), base).is_none());
}

#[test]
fn boat_bobs_with_elapsed_time() {
    let (cal, v) = calibrated(8.0);
    let mut follower = PathFollower::new();
    let rest = v + BOAT_WATERLINE_OFFSET;
    let crest = std::f32::consts::FRAC_PI_2 / BOAT_BOB_SPEED;
    let y = follower.update(0.0, crest, 1.0 / 60.0, cal).unwrap().position.y;
    assert!(close(y - rest, BOAT_BOB_AMPLITUDE, 1e-5));
    let y = follower.update(0.0, 2.0 * crest, 1.0 / 60.0, cal).unwrap().position.y;
    assert!(close(y, rest, 1e-5));
    let y = follower.update(0.0, 3.0 * crest, 1.0 / 60.0, cal).unwrap().position.y;
    assert!(close(y - rest, -BOAT_BOB_AMPLITUDE, 1e-5));
}

#[test]
fn hull_rocks_around_parent_origin() {
    let hull = HullRocking::default();
    let at_rest = hull.local_transform(0.0);
    assert_eq!(at_rest.position, Vec3::ZERO);
    assert_eq!(at_rest.scale, Vec3::splat(HULL_SCALE));
    let (x, y, z) = at_rest.rotation.to_euler(glam::EulerRot::XYZ);
    assert!(close(x, HULL_TILT * 0.5, 1e-5));
    assert!(close(y, 0.0, 1e-5));
    assert!(close(z, 0.0, 1e-5));

    let crest = hull.local_transform(std::f32::consts::FRAC_PI_2 / HULL_SPEED);
    assert!(close(crest.position.y, HULL_BOB, 1e-5));
    assert_eq!(crest.position.x, 0.0);
    assert_eq!(crest.position.z, 0.0);

    for k in 0..50 {
        let tr = hull.local_transform(k as f32 * 0.37);
        let (x, _, z) = tr.rotation.to_euler(glam::EulerRot::XYZ);
        assert!(x.abs() <= HULL_TILT * 0.5 + 1e-5);
        assert!(z.abs() <= HULL_TILT * 0.7 + 1e-5);
        assert!(tr.position.y.abs() <= HULL_BOB + 1e-6);
    }
}

#[test]
fn school_parts_follow_gate_transform() {
    let (cal, v) = calibrated(8.0);
    let mut school = GatedProp::school(None).unwrap();
    school.update(0.9, cal);
    let raw = school.placeholder_raw();
    assert_eq!(raw.len(), 3);
    assert_eq!(raw[0].shape, [PlaceholderRaw::BOX, 0.8, 0.35, 0.5]);
    assert_eq!(raw[1].shape, [PlaceholderRaw::CONE, 0.56, 0.25, 4.0]);
    assert_eq!(raw[0].color[3], 1.0);
    assert!(raw.iter().all(|p| p.transform.visible == 1.0));
    // Full scale: the body sits at its own placement.
    let body = glam::Mat4::from_cols_array_2d(&raw[0].transform.model);
    let origin = body.transform_point3(Vec3::ZERO);
    assert!(origin.distance(Vec3::new(SCHOOL_X, v + 0.2, SCHOOL_Z)) < 1e-5);

    // Mid-gate the whole group shrinks about the world origin.
    school.update(0.71, cal);
    let half = school.placeholder_raw();
    let body = glam::Mat4::from_cols_array_2d(&half[0].transform.model);
    let origin = body.transform_point3(Vec3::ZERO);
    let s = school.transform().scale.x;
    assert!(origin.distance(Vec3::new(SCHOOL_X, v + 0.2, SCHOOL_Z) * s) < 1e-5);

    school.update(0.5, cal);
    assert!(school.placeholder_raw().iter().all(|p| p.transform.visible == 0.0));
    assert_eq!(PlaceholderRaw::FLOATS, 28);
}

#[test]
fn frames_carry_school_parts_until_model_attached() {
    let base = Instant::now();
    let mut scene = StoryScene::new(SceneConfig::default(), 16.0 / 9.0, base).unwrap();
    assert_eq!(scene.frame(base).school_parts.len(), 3);

    let model = SceneAsset::new(Vec3::ZERO).with_part(AssetPart::new(
        "SchoolHouse",
        Some(Aabb::from_center_size(Vec3::ZERO, Vec3::ONE)),
    ));
    scene.attach_school(model);
    let out = scene.frame(base + ms(16));
    assert!(out.school_parts.is_empty());
    assert!(matches!(scene.school().source(), PropSource::ExternalAsset(_)));
}

#[test]
fn custom_surface_markers_pick_the_surface() {
    let base = Instant::now();
    let config = SceneConfig {
        surface_markers: &["lagoon"],
        ..Default::default()
    };
    let mut scene = StoryScene::new(config, 16.0 / 9.0, base).unwrap();
    let asset = SceneAsset::new(POND_POSITION)
        .with_part(AssetPart::new(
            "Water",
            Some(Aabb::new(Vec3::new(-2.0, 0.0, -1.0), Vec3::new(2.0, 0.5, 1.0))),
        ))
        .with_part(AssetPart::new(
            "Lagoon",
            Some(Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.1, 1.0))),
        ));
    let report = scene.attach_pond(asset, base).unwrap();
    assert_eq!(report.source, SurfaceSource::MarkedPart);
    assert!(close(report.surface_y, 0.1 * report.scale + POND_POSITION.y, 1e-5));
}
