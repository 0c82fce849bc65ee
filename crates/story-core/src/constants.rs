use glam::Vec3;

// Shared scene tuning constants used by both web and native frontends.

// Frame smoothing
pub const REFERENCE_FPS: f32 = 60.0; // rate at which the per-frame damping factors were tuned
pub const CAMERA_DAMPING: f32 = 0.12; // eye position lerp factor per reference frame
pub const FOLLOWER_SLERP: f32 = 0.2; // boat rotation slerp factor per reference frame

// Scroll host
pub const SCROLL_PAGES: f32 = 5.0; // total scroll height in viewport heights
pub const SCROLL_DAMPING_SEC: f32 = 0.18; // time constant easing the reported offset

// Camera
pub const CAMERA_FOV_DEG: f32 = 42.0;

/// Camera eye keyframes, one per story step.
pub const CAMERA_POSITION_KEYS: [Vec3; 5] = [
    Vec3::new(0.0, 1.4, 5.5),
    Vec3::new(0.0, 1.1, 3.6),
    Vec3::new(1.2, 1.2, 3.0),
    Vec3::new(2.2, 1.3, 2.1),
    Vec3::new(2.0, 4.0, 2.6),
];

/// Camera look-at keyframes, index-aligned with [`CAMERA_POSITION_KEYS`].
pub const CAMERA_TARGET_KEYS: [Vec3; 5] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 0.2),
    Vec3::new(1.1, 0.0, -0.2),
    Vec3::new(2.2, 0.0, 0.1),
    Vec3::new(2.0, 0.0, 0.3),
];

// Pond fit + surface calibration
pub const POND_POSITION: Vec3 = Vec3::new(0.0, -0.4, 0.0);
pub const POND_FIT_FRACTION: f32 = 0.95; // share of the viewport width the pond spans
pub const FIT_FRACTION_MIN: f32 = 0.1;
pub const FIT_FRACTION_MAX: f32 = 1.0;
pub const POND_BASE_SCALE: f32 = 1.0;
pub const SURFACE_BIAS: f32 = 0.0; // fine-tune of a few millimeters if the mesh top is off
pub const SURFACE_MARKERS: &[&str] = &["water", "pond"];
pub const CALIBRATION_RETRY_MS: u64 = 60; // extra pass once geometry has settled

// Boat path
pub const BOAT_WATERLINE_OFFSET: f32 = 0.02; // keeps the hull just above the surface
pub const BOAT_PATH_TENSION: f32 = 0.4;
/// Boat path control points in the water plane; y is replaced by the surface height.
pub const BOAT_PATH_POINTS: [[f32; 2]; 5] = [
    [0.0, 0.0],
    [0.3, -0.4],
    [1.0, -1.2],
    [1.8, -0.8],
    [2.4, 0.1],
];
pub const TANGENT_EPSILON: f32 = 1e-4;
pub const BOAT_FORWARD: Vec3 = Vec3::Z;
pub const BOAT_BOB_AMPLITUDE: f32 = 0.015;
pub const BOAT_BOB_SPEED: f32 = 1.1;
pub const SPLINE_ARC_DIVISIONS: usize = 200;

// Boat hull rocking (local to the follower)
pub const HULL_SCALE: f32 = 0.12;
pub const HULL_BOB: f32 = 0.05;
pub const HULL_SPEED: f32 = 0.7;
pub const HULL_TILT: f32 = 0.07;

// School gate (story step 4)
pub const SCHOOL_GATE_START: f32 = 0.62;
pub const SCHOOL_GATE_WIDTH: f32 = 0.18;
pub const GATE_MIN_SCALE: f32 = 0.001; // never exactly zero to keep transforms invertible
pub const GATE_VISIBILITY_EPSILON: f32 = 0.01;
pub const SCHOOL_X: f32 = 2.4;
pub const SCHOOL_Z: f32 = 0.1;
pub const SCHOOL_BODY_COLOR: u32 = 0xffd38d;
pub const SCHOOL_ROOF_COLOR: u32 = 0xe4572e;
pub const SCHOOL_DOOR_COLOR: u32 = 0x6b4f4f;

// Butterfly flock (optional, story step 5)
pub const FLOCK_GATE_START: f32 = 0.86;
pub const FLOCK_GATE_WIDTH: f32 = 0.12;
pub const FLOCK_VISIBLE_THRESHOLD: f32 = 0.001;
pub const FLOCK_SIZE: usize = 10;
pub const FLOCK_LIFT: f32 = 2.4;
pub const FLOCK_WOBBLE: f32 = 0.04;

// Lights warm up over the scroll
pub const AMBIENT_INTENSITY: (f32, f32) = (0.5, 0.8);
pub const DIRECTIONAL_INTENSITY: (f32, f32) = (0.9, 1.2);
pub const AMBIENT_INITIAL: f32 = 0.6;
pub const DIRECTIONAL_INITIAL: f32 = 1.0;

// Loader timing (0 -> 95% fast, then 95 -> 100% slow)
pub const RAMP1_PERCENT: f64 = 95.0;
pub const RAMP1_MS: f64 = 500.0;
pub const RAMP2_MS: f64 = 1000.0;
pub const TOTAL_MS: f64 = RAMP1_MS + RAMP2_MS;
