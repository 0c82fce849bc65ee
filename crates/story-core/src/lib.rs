pub mod asset;
pub mod calibration;
pub mod camera;
pub mod constants;
pub mod easing;
pub mod error;
pub mod flock;
pub mod gate;
pub mod keyframes;
pub mod lights;
pub mod loader;
pub mod path_follower;
pub mod progress;
pub mod scene;
pub mod spline;
pub mod transform;

pub use asset::*;
pub use calibration::*;
pub use camera::*;
pub use constants::*;
pub use easing::*;
pub use error::StoryError;
pub use flock::*;
pub use gate::*;
pub use keyframes::*;
pub use lights::*;
pub use loader::*;
pub use path_follower::*;
pub use progress::*;
pub use scene::*;
pub use spline::*;
pub use transform::*;
