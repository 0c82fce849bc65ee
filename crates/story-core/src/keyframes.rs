use smallvec::SmallVec;

use crate::easing::{clamp01, smoothstep, Mix};
use crate::error::{Result, StoryError};

/// Segment index and eased local factor for `n` evenly spaced keys at `t`.
///
/// `t` is expected in \[0, 1\]; it is clamped anyway. Requires `n >= 2`.
#[inline]
pub fn segment(n: usize, t: f32) -> (usize, f32) {
    debug_assert!(n >= 2);
    let last_segment = n.saturating_sub(2);
    let seg = (n - 1) as f32 * clamp01(t);
    let i = (seg.floor() as usize).min(last_segment);
    let f = clamp01(seg - i as f32);
    (i, smoothstep(f))
}

/// Ordered, immutable keyframe track with at least two keys.
#[derive(Clone, Debug)]
pub struct Keyframes<T: Mix> {
    keys: SmallVec<[T; 8]>,
}

impl<T: Mix> Keyframes<T> {
    pub fn new(keys: impl IntoIterator<Item = T>) -> Result<Self> {
        let keys: SmallVec<[T; 8]> = keys.into_iter().collect();
        if keys.len() < 2 {
            return Err(StoryError::TooFewKeyframes { len: keys.len() });
        }
        Ok(Self { keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[T] {
        &self.keys
    }

    pub fn first(&self) -> T {
        self.keys[0]
    }

    pub fn last(&self) -> T {
        self.keys[self.keys.len() - 1]
    }

    /// Eased value at progress `t`. Exactly the first key at 0 and the last at 1.
    pub fn sample(&self, t: f32) -> T {
        let (i, f) = segment(self.keys.len(), t);
        self.keys[i].mix(self.keys[i + 1], f)
    }
}
