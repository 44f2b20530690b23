//! Keyframe storage and the per-frame interpolation step.

use std::ops::Index;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::errors::{KineError, Result};
use crate::scene::playback::{Playback, PlaybackFlags};
use crate::scene::transformation::Transformation;

// ============================================================================
// KeyframeList
// ============================================================================

/// Ordered, never-empty list of keyframe poses.
///
/// Every edit checks its index before mutating, so a failed edit leaves the
/// list untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Transformation>", into = "Vec<Transformation>")]
pub struct KeyframeList(Vec<Transformation>);

impl Default for KeyframeList {
    fn default() -> Self {
        Self::single(Transformation::IDENTITY)
    }
}

impl TryFrom<Vec<Transformation>> for KeyframeList {
    type Error = KineError;

    fn try_from(frames: Vec<Transformation>) -> Result<Self> {
        Self::new(frames)
    }
}

impl From<KeyframeList> for Vec<Transformation> {
    fn from(list: KeyframeList) -> Self {
        list.0
    }
}

impl Index<usize> for KeyframeList {
    type Output = Transformation;

    fn index(&self, index: usize) -> &Transformation {
        &self.0[index]
    }
}

impl KeyframeList {
    pub fn new(frames: Vec<Transformation>) -> Result<Self> {
        if frames.is_empty() {
            return Err(KineError::EmptyKeyframes);
        }
        Ok(Self(frames))
    }

    #[must_use]
    pub fn single(frame: Transformation) -> Self {
        Self(vec![frame])
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Transformation] {
        &self.0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Transformation> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transformation> {
        self.0.iter()
    }

    #[inline]
    fn check(&self, index: usize) -> Result<()> {
        if index < self.0.len() {
            Ok(())
        } else {
            Err(KineError::KeyframeIndexOutOfBounds {
                index,
                len: self.0.len(),
            })
        }
    }

    /// Replaces the keyframe at `index`.
    pub fn set(&mut self, index: usize, frame: Transformation) -> Result<()> {
        self.check(index)?;
        self.0[index] = frame;
        Ok(())
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.check(a)?;
        self.check(b)?;
        self.0.swap(a, b);
        Ok(())
    }

    /// Inserts before `index`; `index == len` appends.
    pub fn insert(&mut self, index: usize, frame: Transformation) -> Result<()> {
        if index > self.0.len() {
            return Err(KineError::KeyframeIndexOutOfBounds {
                index,
                len: self.0.len(),
            });
        }
        self.0.insert(index, frame);
        Ok(())
    }

    /// Removes the keyframe at `index`. Refuses to remove the last one.
    pub fn remove(&mut self, index: usize) -> Result<Transformation> {
        self.check(index)?;
        if self.0.len() == 1 {
            return Err(KineError::EmptyKeyframes);
        }
        Ok(self.0.remove(index))
    }
}

impl<'a> IntoIterator for &'a KeyframeList {
    type Item = &'a Transformation;
    type IntoIter = std::slice::Iter<'a, Transformation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Pose composition
// ============================================================================

impl Transformation {
    /// Static pose for a keyframe: translation and rotation add, scale
    /// multiplies, pivot comes from `base`.
    #[must_use]
    pub fn compose_static(base: &Self, keyframe: &Self) -> Self {
        base.offset_by(keyframe)
    }
}

// ============================================================================
// Interpolation step
// ============================================================================

impl Playback {
    /// Advances `accum_time` by `dt` seconds and returns the interpolated
    /// pose layered on `base`.
    ///
    /// A single keyframe returns `base` unchanged. Between the last and the
    /// first keyframe translation and rotation fade from the last pose back
    /// toward zero, while scale holds the last pose.
    pub fn animate<E>(
        &mut self,
        keyframes: &[Transformation],
        base: &Transformation,
        dt: f64,
        ease: E,
    ) -> Transformation
    where
        E: Fn(f64) -> f64,
    {
        let len = keyframes.len();
        if len <= 1 {
            return *base;
        }
        let n = len as f64;

        let step = dt * self.frame_rate;
        if self.is_reverse() {
            self.accum_time -= step;
        } else {
            self.accum_time += step;
        }

        // Checked before the wrap below.
        if !self.is_auto_replay() && self.accum_time > n {
            self.flags.remove(PlaybackFlags::ANIMATING);
        }

        let mut wrapped = self.accum_time.rem_euclid(n);
        if wrapped >= n {
            wrapped = 0.0;
        }
        self.accum_time = wrapped;

        let base_index = (wrapped.floor() as usize).min(len - 1);
        let t = ease(wrapped - base_index as f64);
        let curr = &keyframes[base_index];

        trace!(
            "animate: accum={:.4} index={} t={:.4} animating={}",
            self.accum_time,
            base_index,
            t,
            self.is_animating()
        );

        if (base_index + 1) % len == 0 {
            let fade = |c: f64| t * -c + c;
            Transformation::new(
                base.px,
                base.py,
                base.pz,
                base.tx + fade(curr.tx),
                base.ty + fade(curr.ty),
                base.tz + fade(curr.tz),
                base.rx + fade(curr.rx),
                base.ry + fade(curr.ry),
                base.rz + fade(curr.rz),
                base.sx * curr.sx,
                base.sy * curr.sy,
                base.sz * curr.sz,
            )
        } else {
            let next = &keyframes[base_index + 1];
            let lerp = |c: f64, nx: f64| t * (nx - c) + c;
            Transformation::new(
                base.px,
                base.py,
                base.pz,
                base.tx + lerp(curr.tx, next.tx),
                base.ty + lerp(curr.ty, next.ty),
                base.tz + lerp(curr.tz, next.tz),
                base.rx + lerp(curr.rx, next.rx),
                base.ry + lerp(curr.ry, next.ry),
                base.rz + lerp(curr.rz, next.rz),
                base.sx * lerp(curr.sx, next.sx),
                base.sy * lerp(curr.sy, next.sy),
                base.sz * lerp(curr.sz, next.sz),
            )
        }
    }
}
