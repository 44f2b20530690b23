use bitflags::bitflags;

/// Keyframes advanced per second when nothing else is configured.
pub const DEFAULT_FRAME_RATE: f64 = 4.0;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PlaybackFlags: u8 {
        const ANIMATING   = 1 << 0;
        const REVERSE     = 1 << 1;
        const AUTO_REPLAY = 1 << 2;
    }
}

/// Playback state carried by the articulated root and by every node.
///
/// `accum_time` is a fractional keyframe position in `[0, len)` where `len`
/// is the owner's keyframe count. The same command applied to owners with
/// different keyframe counts therefore wraps differently per owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    pub transformation_index: usize,
    pub accum_time: f64,
    pub frame_rate: f64,
    pub flags: PlaybackFlags,
}

impl Default for Playback {
    fn default() -> Self {
        Self::with_frame_rate(DEFAULT_FRAME_RATE)
    }
}

/// A playback mutation, broadcast unchanged to every node of a subtree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackCommand {
    SetFrameRate(f64),
    SetAnimating(bool),
    SetReverse(bool),
    SetAutoReplay(bool),
    SetAccumTime(f64),
    /// `(accum + delta + len) % len`
    AccumTimeByDelta(f64),
    ResetAccumTime,
    /// Stored as `index % len`.
    SetTransformationIndex(usize),
    /// `(index + delta + len) % len`
    TransformationIndexByDelta(isize),
}

impl Playback {
    #[must_use]
    pub fn with_frame_rate(frame_rate: f64) -> Self {
        Self {
            transformation_index: 0,
            accum_time: 0.0,
            frame_rate,
            flags: PlaybackFlags::empty(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.flags.contains(PlaybackFlags::ANIMATING)
    }

    #[inline]
    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.flags.contains(PlaybackFlags::REVERSE)
    }

    #[inline]
    #[must_use]
    pub fn is_auto_replay(&self) -> bool {
        self.flags.contains(PlaybackFlags::AUTO_REPLAY)
    }

    #[inline]
    pub fn reset_accum_time(&mut self) {
        self.accum_time = 0.0;
    }

    /// Applies `cmd` against an owner holding `len` keyframes.
    pub fn apply(&mut self, cmd: PlaybackCommand, len: usize) {
        let len = len.max(1);
        match cmd {
            PlaybackCommand::SetFrameRate(rate) => self.frame_rate = rate,
            PlaybackCommand::SetAnimating(on) => self.flags.set(PlaybackFlags::ANIMATING, on),
            PlaybackCommand::SetReverse(on) => self.flags.set(PlaybackFlags::REVERSE, on),
            PlaybackCommand::SetAutoReplay(on) => self.flags.set(PlaybackFlags::AUTO_REPLAY, on),
            PlaybackCommand::SetAccumTime(t) => self.accum_time = t,
            PlaybackCommand::AccumTimeByDelta(delta) => {
                let n = len as f64;
                self.accum_time = (self.accum_time + delta + n) % n;
            }
            PlaybackCommand::ResetAccumTime => self.reset_accum_time(),
            PlaybackCommand::SetTransformationIndex(index) => {
                self.transformation_index = index % len;
            }
            PlaybackCommand::TransformationIndexByDelta(delta) => {
                let n = len as isize;
                let current = self.transformation_index as isize;
                self.transformation_index = (current + delta + n).rem_euclid(n) as usize;
            }
        }
    }

    /// Pulls index and accumulator back inside `[0, len)` after the owner's
    /// keyframe list shrank.
    pub fn clamp_to(&mut self, len: usize) {
        let len = len.max(1);
        if self.transformation_index >= len {
            self.transformation_index = len - 1;
        }
        if self.accum_time >= len as f64 {
            self.accum_time = self.accum_time % len as f64;
        }
    }

    /// Copies the shared fields of `source`, reducing the index to `len`.
    pub fn sync_from(&mut self, source: &Self, len: usize) {
        self.frame_rate = source.frame_rate;
        self.flags = source.flags;
        self.accum_time = source.accum_time;
        self.apply(
            PlaybackCommand::SetTransformationIndex(source.transformation_index),
            len,
        );
        self.clamp_to(len);
    }
}
