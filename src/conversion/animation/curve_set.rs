use axisfix_scene::animation::{AnimationClip, CurveProperty, Keyframe, PropertyGroup};
use itertools::Itertools;
use thiserror::Error;

/// Key times of one group may differ by float noise from the exporter, not more.
const KEY_TIME_TOLERANCE: f32 = 1e-5;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveSetError {
    #[error("{path}: incomplete {group} curves, missing [{missing}]")]
    MissingCurves {
        path: String,
        group: PropertyGroup,
        missing: String,
    },

    #[error("{path}: {group} curves have different key counts ({counts})")]
    MismatchedKeyCounts {
        path: String,
        group: PropertyGroup,
        counts: String,
    },

    #[error("{path}: {group} curves disagree on the time of key #{index}")]
    MismatchedKeyTimes {
        path: String,
        group: PropertyGroup,
        index: usize,
    },
}

/// `N` curves of one object that are transformed together, e.g. the four rotation channels.
#[derive(Debug, Copy, Clone)]
pub struct CurveSet<const N: usize> {
    indices: [usize; N],
    key_count: usize,
}

impl<const N: usize> CurveSet<N> {
    /// Returns `Ok(None)` when there is nothing to transform: none of the channels is animated or the
    /// curves have no keys. Partial or inconsistent groups are errors.
    pub fn fetch(
        clip: &AnimationClip,
        path: &str,
        channels: [CurveProperty; N],
    ) -> Result<Option<Self>, CurveSetError> {
        let group = channels[0].group();
        let found = channels.map(|channel| clip.curve_index(path, channel));

        if found.iter().all(Option::is_none) {
            return Ok(None);
        }

        let mut indices = [0usize; N];
        let mut missing = Vec::new();
        for ((slot, index), channel) in indices.iter_mut().zip(found).zip(channels) {
            match index {
                Some(index) => *slot = index,
                None => missing.push(channel),
            }
        }

        if !missing.is_empty() {
            return Err(CurveSetError::MissingCurves {
                path: path.to_string(),
                group,
                missing: missing.iter().join(", "),
            });
        }

        let counts = indices.map(|index| clip.curves[index].keys.len());
        if counts.iter().any(|&count| count != counts[0]) {
            return Err(CurveSetError::MismatchedKeyCounts {
                path: path.to_string(),
                group,
                counts: channels
                    .iter()
                    .zip(counts)
                    .map(|(channel, count)| format!("{}: {}", channel, count))
                    .join(", "),
            });
        }

        let key_count = counts[0];
        if key_count == 0 {
            return Ok(None);
        }

        let set = Self { indices, key_count };
        for index in 0..key_count {
            let frame = set.frame(clip, index);
            if frame
                .iter()
                .any(|key| (key.time - frame[0].time).abs() > KEY_TIME_TOLERANCE)
            {
                return Err(CurveSetError::MismatchedKeyTimes {
                    path: path.to_string(),
                    group,
                    index,
                });
            }
        }

        Ok(Some(set))
    }

    #[inline]
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    #[inline]
    pub fn curve_indices(&self) -> [usize; N] {
        self.indices
    }

    /// The keys at `index` of all channels, in channel order.
    pub fn frame(&self, clip: &AnimationClip, index: usize) -> [Keyframe; N] {
        self.indices.map(|curve| clip.curves[curve].keys[index])
    }

    pub fn set_frame(&self, clip: &mut AnimationClip, index: usize, frame: [Keyframe; N]) {
        for (curve, key) in self.indices.iter().zip(frame) {
            clip.curves[*curve].keys[index] = key;
        }
    }

    /// Replaces every frame by `f(frame)`.
    pub fn map_frames<F>(&self, clip: &mut AnimationClip, mut f: F)
    where
        F: FnMut([Keyframe; N]) -> [Keyframe; N],
    {
        for index in 0..self.key_count {
            let frame = self.frame(clip, index);
            self.set_frame(clip, index, f(frame));
        }
    }
}
