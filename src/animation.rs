//! Animation merger
//!
//! Each source channel carries three independently timed component tracks
//! (translation, rotation, scale). They are fused into one ascending,
//! duplicate-free keyframe sequence per channel by walking three cursors:
//! every step emits a keyframe at the earliest pending sample time, advancing
//! exactly the tracks sampled at that instant and carrying the previous value
//! for the rest. No interpolation happens at merge time; that is a
//! playback-time concern.
//!
//! Because a channel's node name may be shared by several node instances
//! (duplicated skeleton rigs), the merged sequence is cloned onto one track
//! per matching instance.

use glam::{Quat, Vec3};
use tracing::warn;

use crate::builder::{AnimationTrack, Keyframe, SceneBuilder};
use crate::context::ImportContext;
use crate::error::ImportError;
use crate::options::{ImportOptions, SourceFormat};
use crate::source::{SourceAnimation, SourceChannel, SourceKey, SourceScene};

/// Tick rate assumed when the source does not declare one.
const DEFAULT_TICKS_PER_SECOND: f64 = 25.0;

/// Some exporters write glTF durations and key times in milliseconds instead
/// of ticks; a fixed divisor of 1000 corrects for it, overriding whatever
/// rate the file declares.
const GLTF2_TICKS_PER_SECOND: f64 = 1000.0;

/// Merge every animation of the scene and commit the resulting tracks.
pub fn create_animations<B: SceneBuilder>(
    scene: &SourceScene,
    ctx: &ImportContext,
    builder: &mut B,
    options: &ImportOptions,
) -> Result<(), ImportError> {
    for animation in &scene.animations {
        create_animation(animation, ctx, builder, options)?;
    }
    Ok(())
}

fn ticks_per_second(animation: &SourceAnimation, options: &ImportOptions) -> f64 {
    if options.source_format == SourceFormat::Gltf2 {
        return GLTF2_TICKS_PER_SECOND;
    }
    if animation.ticks_per_second != 0.0 {
        animation.ticks_per_second
    } else {
        DEFAULT_TICKS_PER_SECOND
    }
}

fn create_animation<B: SceneBuilder>(
    animation: &SourceAnimation,
    ctx: &ImportContext,
    builder: &mut B,
    options: &ImportOptions,
) -> Result<(), ImportError> {
    let divisor = ticks_per_second(animation, options);
    let duration = animation.duration_ticks / divisor;

    for channel in &animation.channels {
        let instance_count = ctx.instance_count(&channel.node_name);
        if instance_count == 0 {
            warn!(
                "animation '{}': channel targets unknown node '{}', ignoring",
                animation.name, channel.node_name
            );
            continue;
        }

        let keyframes = merge_channel(channel, divisor, options)?;

        for instance in 0..instance_count {
            let target = ctx
                .target_node_by_name(&channel.node_name, instance)
                .expect("instance index within instance_count");
            builder.add_animation(AnimationTrack {
                name: format!("{}.{}", channel.node_name, instance),
                target,
                duration,
                keyframes: keyframes.clone(),
            });
        }
    }

    Ok(())
}

/// Cursor over one component track. The first sample of a track may carry a
/// negative-time export artifact, which reads as zero; any later negative
/// time is a structural error, checked before merging starts.
struct TrackCursor<'a, T: Copy> {
    keys: &'a [SourceKey<T>],
    next: usize,
}

impl<'a, T: Copy> TrackCursor<'a, T> {
    fn new(keys: &'a [SourceKey<T>]) -> Self {
        Self { keys, next: 0 }
    }

    /// Time of the next unconsumed sample, `None` once exhausted.
    fn pending_time(&self) -> Option<f64> {
        let key = self.keys.get(self.next)?;
        Some(if self.next == 0 { key.time.max(0.0) } else { key.time })
    }

    /// Consume the next sample if it sits exactly at `time`.
    fn take_at(&mut self, time: f64) -> Option<T> {
        if self.pending_time()? != time {
            return None;
        }
        let value = self.keys[self.next].value;
        self.next += 1;
        Some(value)
    }
}

fn check_track_times<T: Copy>(
    keys: &[SourceKey<T>],
    channel: &SourceChannel,
    options: &ImportOptions,
) -> Result<(), ImportError> {
    if keys.iter().skip(1).any(|key| key.time < 0.0) {
        return Err(ImportError::NegativeKeyframeTime {
            path: options.path.clone(),
            channel: channel.node_name.clone(),
        });
    }
    Ok(())
}

/// Fuse a channel's three component tracks into one merged keyframe sequence
/// with times in seconds.
fn merge_channel(
    channel: &SourceChannel,
    ticks_per_second: f64,
    options: &ImportOptions,
) -> Result<Vec<Keyframe>, ImportError> {
    check_track_times(&channel.position_keys, channel, options)?;
    check_track_times(&channel.rotation_keys, channel, options)?;
    check_track_times(&channel.scale_keys, channel, options)?;

    let mut position = TrackCursor::new(&channel.position_keys);
    let mut rotation = TrackCursor::new(&channel.rotation_keys);
    let mut scale = TrackCursor::new(&channel.scale_keys);

    let mut keyframes = Vec::new();
    let mut current = Keyframe::default();

    loop {
        // Earliest pending sample across the three tracks; exhausted tracks
        // contribute no candidate.
        let times = [
            position.pending_time(),
            rotation.pending_time(),
            scale.pending_time(),
        ];
        let Some(time) = times.into_iter().flatten().reduce(f64::min) else {
            break;
        };

        // A clamped negative first key can collide with a genuine key at
        // zero; consuming every sample at `time` keeps the output
        // duplicate-free, with the later sample winning.
        while let Some(value) = position.take_at(time) {
            current.translation = Vec3::from_array(value);
        }
        while let Some(value) = rotation.take_at(time) {
            current.rotation = Quat::from_array(value);
        }
        while let Some(value) = scale.take_at(time) {
            current.scale = Vec3::from_array(value);
        }

        current.time = time / ticks_per_second;
        debug_assert!(
            keyframes
                .last()
                .is_none_or(|last: &Keyframe| current.time > last.time),
            "merged keyframe times must be strictly increasing"
        );
        keyframes.push(current);
    }

    Ok(keyframes)
}
