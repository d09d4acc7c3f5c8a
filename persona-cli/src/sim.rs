//! Fixed-rate frame loop driving an emote controller from a cue script

use crate::script::Script;
use persona_emote::{AvatarRig, EmoteController, ExpressionPreset, FramePose, GestureType};
use serde::Serialize;
use tracing::trace;

/// Rig that only traces what a real model would receive
pub struct TracingRig;

impl AvatarRig for TracingRig {
    fn set_expression(&mut self, preset: ExpressionPreset, weight: f32) {
        trace!(target: "persona::rig", "set_expression {} = {:.3}", preset, weight);
    }

    fn play_gesture(&mut self, gesture: GestureType, clip_time: f32, eyes_closed: bool) {
        trace!(
            target: "persona::rig",
            "play_gesture {} t={:.3} eyes_closed={}",
            gesture,
            clip_time,
            eyes_closed
        );
    }

    fn stop_gesture(&mut self) {
        trace!(target: "persona::rig", "stop_gesture");
    }

    fn rig_name(&self) -> &str {
        "tracing"
    }
}

/// One simulated frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub time: f32,
    #[serde(flatten)]
    pub pose: FramePose,
    pub blink_eligible: bool,
}

/// Step `emote` at `fps` for `duration` seconds, firing cues as their time
/// comes up. Cues fire before the frame's update. Each record is handed to
/// `on_frame` as soon as it is produced; returns the number of frames run.
pub fn run<F>(
    emote: &mut EmoteController,
    script: &Script,
    fps: u32,
    duration: f32,
    mut on_frame: F,
) -> anyhow::Result<u64>
where
    F: FnMut(FrameRecord) -> anyhow::Result<()>,
{
    if !duration.is_finite() || duration < 0.0 {
        anyhow::bail!("Duration must be a finite, non-negative number of seconds, got {}", duration);
    }
    let fps = fps.max(1);
    let delta = 1.0 / fps as f32;
    let frames = (duration as f64 * fps as f64).ceil() as u64;

    let mut next_cue = 0;
    for frame in 0..frames {
        let time = frame as f32 * delta;
        while let Some(cue) = script.cues.get(next_cue) {
            if cue.at > time {
                break;
            }
            cue.fire(emote);
            next_cue += 1;
        }

        let pose = emote.update(delta);
        on_frame(FrameRecord {
            frame,
            time: time + delta,
            pose,
            blink_eligible: emote.blink_eligible(),
        })?;
    }
    Ok(frames)
}

/// One-line human readable rendering of a frame
pub fn describe(record: &FrameRecord) -> String {
    let face = &record.pose.face;
    let mut line = format!(
        "{:>8.3}s  face={}({:.2})",
        record.time, face.dominant, face.weight
    );
    if let Some(overlay) = face.lip_sync {
        line.push_str(&format!(" lip={}({:.2})", overlay.preset, overlay.weight));
    }
    match record.pose.gesture {
        Some(g) => line.push_str(&format!(
            "  gesture={}@{:.2}{}",
            g.gesture,
            g.clip_time,
            if g.eyes_closed { " eyes-closed" } else { "" }
        )),
        None => line.push_str("  gesture=-"),
    }
    if !record.blink_eligible {
        line.push_str("  [blink suppressed]");
    }
    line
}

/// True when two frames would render identically, ignoring clip progress
pub fn same_shape(a: &FrameRecord, b: &FrameRecord) -> bool {
    a.pose.face == b.pose.face
        && a.blink_eligible == b.blink_eligible
        && a.pose.gesture.map(|g| (g.gesture, g.eyes_closed))
            == b.pose.gesture.map(|g| (g.gesture, g.eyes_closed))
}
