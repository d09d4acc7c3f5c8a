//! Basic emote example

use persona_emote::{EmoteConfig, EmoteController, ExpressionPreset, GestureType, RecordingRig};

fn main() -> Result<(), persona_emote::EmoteError> {
    // Initialize tracing to see playback transitions
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    println!("Creating emote controller...");
    let mut emote = EmoteController::new(EmoteConfig::default())?;
    emote.bind_rig(Box::new(RecordingRig::new()));

    emote.play_emotion(ExpressionPreset::Happy);
    emote.play_gesture(GestureType::CloseEyes);

    // 4 seconds at 30 fps
    let delta = 1.0 / 30.0;
    for frame in 0..120 {
        if frame == 45 {
            emote.lip_sync(ExpressionPreset::Aa, 0.8);
        }
        let pose = emote.update(delta);
        if frame % 15 == 0 {
            println!(
                "frame {:>3}: face={} ({:.2}) gesture={:?} blink_eligible={}",
                frame,
                pose.face.dominant,
                pose.face.weight,
                pose.gesture.map(|g| (g.gesture, g.eyes_closed)),
                emote.blink_eligible(),
            );
        }
    }

    println!("\nExample completed!");
    Ok(())
}
