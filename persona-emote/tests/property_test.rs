//! Property tests for emote arbitration

use persona_emote::{BlinkConfig, EmoteConfig, EmoteController, ExpressionPreset, GestureType};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Command {
    Emotion(ExpressionPreset),
    Gesture(GestureType),
    LipSync(ExpressionPreset, f32),
    Tick(f32),
}

fn preset() -> impl Strategy<Value = ExpressionPreset> {
    prop_oneof![
        Just(ExpressionPreset::Neutral),
        Just(ExpressionPreset::Happy),
        Just(ExpressionPreset::Angry),
        Just(ExpressionPreset::Sad),
        Just(ExpressionPreset::Surprised),
        Just(ExpressionPreset::Relaxed),
        Just(ExpressionPreset::Blink),
        Just(ExpressionPreset::Aa),
        Just(ExpressionPreset::Oh),
    ]
}

fn gesture() -> impl Strategy<Value = GestureType> {
    prop_oneof![
        Just(GestureType::Idle),
        Just(GestureType::Nod),
        Just(GestureType::Wave),
        Just(GestureType::CloseEyes),
        Just(GestureType::ShakeHead),
        Just(GestureType::Bow),
    ]
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        preset().prop_map(Command::Emotion),
        gesture().prop_map(Command::Gesture),
        (preset(), -2.0f32..2.0f32).prop_map(|(p, v)| Command::LipSync(p, v)),
        (-0.1f32..1.0f32).prop_map(Command::Tick),
    ]
}

fn controller(seed: u64) -> EmoteController {
    let mut config = EmoteConfig::default();
    config.blink = BlinkConfig {
        seed: Some(seed),
        ..BlinkConfig::default()
    };
    config.lip_sync.decay_per_second = 0.5;
    EmoteController::new(config).unwrap()
}

fn run(emote: &mut EmoteController, cmd: &Command) {
    match cmd {
        Command::Emotion(p) => emote.play_emotion(*p),
        Command::Gesture(g) => emote.play_gesture(*g),
        Command::LipSync(p, v) => emote.lip_sync(*p, *v),
        Command::Tick(d) => {
            emote.update(*d);
        }
    }
}

proptest! {
    #[test]
    fn test_face_pose_is_well_formed(
        seed in any::<u64>(),
        cmds in prop::collection::vec(command(), 1..200),
    ) {
        let mut emote = controller(seed);
        for cmd in &cmds {
            run(&mut emote, cmd);
            let pose = emote.expression().pose();

            // Exactly one dominant preset, never a viseme
            prop_assert!(!pose.dominant.is_viseme());
            prop_assert!((0.0..=1.0).contains(&pose.weight));
            if let Some(overlay) = pose.lip_sync {
                prop_assert!((0.0..=1.0).contains(&overlay.weight));
            }
            if emote.is_emotion_active() {
                prop_assert!(pose.dominant.is_emotion());
            }
        }
    }

    #[test]
    fn test_emotion_activity_is_monotonic_between_plays(
        seed in any::<u64>(),
        ticks in prop::collection::vec(0.0f32..0.5f32, 1..100),
    ) {
        let mut emote = controller(seed);
        emote.play_emotion(ExpressionPreset::Happy);
        let mut was_active = true;
        let mut last_elapsed = 0.0;
        for delta in ticks {
            emote.update(delta);
            let playback = *emote.expression().emotion().unwrap();
            prop_assert!(!(playback.is_active && !was_active));
            prop_assert!(playback.elapsed >= last_elapsed);
            was_active = playback.is_active;
            last_elapsed = playback.elapsed;
        }
    }

    #[test]
    fn test_blink_frozen_while_closing_eyes_without_emotion(
        seed in any::<u64>(),
        ticks in prop::collection::vec(0.0f32..0.3f32, 1..60),
    ) {
        let mut emote = controller(seed);
        emote.play_gesture_for(GestureType::CloseEyes, 1000.0);
        let before = (
            emote.expression().blink().accumulated(),
            emote.expression().blink().phase(),
        );
        for delta in ticks {
            emote.update(delta);
        }
        prop_assert_eq!(
            (emote.expression().blink().accumulated(), emote.expression().blink().phase()),
            before
        );
    }

    #[test]
    fn test_zero_tick_is_idempotent(
        seed in any::<u64>(),
        cmds in prop::collection::vec(command(), 0..50),
        repeats in 1usize..20,
    ) {
        let mut emote = controller(seed);
        for cmd in &cmds {
            run(&mut emote, cmd);
        }
        let emotion = emote.expression().emotion().copied();
        let gesture = emote.gesture().gesture().copied();
        let accumulated = emote.expression().blink().accumulated();
        for _ in 0..repeats {
            emote.update(0.0);
        }
        prop_assert_eq!(emote.expression().emotion().copied(), emotion);
        prop_assert_eq!(emote.gesture().gesture().copied(), gesture);
        prop_assert_eq!(emote.expression().blink().accumulated(), accumulated);
    }
}
