//! Integration tests for persona-emote arbitration

use persona_emote::{
    BlinkConfig, BlinkPhase, EmoteConfig, EmoteController, ExpressionPreset, GestureType,
};

fn controller_with_blink_every(interval: f32) -> EmoteController {
    let mut config = EmoteConfig::default();
    config.blink = BlinkConfig {
        seed: Some(11),
        ..BlinkConfig::every(interval)
    };
    config.emotion.durations.insert(ExpressionPreset::Happy, 2.0);
    config.gesture.durations.insert(GestureType::CloseEyes, 5.0);
    EmoteController::new(config).unwrap()
}

#[test]
fn test_emotion_lifecycle_then_gesture_closes_eyes() {
    let mut emote = controller_with_blink_every(4.0);

    emote.play_emotion(ExpressionPreset::Happy);
    emote.update(1.0);
    assert!(emote.is_emotion_active());
    assert_eq!(emote.expression().emotion().unwrap().elapsed, 1.0);

    emote.update(1.5);
    assert_eq!(emote.expression().emotion().unwrap().elapsed, 2.5);
    assert!(!emote.is_emotion_active());

    emote.play_gesture(GestureType::CloseEyes);
    let pose = emote.update(0.1);
    let gesture = pose.gesture.unwrap();
    assert_eq!(gesture.gesture, GestureType::CloseEyes);
    assert!(gesture.eyes_closed);
}

#[test]
fn test_close_eyes_gesture_freezes_blink_for_its_duration() {
    let mut emote = controller_with_blink_every(4.0);
    emote.play_gesture(GestureType::CloseEyes);

    // 5.0s in quarter-second frames
    for _ in 0..20 {
        assert!(emote.is_closing_eyes());
        emote.update(0.25);
        assert_eq!(emote.expression().blink().phase(), BlinkPhase::Idle);
    }

    assert!(!emote.is_closing_eyes());
    assert_eq!(emote.expression().blink().accumulated(), 0.0);
    assert_eq!(emote.expression().blink().blink_count(), 0);
}

#[test]
fn test_blink_resumes_from_frozen_value_without_burst() {
    let mut emote = controller_with_blink_every(4.0);

    emote.update(3.0);
    emote.play_gesture_for(GestureType::CloseEyes, 2.0);
    for _ in 0..8 {
        emote.update(0.25);
    }
    assert!(!emote.is_closing_eyes());
    assert_eq!(emote.expression().blink().accumulated(), 3.0);

    // Still one second of eligible time owed before the next blink
    emote.update(0.5);
    assert_eq!(emote.expression().blink().phase(), BlinkPhase::Idle);
    emote.update(0.5);
    assert_eq!(emote.expression().blink().phase(), BlinkPhase::Closing);
}

#[test]
fn test_emotion_wins_ocular_control_over_close_eyes() {
    let mut emote = controller_with_blink_every(4.0);
    emote.play_emotion_for(ExpressionPreset::Surprised, 10.0);
    emote.play_gesture(GestureType::CloseEyes);

    let pose = emote.update(1.0);
    assert_eq!(pose.face.dominant, ExpressionPreset::Surprised);
    assert!(!pose.gesture.unwrap().eyes_closed);
    // Blink keeps running underneath the emotion
    assert_eq!(emote.expression().blink().accumulated(), 1.0);
    assert!(!emote.blink_eligible());
}

#[test]
fn test_suppression_uses_flags_from_previous_tick() {
    let mut emote = controller_with_blink_every(4.0);
    emote.play_emotion_for(ExpressionPreset::Sad, 1.0);
    emote.play_gesture(GestureType::CloseEyes);

    // Emotion expires during this tick; the gesture was already told an
    // emotion is active when the tick started
    let pose = emote.update(1.0);
    assert!(!emote.is_emotion_active());
    assert!(!pose.gesture.unwrap().eyes_closed);

    let pose = emote.update(0.1);
    assert!(pose.gesture.unwrap().eyes_closed);
}

#[test]
fn test_lip_sync_last_write_wins() {
    let mut emote = controller_with_blink_every(4.0);
    emote.lip_sync(ExpressionPreset::Aa, 0.7);
    emote.lip_sync(ExpressionPreset::Aa, 0.2);
    let pose = emote.update(0.016);
    let overlay = pose.face.lip_sync.unwrap();
    assert_eq!(overlay.preset, ExpressionPreset::Aa);
    assert_eq!(overlay.weight, 0.2);
}

#[test]
fn test_update_zero_is_idempotent() {
    let mut emote = controller_with_blink_every(4.0);
    emote.play_emotion(ExpressionPreset::Happy);
    emote.play_gesture(GestureType::Wave);
    emote.update(0.5);

    let emotion = *emote.expression().emotion().unwrap();
    let gesture = *emote.gesture().gesture().unwrap();
    for _ in 0..100 {
        emote.update(0.0);
    }
    assert_eq!(*emote.expression().emotion().unwrap(), emotion);
    assert_eq!(*emote.gesture().gesture().unwrap(), gesture);
}

#[test]
fn test_split_cadence_matches_combined_update() {
    for emotion in [None, Some(ExpressionPreset::Relaxed)] {
        let mut combined = controller_with_blink_every(4.0);
        let mut split = controller_with_blink_every(4.0);
        for emote in [&mut combined, &mut split] {
            if let Some(preset) = emotion {
                emote.play_emotion_for(preset, 10.0);
            }
            emote.play_gesture_for(GestureType::CloseEyes, 2.5);
        }

        // Runs past the end of the gesture
        for _ in 0..20 {
            let frame = combined.update(0.25);
            let face = split.update_expression(0.25);
            let gesture = split.update_gesture(0.25);
            assert_eq!(frame.face, face);
            assert_eq!(frame.gesture, gesture);
        }
    }
}

#[test]
fn test_split_gesture_update_sees_emotion_expiry_immediately() {
    let mut emote = controller_with_blink_every(4.0);
    emote.play_emotion_for(ExpressionPreset::Sad, 1.0);
    emote.play_gesture(GestureType::CloseEyes);

    emote.update_expression(1.0);
    let gesture = emote.update_gesture(1.0).unwrap();
    assert!(gesture.eyes_closed);
}

#[test]
fn test_gesture_at_lower_rate_still_arbitrates() {
    let mut emote = controller_with_blink_every(4.0);
    emote.play_gesture(GestureType::CloseEyes);

    // Face at 4 Hz, body at 2 Hz
    for frame in 0..8 {
        emote.update_expression(0.25);
        if frame % 2 == 1 {
            emote.update_gesture(0.5);
        }
    }
    assert!(emote.is_closing_eyes());
    assert_eq!(emote.expression().blink().accumulated(), 0.0);
}
