//! Replays run under a paused clock so every offset is exact.

use keyflow_engine::{DefaultsProvider, Preferences};
use keyflow_replay::{
    replay::{self, ReplaySummary},
    script::Script,
};

/// Run `text` against fresh defaults with the given default repeat rate.
async fn replay_text(text: &str, repeat_rate: u64) -> ReplaySummary {
    let script = Script::from_ron(text).unwrap();
    let (handle, defaults) = DefaultsProvider::channel(Preferences {
        repeat_rate: Some(repeat_rate),
        ..Preferences::default()
    });
    replay::run(&script, &handle, defaults).await.unwrap()
}

#[tokio::test(start_paused = true)]
async fn hold_down_is_paired_across_detections() {
    let summary = replay_text(
        r#"(
            mappings: {
                "m": (
                    action_list: [
                        (uid: "shift", data: "key:shift", hold_down: true, delay_before_next_action: Some(20)),
                        (uid: "a", data: "key:a"),
                        (uid: "beep", data: "sound:beep"),
                    ],
                    show_toast: true,
                ),
            },
            unavailable: ["sound:beep"],
            events: [Detect(0, "m"), Detect(500, "m")],
            run_for_ms: 800,
        )"#,
        50,
    )
    .await;
    assert_eq!(
        summary,
        ReplaySummary {
            performed: 4,
            feedback: 2,
            released_on_exit: 0,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn held_action_is_released_when_replay_ends() {
    let summary = replay_text(
        r#"(
            mappings: {
                "m": (action_list: [(uid: "shift", data: "key:shift", hold_down: true), (uid: "a", data: "key:a")]),
            },
            events: [Detect(0, "m")],
            run_for_ms: 100,
        )"#,
        50,
    )
    .await;
    assert_eq!(summary.released_on_exit, 1);
    assert_eq!(summary.performed, 3);
}

#[tokio::test(start_paused = true)]
async fn repeat_rate_change_applies_to_next_start() {
    // 0, 100, 200 at the old rate; toggled off at 250; 300, 350, 400 at the new rate.
    let summary = replay_text(
        r#"(
            mappings: {
                "r": (action_list: [(uid: "x", data: "scroll", repeat: true, repeat_mode: TriggerPressedAgain)]),
            },
            events: [
                Detect(0, "r"),
                SetRepeatRate(240, 50),
                Detect(250, "r"),
                Detect(300, "r"),
            ],
            run_for_ms: 420,
        )"#,
        100,
    )
    .await;
    assert_eq!(summary.performed, 6);
    assert_eq!(summary.feedback, 0);
}
