//! Glovework Demo
//!
//! Headless exhibition bout: two CPU fighters slug it out, then the
//! recording is scrubbed back and forth through the replay deck.

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use glovework::{
    game::{BoutConfig, BoutEvent, IntentFrame, MatchDriver, Side},
    replay::ReplaySpeed,
    TICK_RATE, VERSION,
};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Glovework v{}", VERSION);
    info!("Tick rate: {} Hz", TICK_RATE);

    let driver = demo_bout();
    demo_replay(driver);

    Ok(())
}

/// Run an exhibition bout to its knockout.
fn demo_bout() -> MatchDriver {
    info!("=== Exhibition Bout ===");

    let seed = 0xB0u64;
    let mut driver = MatchDriver::exhibition(BoutConfig::default(), 0.5, 0.8, seed);
    info!(seed, "bout created");

    let idle = [IntentFrame::IDLE; 2];
    let mut decided_at = None;

    // Ten simulated minutes is far beyond any real bout.
    for t in 0..TICK_RATE * 600 {
        let out = driver.advance(idle);

        for event in &out.events {
            match event {
                BoutEvent::HitLanded { attacker, kind, finisher, .. } => {
                    info!(tick = t, ?attacker, ?kind, finisher, "hit landed");
                }
                BoutEvent::Knockout { victim } => {
                    info!(tick = t, ?victim, "knockout");
                }
                BoutEvent::BoutEnded { winner } => {
                    info!(tick = t, ?winner, "bout decided");
                }
                _ => {}
            }
        }

        // Report every 10 seconds
        if t % (TICK_RATE * 10) == 0 {
            info!(
                tick = t,
                health_a = out.status.health_a,
                health_b = out.status.health_b,
                state_a = out.status.state_a,
                state_b = out.status.state_b,
                "status"
            );
        }

        if out.status.game_over && decided_at.is_none() {
            decided_at = Some(t);
        }
        // Let the post-KO choreography and capture grace play out.
        if out.status.show_game_over {
            break;
        }
    }

    let status = driver.status();
    info!("=== Bout Result ===");
    match status.winner {
        Some(Side::A) => info!("winner: side A ({} health left)", status.health_a),
        Some(Side::B) => info!("winner: side B ({} health left)", status.health_b),
        None => info!("no decision"),
    }
    info!(
        ticks = decided_at.unwrap_or_default(),
        frames_recorded = driver.deck().len(),
        "recording complete"
    );

    driver
}

/// Scrub the recorded bout: play forward, jump to the middle, rewind to
/// the start.
fn demo_replay(mut driver: MatchDriver) {
    info!("=== Replay Scrub ===");

    let idle = [IntentFrame::IDLE; 2];
    driver.toggle_replay();

    // Watch the opening at normal speed.
    for _ in 0..TICK_RATE * 2 {
        driver.advance(idle);
    }
    info!(progress = driver.status().replay_progress, "played the opening");

    // Jump to the midpoint and fast-forward through the ending.
    driver.seek_replay(0.5);
    driver.set_replay_speed(ReplaySpeed::FastForward);
    let mut replayed_sounds = 0;
    loop {
        let out = driver.advance(idle);
        replayed_sounds += out.sounds.len();
        if out.status.replay_speed == 0 {
            break;
        }
    }
    info!(replayed_sounds, "fast-forwarded to the end");

    // Rewind all the way back; reverse is silent.
    driver.set_replay_speed(ReplaySpeed::FastReverse);
    loop {
        let out = driver.advance(idle);
        if out.status.replay_speed == 0 {
            break;
        }
    }
    info!(progress = driver.status().replay_progress, "rewound to the start");

    driver.toggle_replay();
    info!("replay ended, live simulation resumed");
}
