use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use spotai_application::{GameController, GameEvent, GameUpdate};
use spotai_core::SpotaiError;
use spotai_core::session::{GamePhase, GameSession, TickOutcome};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::app::AppContext;
use crate::display;
use crate::input::{self, Command};

/// Upper bound on waiting for a pending submission when the player quits.
const SUBMISSION_GRACE: Duration = Duration::from_secs(2);

pub struct PlayOptions {
    pub seed: Option<u64>,
    pub no_shuffle: bool,
    pub seconds: Option<u32>,
}

pub async fn run(ctx: AppContext, options: PlayOptions) -> Result<()> {
    let mut settings = ctx.config.session_settings();
    if options.no_shuffle {
        settings.shuffle = false;
    }
    if let Some(seconds) = options.seconds {
        anyhow::ensure!(seconds > 0, "--seconds must be greater than 0");
        settings.round_seconds = seconds;
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut controller = GameController::new(
        GameSession::new(ctx.deck.clone(), settings),
        ctx.submitter(),
        ctx.stats_service(),
        event_tx,
    );
    let mut commands = input::spawn_reader();

    display::landing(controller.session().total_rounds(), settings.round_seconds);

    loop {
        tokio::select! {
            Some(event) = event_rx.recv() => {
                let update = controller.handle_event(event)?;
                if let GameUpdate::Ticked(TickOutcome::Expired) = update {
                    display::time_up();
                    show_results(&mut controller).await;
                }
            }
            command = commands.recv() => {
                let command = command.unwrap_or(Command::Quit);
                if command == Command::Quit {
                    break;
                }
                on_command(&mut controller, command, &mut rng).await;
            }
        }
    }

    if tokio::time::timeout(SUBMISSION_GRACE, controller.wait_for_submission())
        .await
        .is_err()
    {
        tracing::warn!("[Play] Exiting before result submission finished");
    }
    Ok(())
}

async fn on_command(controller: &mut GameController, command: Command, rng: &mut StdRng) {
    match (controller.phase(), command) {
        (GamePhase::NotStarted, Command::Start | Command::PlayAgain) => {
            match controller.start_with_rng(rng) {
                Ok(()) => display::round(controller.session()),
                Err(e) => tracing::error!("[Play] Failed to start: {}", e),
            }
        }
        (GamePhase::InProgress, Command::Choose(side)) => match controller.handle_event(GameEvent::Choose(side)) {
            Ok(update) if update.completed_game() => show_results(controller).await,
            Ok(_) => display::round(controller.session()),
            Err(SpotaiError::ChoiceLocked { .. }) => {}
            Err(e) => tracing::debug!("[Play] Choice rejected: {}", e),
        },
        (GamePhase::InProgress, _) => {
            display::rejected("Type l for the left video or r for the right one.")
        }
        (GamePhase::Complete, Command::PlayAgain | Command::Start) => {
            controller.reset();
            match controller.start_with_rng(rng) {
                Ok(()) => display::round(controller.session()),
                Err(e) => tracing::error!("[Play] Failed to restart: {}", e),
            }
        }
        (GamePhase::Complete, _) => display::rejected("Type p to play again or q to quit."),
        (GamePhase::NotStarted, _) => display::rejected("Press Enter to start."),
    }
}

async fn show_results(controller: &mut GameController) {
    display::results(controller.session());
    let stats = controller.global_stats().await;
    display::global_stats(&stats);
    display::replay_prompt();
}
