//! Terminal rendering.

use colored::Colorize;
use spotai_core::deck::RoundDeck;
use spotai_core::session::{CompletionReason, GameSession};
use spotai_core::stats::AggregateRoundStat;

const QUESTION: &str = "Which of these two videos was generated by AI?";
const BAR_WIDTH: usize = 30;

pub fn landing(total_rounds: usize, seconds: u32) {
    println!();
    println!("{}", "SPOT THE AI".bright_magenta().bold());
    println!(
        "{}",
        format!(
            "{} rounds, {}:{:02} on the clock. One clip in each pair is AI-generated.",
            total_rounds,
            seconds / 60,
            seconds % 60
        )
        .white()
    );
    println!("{}", "Press Enter to start, q to quit.".bright_black());
}

pub fn round(session: &GameSession) {
    let Some(pair) = session.current_pair() else {
        return;
    };
    let position = session.current_round();
    let total = session.total_rounds();
    let remaining = session.remaining_secs();

    println!();
    println!(
        "{} {}  {}",
        progress_bar(position, total).bright_blue(),
        format!("Round {}/{}", position + 1, total).bold(),
        clock(remaining)
    );
    println!("  {} {}", "[L]".bright_magenta().bold(), pair.left.uri);
    println!("  {} {}", "[R]".bright_blue().bold(), pair.right.uri);
    println!("{}", QUESTION.bright_cyan());
}

pub fn rejected(message: &str) {
    println!("{}", message.yellow());
}

pub fn time_up() {
    println!();
    println!("{}", "Time is up!".bright_red().bold());
}

pub fn results(session: &GameSession) {
    println!();
    println!("{}", "GAME COMPLETE".bright_yellow().bold());
    println!(
        "Your score: {}",
        format!("{} / {}", session.score(), session.total_rounds()).bold()
    );
    if session.completion() == Some(CompletionReason::TimeUp) && session.unanswered_rounds() > 0 {
        println!(
            "{}",
            format!("{} round(s) left unanswered.", session.unanswered_rounds()).bright_black()
        );
    }

    if !session.mistakes().is_empty() {
        println!();
        println!("{}", "Your mistakes".bold());
        for mistake in session.mistakes() {
            println!(
                "  Round {}: picked {} {} AI clip was {}",
                mistake.round_number,
                mistake.chosen_clip_uri.red(),
                "-".bright_black(),
                mistake.correct_clip_uri.green()
            );
        }
    }

    println!();
}

pub fn replay_prompt() {
    println!();
    println!("{}", "p to play again, q to quit.".bright_black());
}

pub fn global_stats(stats: &[AggregateRoundStat]) {
    if stats.is_empty() {
        println!("{}", "Global statistics are not available.".bright_black());
        return;
    }

    println!("{}", "Players who spotted the AI".bold());
    for stat in stats {
        let filled = ((stat.correct_percentage as usize * BAR_WIDTH) / 100).min(BAR_WIDTH);
        println!(
            "  Round {:>2} {} {:>3}% {}",
            stat.round_number,
            format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled)).bright_blue(),
            stat.correct_percentage,
            format!("({} plays)", stat.total_plays).bright_black()
        );
    }
}

pub fn deck(deck: &RoundDeck) {
    for (index, pair) in deck.pairs().iter().enumerate() {
        let flag = |ai: bool| if ai { "AI".bright_magenta() } else { "real".normal() };
        println!(
            "{:>2}. {} [{}]  |  {} [{}]",
            index + 1,
            pair.left.uri,
            flag(pair.left.is_ai_generated),
            pair.right.uri,
            flag(pair.right.is_ai_generated)
        );
    }
}

fn progress_bar(position: usize, total: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        ((position * BAR_WIDTH) / total).min(BAR_WIDTH)
    };
    format!("[{}{}]", "=".repeat(filled), " ".repeat(BAR_WIDTH - filled))
}

fn clock(remaining: u32) -> colored::ColoredString {
    let text = format!("{}:{:02}", remaining / 60, remaining % 60);
    if remaining <= 30 {
        text.bright_red().bold()
    } else {
        text.normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 10), format!("[{}]", " ".repeat(BAR_WIDTH)));
        assert_eq!(
            progress_bar(5, 10),
            format!("[{}{}]", "=".repeat(15), " ".repeat(15))
        );
        assert_eq!(progress_bar(0, 0).len(), BAR_WIDTH + 2);
        assert_eq!(progress_bar(12, 10).len(), BAR_WIDTH + 2);
    }

    #[test]
    fn test_global_stats_tolerates_out_of_range_percentage() {
        global_stats(&[
            AggregateRoundStat {
                round_number: 1,
                correct_percentage: 150,
                total_plays: 3,
            },
            AggregateRoundStat {
                round_number: 2,
                correct_percentage: 100,
                total_plays: 1,
            },
        ]);
    }
}
