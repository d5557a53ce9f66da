use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use flashdeck_lib::flashcards::Card;
use flashdeck_lib::study::{AlgorithmKind, StudyAlgorithm};

use crate::app::App;
use crate::render::terminal::{self, Color};

const HELP: &str = "y = correct, n = wrong, a = show answer, h = hint, \
Enter = next card, p = previous card, q = quit";

pub fn run(
    app: &mut App,
    deck_path: &Path,
    kind: AlgorithmKind,
    cycles: i32,
    mut input: impl BufRead,
    mut output: impl Write,
    use_color: bool,
) -> Result<()> {
    let deck = app
        .session
        .open_deck(deck_path)
        .with_context(|| format!("Failed to open deck {:?}", deck_path))?;
    if deck.is_empty() {
        bail!("Deck '{}' has no cards", deck.name);
    }

    let algorithm = app.session.start(&deck, kind, cycles);
    writeln!(
        output,
        "Studying '{}' with {} ({} cards)",
        deck.name,
        algorithm.name(),
        deck.len()
    )?;
    writeln!(output, "{}", terminal::paint(HELP, Color::DIM, use_color))?;

    let mut line = String::new();
    loop {
        let algorithm = app
            .session
            .algorithm_mut()
            .context("Study session was not started")?;
        if algorithm.is_session_complete() {
            writeln!(output, "\n{}", terminal::paint("Session complete!", Color::GREEN, use_color))?;
            break;
        }
        let Some(card) = algorithm.current_card().cloned() else {
            break;
        };

        let answered = if algorithm.has_answered_this_cycle(&card) {
            " (answered)"
        } else {
            ""
        };
        writeln!(
            output,
            "\n[{}/{}] {}{}",
            algorithm.current_index() + 1,
            algorithm.working_set().len(),
            algorithm.mastery_level(&card)?,
            answered
        )?;
        writeln!(output, "{}", terminal::render_question(&card, use_color))?;
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => answer(algorithm, kind, &card, true, &mut output, use_color)?,
            "n" | "no" => answer(algorithm, kind, &card, false, &mut output, use_color)?,
            "" | "next" => {
                if !algorithm.move_to_next()? {
                    writeln!(output, "Answer this card first, every other card is done for this cycle")?;
                }
            }
            "p" | "prev" => {
                if !algorithm.move_to_previous()? {
                    writeln!(output, "Answer this card first, every other card is done for this cycle")?;
                }
            }
            "a" | "answer" => {
                writeln!(output, "{}", terminal::render_answer(&card, use_color))?;
            }
            "h" | "hint" => match card.hint.as_deref() {
                Some(hint) if !hint.is_empty() => {
                    writeln!(output, "{}", terminal::paint(hint, Color::YELLOW, use_color))?;
                }
                _ => writeln!(output, "No hint for this card")?,
            },
            "q" | "quit" => break,
            "?" | "help" => writeln!(output, "{}", HELP)?,
            other => writeln!(output, "Unknown command '{}', type ? for help", other)?,
        }
    }

    if let Some(algorithm) = app.session.algorithm() {
        write_summary(algorithm, &mut output)?;
    }

    match app.session.finish() {
        Ok(Some(info)) => log::info!("Saved results for {}", info),
        Ok(None) => {}
        Err(e) => log::warn!("Failed to save session results: {}", e),
    }

    Ok(())
}

/// Record an answer, reveal the back and step to the next card. The
/// mastery-weighted policy repositions itself when a cycle closes, so no
/// extra step is taken for it then.
fn answer(
    algorithm: &mut dyn StudyAlgorithm,
    kind: AlgorithmKind,
    card: &Card,
    is_correct: bool,
    output: &mut impl Write,
    use_color: bool,
) -> Result<()> {
    if algorithm.has_answered_this_cycle(card) {
        writeln!(output, "Already answered this cycle")?;
        return Ok(());
    }

    let cycles_before = algorithm.cycles_completed();
    algorithm.record_response(card, is_correct)?;

    let verdict = if is_correct {
        terminal::paint("Correct", Color::GREEN, use_color)
    } else {
        terminal::paint("Wrong", Color::RED, use_color)
    };
    writeln!(output, "{}: {}", verdict, terminal::render_answer(card, use_color))?;

    let cycle_closed = algorithm.cycles_completed() != cycles_before;
    if cycle_closed {
        writeln!(output, "Cycle {} complete", algorithm.cycles_completed())?;
    }
    if algorithm.is_session_complete() {
        return Ok(());
    }
    if !cycle_closed || kind == AlgorithmKind::Rotational {
        algorithm.move_to_next()?;
    }
    Ok(())
}

fn write_summary(algorithm: &dyn StudyAlgorithm, output: &mut impl Write) -> Result<()> {
    writeln!(
        output,
        "\n{} correct, {} wrong, {} cycle(s) completed",
        algorithm.total_correct(),
        algorithm.total_incorrect(),
        algorithm.cycles_completed()
    )?;
    for card in algorithm.working_set() {
        writeln!(output, "  {:<12} {}", algorithm.mastery_level(card)?, card.question)?;
    }
    Ok(())
}
