//! Terminal interaction with a mounted deck
//!
//! Each input line names a card number to toggle; `q` or end of input stops.
//! Toggling only re-renders, it never fetches again.

use crate::client::deck::CardDeck;
use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Write every card of the deck, numbered from 1
pub fn render_deck<W: Write>(deck: &CardDeck, out: &mut W) -> Result<()> {
    for (index, card) in deck.cards().iter().enumerate() {
        write!(out, "[{}] {}", index + 1, card.render()).context("Failed to write card")?;
    }
    out.flush().context("Failed to flush output")
}

/// Read card numbers from `input` and toggle them until `q` or EOF
///
/// Returns how many toggles were applied.
pub async fn run_console<R, W>(deck: &mut CardDeck, input: R, out: &mut W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut toggles = 0;

    loop {
        write!(
            out,
            "\nCard number to expand/collapse (1-{}), q to quit: ",
            deck.cards().len()
        )?;
        out.flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            break;
        }

        let toggled = line
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| deck.toggle(index).map(|expanded| (index, expanded)));

        match toggled {
            Some((index, expanded)) => {
                toggles += 1;
                let card = &deck.cards()[index];
                debug_assert_eq!(card.is_expanded(), expanded);
                writeln!(out)?;
                write!(out, "[{}] {}", index + 1, card.render())?;
            }
            None => writeln!(out, "No card {:?}", line)?,
        }
    }

    Ok(toggles)
}
