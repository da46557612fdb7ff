//! Mounted set of documentation cards
//!
//! Mounting a deck fires one fetch per card concurrently. Results come back
//! over a channel and are applied by the deck owner, so cards have a single
//! writer. Every fetch races a cancellation token owned by the deck: once
//! the deck is unmounted or dropped, outstanding fetches are abandoned and
//! can no longer touch any card.

use crate::client::card::Card;
use crate::client::relay_client::{PromptFetcher, RelayClientError};
use crate::core::topics::Topic;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

struct CardUpdate {
    index: usize,
    outcome: Result<String, RelayClientError>,
}

pub struct CardDeck {
    cards: Vec<Card>,
    updates: mpsc::UnboundedReceiver<CardUpdate>,
    token: CancellationToken,
}

impl CardDeck {
    /// Create cards for `topics` and start fetching all of them
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(fetcher: Arc<dyn PromptFetcher>, topics: &[Topic]) -> Self {
        let (tx, updates) = mpsc::unbounded_channel();
        let token = CancellationToken::new();

        let cards: Vec<Card> = topics.iter().copied().map(Card::new).collect();

        for (index, topic) in topics.iter().enumerate() {
            let fetcher = fetcher.clone();
            let tx = tx.clone();
            let token = token.clone();
            let prompt = topic.prompt();

            tokio::spawn(async move {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!("Fetch for card {} cancelled", index);
                    }
                    outcome = fetcher.fetch_text(&prompt) => {
                        // The deck may be gone already; nothing to update then.
                        let _ = tx.send(CardUpdate { index, outcome });
                    }
                }
            });
        }

        Self {
            cards,
            updates,
            token,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Toggle one card; returns the new expanded state
    ///
    /// Never issues a new fetch.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        self.cards.get_mut(index).map(Card::toggle)
    }

    /// Number of cards still showing the loading placeholder
    pub fn pending(&self) -> usize {
        self.cards.iter().filter(|c| !c.is_settled()).count()
    }

    /// Wait for the next fetch to finish and apply it
    ///
    /// Returns the index of the updated card, or `None` once every card has
    /// settled.
    pub async fn next_update(&mut self) -> Option<usize> {
        if self.pending() == 0 {
            return None;
        }
        let update = self.updates.recv().await?;
        Some(self.apply(update))
    }

    /// Wait until every card shows either its text or the failure placeholder
    pub async fn settle(&mut self) {
        while self.next_update().await.is_some() {}
    }

    /// Cancel outstanding fetches and discard the cards
    pub fn unmount(self) {
        drop(self);
    }

    fn apply(&mut self, update: CardUpdate) -> usize {
        let CardUpdate { index, outcome } = update;
        if let Some(card) = self.cards.get_mut(index) {
            let text = match outcome {
                Ok(text) => Some(text),
                Err(e) => {
                    error!("Failed to load card {:?}: {}", card.topic().subject, e);
                    None
                }
            };
            card.resolve(text);
        }
        index
    }
}

impl Drop for CardDeck {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
