//! Card fetch client
//!
//! Builds the documentation cards and fills them through the relay.

pub mod card;
pub mod console;
pub mod deck;
pub mod relay_client;

pub use deck::CardDeck;
pub use relay_client::RelayClient;
