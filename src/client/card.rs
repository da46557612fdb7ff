//! Collapsible documentation card

use crate::core::constants::card::{FAILED, LOADING};
use crate::core::topics::Topic;

/// What a card body currently holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardContent {
    Loading,
    Loaded(String),
    Failed,
}

/// One topic card with its fetched explanation
#[derive(Debug, Clone)]
pub struct Card {
    topic: Topic,
    content: CardContent,
    expanded: bool,
}

impl Card {
    /// A collapsed card waiting for its explanation
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            content: CardContent::Loading,
            expanded: false,
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn content(&self) -> &CardContent {
        &self.content
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_settled(&self) -> bool {
        self.content != CardContent::Loading
    }

    /// Text shown in the card body
    pub fn body(&self) -> &str {
        match &self.content {
            CardContent::Loading => LOADING,
            CardContent::Loaded(text) => text,
            CardContent::Failed => FAILED,
        }
    }

    /// Flip between expanded and collapsed, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    /// Record the fetch outcome; a card resolves once and ignores later results
    pub(crate) fn resolve(&mut self, text: Option<String>) -> bool {
        if self.is_settled() {
            return false;
        }
        self.content = match text {
            Some(text) => CardContent::Loaded(text),
            None => CardContent::Failed,
        };
        true
    }

    /// Plain-text rendering; the body appears only while expanded
    pub fn render(&self) -> String {
        let marker = if self.expanded { '▾' } else { '▸' };
        let mut out = format!("{} {}\n  {}\n", marker, self.topic.title, self.topic.summary);
        if self.expanded {
            out.push('\n');
            for line in self.body().lines() {
                if line.is_empty() {
                    out.push('\n');
                } else {
                    out.push_str("    ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        out
    }
}
