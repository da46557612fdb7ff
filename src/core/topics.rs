//! Matrix documentation topics
//!
//! The fixed catalogue of cards shown by Matrix Hub, and the prompt each
//! card sends to the relay.

use crate::core::constants::card::{PROMPT_PREFIX, PROMPT_SUFFIX};
use crate::models::relay::{TopicCatalogue, TopicEntry};

/// Heading of the documentation page
pub const HUB_TITLE: &str = "The Matrix Hub";

/// A documentation topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topic {
    /// Numbered card heading
    pub title: &'static str,
    /// Bare subject inserted into the prompt
    pub subject: &'static str,
    /// Static blurb shown alongside the card
    pub summary: &'static str,
}

impl Topic {
    /// Prompt sent to the relay for this topic
    pub fn prompt(&self) -> String {
        build_prompt(self.subject)
    }
}

/// Build the card prompt for an arbitrary subject
pub fn build_prompt(subject: &str) -> String {
    format!("{}{}{}", PROMPT_PREFIX, subject, PROMPT_SUFFIX)
}

pub const TOPICS: [Topic; 8] = [
    Topic {
        title: "1️⃣ Introduction to Matrices",
        subject: "Introduction to Matrices",
        summary: "A matrix is a rectangular array of numbers arranged in rows and columns. It represents linear transformations and systems of equations.",
    },
    Topic {
        title: "2️⃣ Matrix Operations",
        subject: "Matrix Operations",
        summary: "Addition, subtraction, and scalar multiplication are element-wise operations. Multiplication involves dot products of rows and columns.",
    },
    Topic {
        title: "3️⃣ Determinant & Inverse",
        subject: "Determinant & Inverse",
        summary: "The determinant indicates if a matrix is invertible. The inverse exists only for square matrices with non-zero determinant.",
    },
    Topic {
        title: "4️⃣ Transpose & Symmetry",
        subject: "Transpose & Symmetry",
        summary: "The transpose of a matrix swaps rows and columns. Symmetric matrices are equal to their transpose.",
    },
    Topic {
        title: "5️⃣ Rank & Linear Independence",
        subject: "Rank & Linear Independence",
        summary: "The rank of a matrix indicates the number of linearly independent rows or columns — crucial for solving linear systems.",
    },
    Topic {
        title: "6️⃣ Eigenvalues & Eigenvectors",
        subject: "Eigenvalues & Eigenvectors",
        summary: "Eigenvalues represent scaling factors; eigenvectors represent invariant directions under a linear transformation.",
    },
    Topic {
        title: "7️⃣ Decompositions",
        subject: "Decompositions",
        summary: "LU, QR, and SVD decompositions are used to simplify solving systems, optimize computations, and analyze data.",
    },
    Topic {
        title: "8️⃣ Applications",
        subject: "Applications",
        summary: "Matrices are used in graphics transformations, machine learning (PCA), networks, and solving real-world linear systems.",
    },
];

/// Catalogue body served by `GET /api/topics`
pub fn catalogue() -> TopicCatalogue {
    TopicCatalogue {
        title: HUB_TITLE.to_string(),
        topics: TOPICS
            .iter()
            .map(|t| TopicEntry {
                title: t.title.to_string(),
                summary: t.summary.to_string(),
                subject: t.subject.to_string(),
                prompt: t.prompt(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_prompt_template() {
        assert_eq!(
            TOPICS[1].prompt(),
            "Explain Matrix Operations in detail in simple, easy-to-understand text format only. No salutations."
        );
    }

    #[test]
    fn test_every_topic_has_distinct_matching_prompt() {
        let prompts: HashSet<String> = TOPICS.iter().map(Topic::prompt).collect();
        assert_eq!(prompts.len(), 8);
        for topic in TOPICS {
            let prompt = topic.prompt();
            let subject = prompt
                .strip_prefix("Explain ")
                .and_then(|p| {
                    p.strip_suffix(
                        " in detail in simple, easy-to-understand text format only. No salutations.",
                    )
                })
                .unwrap();
            assert_eq!(subject, topic.subject);
            assert!(topic.title.ends_with(topic.subject));
        }
    }

    #[test]
    fn test_catalogue_preserves_order() {
        let catalogue = catalogue();
        assert_eq!(catalogue.title, "The Matrix Hub");
        assert_eq!(catalogue.topics.len(), 8);
        assert_eq!(catalogue.topics[0].subject, "Introduction to Matrices");
        assert_eq!(catalogue.topics[7].subject, "Applications");
    }

    #[test]
    fn test_rank_summary_text() {
        assert_eq!(
            TOPICS[4].summary,
            "The rank of a matrix indicates the number of linearly independent rows or columns — crucial for solving linear systems."
        );
    }
}
