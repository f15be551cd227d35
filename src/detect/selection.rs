use serde::{Deserialize, Serialize};

use crate::detect::result::Detection;

/// Which detection wins when a frame carries several with the same label.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// First detection in detector output order.
    #[default]
    FirstMatch,
    /// Highest `score`; the earliest one wins a tie.
    HighestScore,
}

impl SelectionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionPolicy::FirstMatch => "first_match",
            SelectionPolicy::HighestScore => "highest_score",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().replace('-', "_").as_str() {
            "first_match" | "first" => Some(SelectionPolicy::FirstMatch),
            "highest_score" | "highest" => Some(SelectionPolicy::HighestScore),
            _ => None,
        }
    }

    /// Pick one detection labeled `label`, or `None` when the frame has none.
    pub fn select<'a>(&self, detections: &'a [Detection], label: &str) -> Option<&'a Detection> {
        let mut candidates = detections.iter().filter(|d| d.label == label);
        match self {
            SelectionPolicy::FirstMatch => candidates.next(),
            SelectionPolicy::HighestScore => {
                let first = candidates.next()?;
                Some(candidates.fold(first, |best, d| if d.score > best.score { d } else { best }))
            }
        }
    }
}
