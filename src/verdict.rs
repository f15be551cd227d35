use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Meta key carrying the ball/net IoU on net calls.
pub const META_NET_OVERLAP: &str = "net_overlap";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    In,
    Out,
    Net,
    Inconclusive,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::In => "in",
            Recommendation::Out => "out",
            Recommendation::Net => "net",
            Recommendation::Inconclusive => "inconclusive",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The engine's only output. Consumed verbatim by storage/presentation layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub recommendation: Recommendation,
    /// In `[0, 1]`.
    pub confidence: f64,
    #[serde(default)]
    pub meta: BTreeMap<String, f64>,
}

impl Verdict {
    pub fn new(recommendation: Recommendation, confidence: f64) -> Self {
        Self {
            recommendation,
            confidence,
            meta: BTreeMap::new(),
        }
    }

    pub fn with_meta(mut self, key: &str, value: f64) -> Self {
        self.meta.insert(key.to_string(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_as_flat_record() {
        let verdict = Verdict::new(Recommendation::Net, 0.8).with_meta(META_NET_OVERLAP, 0.2);
        let value = serde_json::to_value(&verdict).unwrap();
        assert_eq!(
            value,
            json!({ "recommendation": "net", "confidence": 0.8, "meta": { "net_overlap": 0.2 } })
        );
    }

    #[test]
    fn empty_meta_is_an_empty_object() {
        let value = serde_json::to_value(Verdict::new(Recommendation::Inconclusive, 0.2)).unwrap();
        assert_eq!(value["meta"], json!({}));
        assert_eq!(value["recommendation"], "inconclusive");
    }

    #[test]
    fn display_matches_wire_name() {
        for rec in [
            Recommendation::In,
            Recommendation::Out,
            Recommendation::Net,
            Recommendation::Inconclusive,
        ] {
            assert_eq!(serde_json::to_value(rec).unwrap(), rec.to_string());
        }
    }
}
