//! High score bookkeeping
//!
//! One best score, only ever raised. Also owns the wire shapes shared by the
//! local file store and the remote endpoint.

use serde::{Deserialize, Serialize};

/// Best score known to this session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScoreTracker {
    best: u64,
}

impl HighScoreTracker {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Current best
    pub fn best(&self) -> u64 {
        self.best
    }

    /// Check whether a score would beat the current best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished run.
    ///
    /// Returns the new best if it was raised, i.e. the value that should be
    /// persisted; `None` leaves storage alone.
    pub fn offer(&mut self, score: u64) -> Option<u64> {
        if self.qualifies(score) {
            self.best = score;
            Some(score)
        } else {
            None
        }
    }

    /// Fold in a best score learned elsewhere (e.g. a late remote fetch)
    pub fn merge(&mut self, best: u64) {
        self.best = self.best.max(best);
    }

    /// `true` when `score` beats a best that already existed
    pub fn is_new_record(&self, score: u64) -> bool {
        self.best > 0 && score > self.best
    }
}

/// Stored/received high score document: `{ "highScore": n }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScoreRecord {
    #[serde(rename = "highScore", default)]
    pub high_score: Option<f64>,
}

impl HighScoreRecord {
    pub fn new(score: u64) -> Self {
        Self {
            high_score: Some(score as f64),
        }
    }

    /// Sanitized value: missing, negative or non-finite → 0
    pub fn score(&self) -> u64 {
        self.high_score.map(sanitize).unwrap_or(0)
    }
}

/// Body posted to the remote endpoint: `{ "score": n }`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub score: u64,
}

/// Floor a float score into range; garbage becomes 0
fn sanitize(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else {
        0
    }
}

/// Parse a persisted score leniently.
///
/// Accepts integers and decimals (floored), ignores surrounding whitespace
/// and trailing junk after leading digits. Returns `None` when no number can
/// be recovered at all.
pub fn parse_score(text: &str) -> Option<u64> {
    let text = text.trim();
    if let Ok(value) = text.parse::<u64>() {
        return Some(value);
    }
    if let Ok(value) = text.parse::<f64>() {
        return Some(sanitize(value));
    }
    if text.starts_with('-') {
        return Some(0);
    }

    let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_is_monotonic() {
        let mut tracker = HighScoreTracker::new(100);
        assert_eq!(tracker.offer(50), None);
        assert_eq!(tracker.offer(100), None);
        assert_eq!(tracker.offer(101), Some(101));
        assert_eq!(tracker.best(), 101);
        assert_eq!(tracker.offer(0), None);
        assert_eq!(tracker.best(), 101);
    }

    #[test]
    fn test_merge_never_lowers() {
        let mut tracker = HighScoreTracker::new(300);
        tracker.merge(200);
        assert_eq!(tracker.best(), 300);
        tracker.merge(400);
        assert_eq!(tracker.best(), 400);
    }

    #[test]
    fn test_new_record_needs_existing_best() {
        let fresh = HighScoreTracker::default();
        assert!(!fresh.is_new_record(500));
        let tracker = HighScoreTracker::new(120);
        assert!(tracker.is_new_record(121));
        assert!(!tracker.is_new_record(120));
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("42"), Some(42));
        assert_eq!(parse_score("  42\n"), Some(42));
        assert_eq!(parse_score("42.9"), Some(42));
        assert_eq!(parse_score("42abc"), Some(42));
        assert_eq!(parse_score("-5"), Some(0));
        assert_eq!(parse_score("NaN"), Some(0));
        assert_eq!(parse_score("abc"), None);
        assert_eq!(parse_score(""), None);
    }

    #[test]
    fn test_record_payload() {
        let record: HighScoreRecord = serde_json::from_str(r#"{ "highScore": 1234 }"#).unwrap();
        assert_eq!(record.score(), 1234);

        let record: HighScoreRecord = serde_json::from_str(r#"{ "highScore": null }"#).unwrap();
        assert_eq!(record.score(), 0);

        let record: HighScoreRecord = serde_json::from_str(r#"{ "other": 1 }"#).unwrap();
        assert_eq!(record.score(), 0);

        let json = serde_json::to_string(&HighScoreRecord::new(77)).unwrap();
        assert_eq!(json, r#"{"highScore":77.0}"#);
    }
}
