//! Two-press section creation: mark a start, then mark an end.

/// Result of advancing the mark workflow by one key press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkOutcome {
    /// First press: the start bound was recorded.
    Started { at: f64 },
    /// Second press with a valid ordering: a section should be created.
    Created { start: f64, end: f64 },
    /// Second press at or before the pending start: nothing is created.
    Rejected { start: f64, end: f64 },
}

/// Advance the workflow given the pending mark and the current player time.
///
/// Returns the new pending value and the outcome. The pending mark survives
/// only between the first and second press; both second-press outcomes clear
/// it.
#[must_use]
pub fn advance(pending: Option<f64>, now: f64) -> (Option<f64>, MarkOutcome) {
    match pending {
        None => (Some(now), MarkOutcome::Started { at: now }),
        Some(start) if now > start => (None, MarkOutcome::Created { start, end: now }),
        Some(start) => (None, MarkOutcome::Rejected { start, end: now }),
    }
}

/// Round a player time to centiseconds, the precision marks are captured at.
#[must_use]
pub fn round_to_centis(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_press_records_start() {
        let (pending, outcome) = advance(None, 5.0);
        assert_eq!(pending, Some(5.0));
        assert_eq!(outcome, MarkOutcome::Started { at: 5.0 });
    }

    #[test]
    fn test_second_press_creates_section() {
        let (pending, outcome) = advance(Some(5.0), 12.0);
        assert_eq!(pending, None);
        assert_eq!(
            outcome,
            MarkOutcome::Created {
                start: 5.0,
                end: 12.0
            }
        );
    }

    #[test]
    fn test_second_press_out_of_order_rejects() {
        let (pending, outcome) = advance(Some(5.0), 3.0);
        assert_eq!(pending, None);
        assert_eq!(
            outcome,
            MarkOutcome::Rejected {
                start: 5.0,
                end: 3.0
            }
        );
    }

    #[test]
    fn test_second_press_equal_time_rejects() {
        let (pending, outcome) = advance(Some(5.0), 5.0);
        assert_eq!(pending, None);
        assert!(matches!(outcome, MarkOutcome::Rejected { .. }));
    }

    #[test]
    fn test_round_to_centis() {
        assert!((round_to_centis(1.234_56) - 1.23).abs() < 1e-9);
        assert!((round_to_centis(1.239) - 1.24).abs() < 1e-9);
        assert!((round_to_centis(90.0) - 90.0).abs() < 1e-9);
    }
}
