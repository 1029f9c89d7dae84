//! Human-readable rendering of poll outcomes

use std::fmt::Write as _;

use application::PollOutcome;

/// Render an outcome as plain text, one block per trip
pub fn render(outcome: &PollOutcome) -> String {
    let snapshot = match outcome {
        PollOutcome::Data(snapshot) => snapshot,
        PollOutcome::Error(message) => return format!("Error: {message}\n"),
    };

    let mut out = format!("Departures as of {}\n", snapshot.last_updated);
    if snapshot.departures.is_empty() {
        out.push_str("  (no departures)\n");
        return out;
    }

    for (key, trip) in snapshot.departures.iter() {
        let _ = writeln!(
            out,
            "\n{} [{key}] ({} {})",
            trip.stop_name, trip.kind, trip.identifier
        );
        for departure in &trip.departures {
            let _ = writeln!(out, "  {departure}");
        }
    }
    out
}
