// Read side: expands foreign references into embedded views.
// Missing, malformed and dangling references all expand to null; only a
// failing store aborts a read.

pub mod engine;
pub mod views;
