mod completeness;
mod conflict;
mod normalize;
mod policy;

pub use completeness::{CompletenessReport, assess_completeness};
pub use conflict::{ConflictKind, ConflictReport, detect_conflicts};
pub use normalize::{normalize_clock, normalize_config};
pub use policy::{PolicyViolation, evaluate_policy};
