//! Message understanding for the sales-assist pipeline
//!
//! Three deliberately simple components stand in for the "real" AI
//! service in the production path:
//! - [`EntityExtractor`] - regex/keyword entity extraction
//! - [`IntentClassifier`] - ordered-bucket first-match classification
//! - [`ScenarioMatcher`] - keyword-overlap match against the canned catalog
//!
//! All three are pure functions of the utterance text plus their static
//! tables; none of them consults conversation history.

pub mod extractor;
pub mod intent;
pub mod scenario;

pub use extractor::EntityExtractor;
pub use intent::IntentClassifier;
pub use scenario::{ScenarioMatch, ScenarioMatcher};
