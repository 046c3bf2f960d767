pub mod layout;
pub use layout::{ArtifactPreference, Resolution, ResultLayout, ResultState, sanitize_job_id};
pub mod matches;
pub use matches::{MatchRecord, parse_matches, read_matches};
pub mod mirror;
pub use mirror::{MirrorPlotLinks, database_usi, mirror_plot_links};
pub mod variant;
pub use variant::MasstVariant;
