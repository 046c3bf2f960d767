pub mod config;
pub use config::{ClientConfig, MasstConfig};
pub mod error;
pub use error::{MasstError, Result};
pub mod job;
pub use job::{
    JobId, JobOutcome, JobWorkspace, LibraryMatches, LibrarySearchRequest, QueryInput,
    SearchRequest, search_library, search_library_with, submit, submit_with,
};
pub mod peaks;
pub use peaks::{AsPeak, Peak, RawPeak, Spectrum, reduce_peak_text, reduce_peaks};
pub mod results;
pub use results::{
    ArtifactPreference, MasstVariant, MatchRecord, MirrorPlotLinks, Resolution, ResultLayout,
    ResultState, mirror_plot_links, read_matches,
};
pub mod search;
pub use search::{SearchCommand, SearchParams, SearchQuery};
pub mod usi;
pub use usi::{UsiFetcher, UsiSpectrum, fetch_usi_spectrum};
