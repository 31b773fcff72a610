pub mod dedup;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod lines;
pub mod normalize;
pub mod probe;
pub mod throttle;

pub use dedup::SeenSet;
pub use error::PipelineError;
pub use extract::DomainExtractor;
pub use fetch::{FetchSummary, drain_urls, execute_fetch};
pub use filter::{FilterSummary, LineStage, run_line_filter};
pub use normalize::{NormalizeMode, UrlNormalizer};
pub use probe::{
    ExposurePolicy, ProbeOutcome, ProbeReport, ProbeReportCallback, ProbeSummary, execute_probe,
};
pub use throttle::{DEFAULT_PROBE_INTERVAL, IntervalThrottle, Throttle, Unthrottled};
