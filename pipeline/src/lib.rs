pub mod annotator;
pub mod collector;
pub mod config;
pub mod orchestrator;
pub mod progress;
pub mod report;
pub mod search;

pub use annotator::Annotator;
pub use collector::Collector;
pub use config::RunConfig;
pub use orchestrator::SubredditFinder;
pub use progress::{LogProgress, NoProgress, ProgressSink};
pub use search::SearchApi;
