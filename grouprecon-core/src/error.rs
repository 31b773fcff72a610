use grouprecon_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to read input stream: {0}")]
    Input(#[source] std::io::Error),

    #[error("failed to write output stream: {0}")]
    Output(#[source] std::io::Error),

    #[error("archive fetch aborted: {0}")]
    Fetch(#[from] ScanError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
