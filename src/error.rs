// Error types: strategy failures stay inside provider chains, fatal errors end the run.

/// Failure of a single acquisition strategy. Logged and swallowed by the chain.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("environment variable {0} is not set")]
    Unset(&'static str),
    #[error("{0} does not exist")]
    Missing(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` timed out after {timeout_ms} ms")]
    Timeout { program: String, timeout_ms: u64 },
    #[error("`{program}` exited with {status}")]
    Exit { program: String, status: String },
    #[error("unrecognized output: {0:?}")]
    Parse(String),
    #[error("not available")]
    Unavailable,
}

/// Errors that abort the report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("could not determine the operating system identity")]
    OsIdentity,
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}
