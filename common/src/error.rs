use thiserror::Error;

/// Errors in user input. Any of these aborts the run before probing starts.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("port specification is empty")]
    EmptyPortSpec,

    #[error("invalid port token '{0}'")]
    InvalidPort(String),

    #[error("port {0} is outside the range 1-65535")]
    PortOutOfRange(u64),

    #[error("port range '{0}' ends before it starts")]
    ReversedRange(String),

    #[error("no targets given")]
    NoTargets,

    #[error("'{0}' is not an address, CIDR block or hostname")]
    InvalidTarget(String),

    #[error("block '{block}' holds {hosts} hosts, more than the {limit} a single scan expands")]
    BlockTooLarge { block: String, hosts: u128, limit: u128 },

    #[error("failed to resolve '{target}': {source}")]
    Unresolvable {
        target: String,
        #[source]
        source: std::io::Error,
    },
}
