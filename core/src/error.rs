use std::io;
use std::net::SocketAddr;

use thiserror::Error;

// Linux and the BSDs agree on these two.
const EMFILE: i32 = 24;
const ENFILE: i32 = 23;

/// A probe that could not produce an open/closed answer.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("out of local resources while probing {addr}: {source}")]
    Resource {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// True when `err` signals local exhaustion rather than an answer from the remote side.
pub fn is_resource_exhaustion(err: &io::Error) -> bool {
    if matches!(err.raw_os_error(), Some(EMFILE) | Some(ENFILE)) {
        return true;
    }
    matches!(
        err.kind(),
        io::ErrorKind::AddrInUse | io::ErrorKind::AddrNotAvailable | io::ErrorKind::OutOfMemory
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
