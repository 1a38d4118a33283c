mod commands;
mod output;
mod terminal;

use commands::{CommandLine, scan};
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.log_level());

    // Dropping the scan future aborts every in-flight probe and closes its socket.
    tokio::select! {
        result = scan::scan(&commands) => result,
        _ = tokio::signal::ctrl_c() => Err(anyhow::anyhow!("Scan interrupted.")),
    }
}
