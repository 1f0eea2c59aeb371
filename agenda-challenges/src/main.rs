use agenda_challenges::cli::{run, Cli};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    // `.env` may carry LIBREOFFICE_BIN.
    dotenv::dotenv().ok();

    // Logs go to stderr; stdout is reserved for `sample` output.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    run(cli).inspect_err(|e| tracing::error!(error = %e, "agenda-challenges failed"))
}
