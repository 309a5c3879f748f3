use clap::Parser;

/// Appkit: main-process runtime speaking JSON lines over stdio.
#[derive(Parser, Debug)]
#[command(name = "appkit", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log directive override (e.g. `appkit=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Start without opening the root surface.
    #[arg(long)]
    pub no_window: bool,

    /// Open an extra surface at this path after startup.
    #[arg(long)]
    pub open: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
