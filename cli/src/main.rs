mod commands;
mod terminal;

use commands::{CommandLine, scan};
use sweepr_common::config::Config;
use terminal::{print, spinner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg: Config = commands.to_config();

    spinner::init_logging(cfg.quiet);
    print::banner(cfg.no_banner, cfg.quiet);

    print::header("getting ready to scan", cfg.quiet);
    scan::scan(commands.range, commands.file, &cfg).await?;

    print::end_of_program(cfg.quiet);
    Ok(())
}
