pub mod init;
pub mod reset;
pub mod status;
pub mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Watch input activity and remind you to take breaks")]
    Watch(watch::WatchArgs),
    #[command(about = "Show the current session")]
    Status,
    #[command(about = "Forget the stored session")]
    Reset,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Watch(args) => watch::cmd(args).await,
            Commands::Status => status::cmd(),
            Commands::Reset => reset::cmd(),
        }
    }
}
