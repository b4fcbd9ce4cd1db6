use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "leadbouncer", version, about = "Real-time lead validation and CRM routing")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Create an account and print its API key
    CreateAccount(CreateAccountArgs),
    /// Check which signal providers are configured
    CheckConfig,
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Bind address
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Bind port
    #[arg(short, long, default_value_t = 8420)]
    pub port: u16,

    /// Path to the SQLite database file
    #[arg(long, default_value = "leadbouncer.db")]
    pub db: String,
}

#[derive(Args, Clone)]
pub struct CreateAccountArgs {
    /// Account owner email
    #[arg(short, long)]
    pub email: String,

    /// Plan tier: free, starter, pro, agency
    #[arg(long, default_value = "free")]
    pub plan: String,

    /// Path to the SQLite database file
    #[arg(long, default_value = "leadbouncer.db")]
    pub db: String,
}
