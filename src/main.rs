use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use log::info;
use tokio::io::BufReader;

use quoridor_client::client::Session;
use quoridor_client::connection::Connection;

#[derive(Parser, Debug)]
struct Args {
    /// Server host
    #[arg(short = 'H', long, default_value = "localhost")]
    pub host: String,

    /// Server port
    #[arg(short, long, default_value_t = 5002)]
    pub port: u16,

    #[clap(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();

    let connection = Connection::connect((args.host.as_str(), args.port)).await?;
    info!("Connected to {}", connection.peer_addr());

    let session = Session::new(connection);
    session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}
