//! A console hangman client.
//!
//! Rounds are played locally; wins and losses are kept by a hangman server,
//! or in memory with `--offline`.

use anyhow::{Context, Result};
use hangman::{MemoryStatsStore, StatsStore, WordList, random_index};
use pico_args::Arguments;
use std::io;

use hm_client::{api_client::ApiClient, console};

const HELP: &str = "\
Play hangman in the terminal

USAGE:
  hm_client [OPTIONS]

OPTIONS:
  --server URL          Server URL  [default: http://localhost:5000]
  --player NAME         Player name  [default: OS user name]

FLAGS:
  --offline             Keep stats in memory instead of on the server
  -h, --help            Print help information
";

const DEFAULT_SERVER: &str = "http://localhost:5000";

struct Args {
    server_url: String,
    player_name: String,
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let args = Args {
        server_url: pargs
            .opt_value_from_str("--server")?
            .unwrap_or_else(|| DEFAULT_SERVER.to_string()),
        player_name: pargs
            .opt_value_from_str("--player")?
            .unwrap_or_else(whoami::username),
        offline: pargs.contains("--offline"),
    };

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let store: Box<dyn StatsStore> = if args.offline {
        println!("Playing offline; stats are kept until you quit.");
        Box::new(MemoryStatsStore::new())
    } else {
        let client = ApiClient::new(args.server_url.clone());
        client
            .health_check()
            .await
            .map_err(|e| anyhow::anyhow!(e.client_message()))
            .with_context(|| {
                format!(
                    "Cannot reach {}. Start hm_server or pass --offline",
                    args.server_url
                )
            })?;
        Box::new(client)
    };

    let words = WordList::default();
    let summary = console::play_session(
        store.as_ref(),
        &words,
        &args.player_name,
        random_index,
        io::stdin().lock(),
        io::stdout(),
    )
    .await?;

    println!(
        "This session: {} won, {} lost.",
        summary.won, summary.lost
    );
    Ok(())
}
