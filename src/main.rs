//! Songclip CLI - query the Songclip API from a terminal.
//!
//! Run `songclip --help` for usage information.

use anyhow::Result;
use console::style;
use serde::Serialize;
use songclip::config::EventArgs;
use songclip::{
    Args, CallContext, ClientConfig, CollectionParams, Command, EventParams, RelatedParams,
    SearchParams, SongclipClient,
};
use tracing::{Level, debug, error};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    setup_logging(&args);

    let config = match ClientConfig::from_args(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let client = SongclipClient::new(config)?;
    debug!(base_url = client.base_url(), "Client ready");

    if let Err(e) = run(&client, &args).await {
        error!(kind = ?e.kind(), "{}", e);
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    if let Some(session_id) = client.session_id() {
        debug!(session_id = %session_id, unique_id = %client.unique_id(), "Session");
    }

    Ok(())
}

async fn run(client: &SongclipClient, args: &Args) -> songclip::Result<()> {
    let context = caller_context(args);

    match args.command.clone() {
        Command::Search {
            query,
            paging,
            no_duplicates,
        } => {
            let params = SearchParams {
                q: query,
                paging: paging.into(),
                allow_duplicates: Some(!no_duplicates),
                context,
            };
            print_json(&client.search(&params).await?);
        }
        Command::Collections => {
            print_json(&client.get_collections(context.as_ref()).await?);
        }
        Command::Collection { term, paging } => {
            let params = CollectionParams {
                term,
                paging: paging.into(),
                context,
            };
            print_json(&client.get_collection(&params).await?);
        }
        Command::Related {
            id,
            asset_type,
            paging,
        } => {
            let params = RelatedParams {
                id,
                asset_type,
                paging: paging.into(),
                context,
            };
            print_json(&client.get_related(&params).await?);
        }
        Command::Open => {
            print_json(&client.post_app_open(context.as_ref()).await?);
        }
        Command::Play(event) => {
            print_json(&client.post_play_event(&event_params(event, context)).await?);
        }
        Command::Share(event) => {
            print_json(&client.post_share_event(&event_params(event, context)).await?);
        }
        Command::Add(event) => {
            print_json(&client.post_add_event(&event_params(event, context)).await?);
        }
    }

    Ok(())
}

/// Context built from the global flags, if any were given.
fn caller_context(args: &Args) -> Option<CallContext> {
    if args.unique_id.is_none()
        && args.session_id.is_none()
        && args.platform.is_none()
        && args.tags.is_empty()
    {
        return None;
    }

    Some(CallContext {
        session_id: args.session_id.clone(),
        unique_id: args.unique_id.clone(),
        source_platform: args.platform.clone(),
        tags: (!args.tags.is_empty()).then(|| args.tags.clone()),
        ..Default::default()
    })
}

fn event_params(event: EventArgs, context: Option<CallContext>) -> EventParams {
    EventParams {
        id: event.id,
        asset_type: event.asset_type,
        context,
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("{} {}", style("Error:").red().bold(), e),
    }
}

fn setup_logging(args: &Args) {
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("songclip={level}")));

    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}
