mod cli;

use std::sync::Arc;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde::Serialize;

use flow_access_core::cadence::Value;
use flow_access_core::handler::HttpHandler;
use flow_access_core::{CancellationToken, Client, ClientError, HandlerError};

use cli::Command;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let api_url = args
        .api_url
        .clone()
        .unwrap_or_else(|| args.network.api_url().to_owned());
    let client = match &args.api_url {
        Some(url) => HttpHandler::new(url, args.debug)
            .map(|handler| Client::new(Arc::new(handler)))
            .map_err(ClientError::from),
        None => Client::for_network(args.network, args.debug),
    }
    .wrap_err_with(|| format!("while configuring the {} access client", args.network))?;

    tracing::info!(network = %args.network, api_url = %api_url, "access client ready");

    // Ctrl-C aborts whatever request is in flight.
    let ctx = CancellationToken::new();
    {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted; cancelling request");
                ctx.cancel();
            }
        });
    }

    run(&client, &ctx, args.command)
        .await
        .map_err(|err| eyre!(format_access_error(&api_url, &err)))
}

/// Wrapper so `run` can surface both client errors and local failures
/// (reading the script file, parsing arguments) through one hint formatter.
enum RunError {
    Client(ClientError),
    Local(eyre::Report),
}

impl From<ClientError> for RunError {
    fn from(err: ClientError) -> Self {
        RunError::Client(err)
    }
}

impl From<eyre::Report> for RunError {
    fn from(err: eyre::Report) -> Self {
        RunError::Local(err)
    }
}

async fn run(client: &Client, ctx: &CancellationToken, command: Command) -> Result<(), RunError> {
    match command {
        Command::Block {
            id,
            height,
            latest: _,
            sealed,
            header_only,
        } => {
            let block = match (id, height) {
                (Some(id), _) => client.get_block_by_id(ctx, id).await?,
                (None, Some(height)) => client.get_block_by_height(ctx, height).await?,
                (None, None) => client.get_latest_block(ctx, sealed).await?,
            };
            if header_only {
                print_json(&block.header)
            } else {
                print_json(&block)
            }
        }
        Command::Collection { id } => print_json(&client.get_collection(ctx, id).await?),
        Command::Account { address, height } => {
            let account = match height {
                Some(height) => client.get_account_at_block_height(ctx, address, height).await?,
                None => client.get_account_at_latest_block(ctx, address).await?,
            };
            print_json(&account)
        }
        Command::Transaction { id } => print_json(&client.get_transaction(ctx, id).await?),
        Command::TransactionResult { id } => {
            print_json(&client.get_transaction_result(ctx, id).await?)
        }
        Command::Script {
            file,
            args,
            height,
            block_id,
        } => {
            let script = tokio::fs::read(&file)
                .await
                .wrap_err_with(|| format!("read script `{}`", file.display()))?;
            let arguments = parse_arguments(&args)?;
            let value = match (height, block_id) {
                (Some(height), _) => {
                    client
                        .execute_script_at_block_height(ctx, height, &script, &arguments)
                        .await?
                }
                (None, Some(id)) => {
                    client
                        .execute_script_at_block_id(ctx, id, &script, &arguments)
                        .await?
                }
                (None, None) => {
                    client
                        .execute_script_at_latest_block(ctx, &script, &arguments)
                        .await?
                }
            };
            print_json(&value)
        }
        Command::Events {
            event_type,
            start,
            end,
            block_ids,
        } => {
            let events = match (start, end) {
                (Some(start), Some(end)) => {
                    client
                        .get_events_for_height_range(ctx, &event_type, start, end)
                        .await?
                }
                _ if !block_ids.is_empty() => {
                    client
                        .get_events_for_block_ids(ctx, &event_type, &block_ids)
                        .await?
                }
                _ => {
                    return Err(RunError::Local(eyre!(
                        "events needs either --start/--end or at least one --block-id"
                    )))
                }
            };
            print_json(&events)
        }
    }
}

fn parse_arguments(raw: &[String]) -> eyre::Result<Vec<Value>> {
    raw.iter()
        .enumerate()
        .map(|(i, arg)| {
            Value::decode(arg.as_bytes())
                .wrap_err_with(|| format!("argument {i} is not a valid JSON-Cadence value"))
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), RunError> {
    let rendered = serde_json::to_string_pretty(value).wrap_err("serialize output")?;
    println!("{rendered}");
    Ok(())
}

fn format_access_error(api_url: &str, err: &RunError) -> String {
    let err = match err {
        RunError::Local(report) => return format!("{report:#}"),
        RunError::Client(err) => err,
    };

    let mut lines = vec![format!("access API request to `{api_url}` failed: {err}")];

    match err {
        ClientError::Handler(HandlerError::Transport(source)) if source.is_connect() => {
            lines.push(
                "hint: connection refused or unreachable; verify the endpoint is running (for the emulator, `flow emulator` serves REST on :8888)".into(),
            );
        }
        ClientError::Handler(HandlerError::Transport(source)) if source.is_timeout() => {
            lines.push("hint: request timed out; verify network access to the endpoint".into());
        }
        ClientError::Handler(HandlerError::Status { status, .. }) if status.as_u16() == 404 => {
            lines.push(
                "hint: the requested object was not found; verify the id and that the endpoint URL ends in `/v1`".into(),
            );
        }
        ClientError::Handler(HandlerError::InvalidUrl(_)) => {
            lines.push("hint: pass a full http(s) URL with --api-url or FLOW_ACCESS_API_URL".into());
        }
        ClientError::Handler(HandlerError::Cancelled) => {
            lines.push("hint: the request was interrupted before it completed".into());
        }
        ClientError::NotImplemented(_) => {
            lines.push("hint: this operation is not served by the REST Access API".into());
        }
        _ => {}
    }

    lines.join("\n")
}
