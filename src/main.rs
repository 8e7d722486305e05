use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use pm_chat::cli::{Cli, Command};
use pm_chat::config::load_config;
use pm_chat::{ChatService, ThemeGenerator, normalize};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Install color-eyre panic hook for better error messages
    color_eyre::install()?;
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Normalize { file } => {
            let raw = read_input(file.as_deref())?;
            print_json(&normalize(&raw))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Chat {
            provider,
            system,
            message,
            request,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let mut service = ChatService::new(config);
            if let Some(provider) = provider {
                service = service.with_provider(provider);
            }

            let body = match Cli::inline_chat_body(system.as_deref(), message.as_deref()) {
                Some(body) => body,
                None => read_input(request.as_deref())?,
            };

            match service.handle_json(&body, cancel_on_ctrl_c()).await {
                Ok(reply) => {
                    print_json(&reply)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(failure) => {
                    log::debug!("Chat failed with status {}", failure.status);
                    print_json(&failure)?;
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Theme { prompt } => {
            let config = load_config(cli.config.as_deref())?;
            let reply = ThemeGenerator::new(config)
                .generate(&prompt, cancel_on_ctrl_c())
                .await?;
            print_json(&reply)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Read a file, or stdin when no path is given
fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Token cancelled when the user presses Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupted, cancelling request");
            child.cancel();
        }
    });
    token
}
