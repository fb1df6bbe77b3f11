mod cli;
mod commands;
mod compat;
mod config;
mod constants;
mod pagination;
mod sources;
mod ui;

use clap::Parser;
use cli::{Cli, Commands};
use commands::check::CheckArgs;
use commands::fetch::FetchArgs;
use commands::pages::PagesArgs;
use commands::redirect::RedirectArgs;

async fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Commands::Init => commands::init::init().map(|_| 0),
        Commands::Check {
            id,
            source,
            client_app,
            user_agent,
            src,
            json,
        } => {
            commands::check::check(CheckArgs {
                id,
                source,
                client_app,
                user_agent,
                src,
                json,
            })
            .await
        }
        Commands::Redirect {
            path,
            search,
            client_app,
            lang,
            home,
            user_agent,
        } => commands::redirect::redirect(RedirectArgs {
            path,
            search,
            client_app,
            lang,
            home,
            user_agent,
        }),
        Commands::Pages {
            page_count,
            count,
            per_page,
            current,
            show,
            json,
        } => commands::pages::pages(PagesArgs {
            page_count,
            count,
            per_page,
            current,
            show,
            json,
        })
        .map(|_| 0),
        Commands::Ua { user_agent, json } => commands::ua::ua(&user_agent, json).map(|_| 0),
        Commands::Fetch {
            id,
            source,
            client_app,
            user_agent,
            out,
        } => commands::fetch::fetch(FetchArgs {
            id,
            source,
            client_app,
            user_agent,
            out,
        })
        .await
        .map(|_| 0),
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            ui::error(&format!("{:#}", e));
            std::process::exit(2);
        }
    }
}
