use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use ruo::{
    cli::{Cli, Command, ConfigCommand, CountCommand, LikeArg},
    client::{BlogService, ClientConfig, Environment, Pagination},
    config::{GithubToken, RuoConfig, default_config_path, load_config, save_config},
    domain::{LikeAction, PostRef},
    id::{IssueNumber, PostId},
    logging::{LoggingConfig, init_logging},
    result::RuoError,
};
use serde::Serialize;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    if let Command::Config { action } = &cli.command {
        return run_config_command(action, &config_path);
    }

    let config = load_config(&config_path)?.with_token(cli.token.as_deref().map(Into::into));

    let logging = LoggingConfig::from_env()
        .with_file_level(config.log_level.as_deref())
        .verbose(cli.debug);
    let _log_guard = init_logging(logging)
        .map_err(|e| RuoError::GeneralError(format!("Failed to initialize logging: {e}").into()))?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ruo starting up");

    let mut client_config = ClientConfig::from(&config).with_debug_logging(cli.debug);
    if cli.dev {
        client_config = client_config.with_environment(Environment::Development);
    }
    client_config.validate().map_err(RuoError::from)?;

    let service = BlogService::new(client_config).map_err(RuoError::from)?;
    run(&service, cli.command)
        .await
        .wrap_err("request failed")
}

async fn run(service: &BlogService, command: Command) -> Result<(), RuoError> {
    match command {
        Command::Posts(args) => print_json(&service.posts(&args.to_query()).await?),
        Command::Post { number } => print_json(&service.post(IssueNumber::new(number)).await?),
        Command::Categories => print_json(&service.categories().await?),
        Command::Tags => print_json(&service.tags().await?),
        Command::Inspirations(args) => {
            let pagination = Pagination::new(args.page, args.page_size);
            print_json(&service.inspirations(&pagination).await?)
        },
        Command::Page { kind } => print_json(&service.page(&kind).await?),
        Command::Count { what } => {
            let count = match &what {
                CountCommand::Archives => service.archives_count().await?,
                CountCommand::Inspiration => service.inspiration_count().await?,
                CountCommand::Filtered { .. } => {
                    let filter = what.to_filter().unwrap_or_default();
                    service.filtered_archives_count(&filter).await?
                },
            };
            print_json(&count)
        },
        Command::Hot { ids } => {
            let ids: Vec<PostId> = ids.into_iter().map(PostId::new).collect();
            print_json(&service.hot(&ids).await?)
        },
        Command::IncreaseHot { id, title } => {
            let post = PostRef {
                id: PostId::new(id),
                title: title.into(),
            };
            print_json(&service.increase_hot(&post).await?)
        },
        Command::LikeSite { action } => {
            let action = match action {
                LikeArg::Read => LikeAction::Read,
                LikeArg::Increment => LikeAction::Increment,
            };
            print_json(&service.like_site(action).await?)
        },
        Command::Visit { referrer } => print_json(&service.record_visitor(&referrer).await?),
        // handled before the service is built
        Command::Config { .. } => Ok(()),
    }
}

fn run_config_command(action: &ConfigCommand, config_path: &std::path::Path) -> Result<()> {
    match action {
        ConfigCommand::Path => println!("{}", config_path.display()),
        ConfigCommand::Show => {
            let mut config = load_config(config_path)?;
            if !config.token.is_empty() {
                config.token = GithubToken::Whole("<redacted>".into());
            }
            print_json(&config)?;
        },
        ConfigCommand::Init { force } => {
            if config_path.exists() && !force {
                return Err(RuoError::GeneralError(
                    format!(
                        "{} already exists, pass --force to overwrite",
                        config_path.display()
                    )
                    .into(),
                )
                .into());
            }
            save_config(config_path, &RuoConfig::default())?;
            println!("Wrote {}", config_path.display());
        },
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), RuoError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
