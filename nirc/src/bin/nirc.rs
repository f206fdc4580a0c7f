use gumdrop::Options;

use nirc_config::LoadFromEnv;
use nirc_core::{config::Config, connection::TcpConnection, prelude::Client};

#[derive(Debug, gumdrop::Options)]
struct Args {
    /// prints the help message
    help: bool,

    /// read the configuration from a json file instead of the environment
    #[options(meta = "<PATH>")]
    config: Option<String>,

    /// overrides the server address
    #[options(meta = "<HOST:PORT>")]
    address: Option<String>,

    /// log every line received from the server
    log_raw: bool,
}

async fn load_config(args: &Args) -> anyhow::Result<Config> {
    use anyhow::Context as _;

    let mut config = match &args.config {
        Some(path) => {
            let data = tokio::fs::read_to_string(path)
                .await
                .with_context(|| anyhow::anyhow!("cannot read '{path}'"))?;
            serde_json::from_str::<Config>(&data)
                .with_context(|| anyhow::anyhow!("invalid config '{path}'"))?
        }
        None => Config::load_from_env()?,
    };

    if let Some(address) = &args.address {
        config.address = address.clone();
    }
    config.log_raw |= args.log_raw;

    anyhow::ensure!(!config.address.is_empty(), "an address is required");
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse_args_default_or_exit();

    simple_env_load::load_env_from([".dev.env", ".log.env"]);
    alto_logger::TermLogger::new(
        alto_logger::Options::default()
            .with_time(alto_logger::TimeConfig::relative_now())
            .with_style(alto_logger::StyleConfig::SingleLine),
    )?
    .init()?;

    log::info!("loading configuration");
    let mut config = load_config(&args).await?;

    log::info!("connecting to {} (as {})", config.address, config.nick);
    let conn = TcpConnection::connect(&config.address).await?;
    let client = Client::new(conn, config.client_config());

    nirc::join_on_login(&client, config.channels.clone());
    nirc::builtin(&client);

    let listening = client.start();
    nirc::register(&client, &mut config).await?;
    client.clear_password();

    log::info!("listening");
    listening.wait().await
}
