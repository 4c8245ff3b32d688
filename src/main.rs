use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use plugindata_client::{Caller, OAuth2Data, OAuthKind, PluginData, Scope, ScopeKind};
use plugindata_config::{Config, LogConfig};
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "plugindata", about = "plugindata — plugin OAuth2 and local-data client")]
struct Cli {
    /// Path to a YAML configuration file. `CONVERSEAI_PLUGINDATA_HOST`
    /// overrides its `host`.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Caller identity as JSON; a bare string is sent as a JSON string.
    #[arg(long, value_name = "JSON", global = true, default_value = "\"cli\"")]
    caller: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// OAuth2 credential records.
    #[command(subcommand)]
    Oauth(OauthCommand),
    /// Scoped key/value data.
    #[command(subcommand)]
    Data(DataCommand),
}

#[derive(Subcommand, Debug)]
enum OauthCommand {
    /// Show the record for an oauth type (user / provider).
    Get { kind: OAuthKind },
    /// Create a record from a JSON field set.
    Create {
        kind: OAuthKind,
        #[arg(long, value_name = "JSON")]
        data: String,
    },
    /// Replace a record's fields from a JSON field set.
    Update {
        kind: OAuthKind,
        #[arg(long, value_name = "JSON")]
        data: String,
    },
    /// Remove a record.
    Delete { kind: OAuthKind },
}

#[derive(Args, Debug)]
struct ScopeArgs {
    /// Storage scope (user / provider).
    #[arg(long, default_value = "user")]
    scope: ScopeKind,
    /// Optional scope qualifier.
    #[arg(long)]
    uuid: Option<Uuid>,
}

impl ScopeArgs {
    fn scope(&self) -> Scope {
        Scope::Qualified {
            kind: self.scope,
            uuid: self.uuid,
        }
    }
}

#[derive(Subcommand, Debug)]
enum DataCommand {
    /// Print the value stored under a key.
    Fetch {
        key: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Store a JSON value under a key.
    Store {
        key: String,
        value: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Overwrite a key with an empty object.
    Delete {
        key: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("config error: {e}"))?;
    init_tracing(&config.log);

    let client = PluginData::from_config(&config)?;
    let caller = parse_caller(&cli.caller);

    match cli.command {
        Commands::Oauth(cmd) => cmd_oauth(&client, caller, cmd).await,
        Commands::Data(cmd) => cmd_data(&client, caller, cmd).await,
    }
}

fn init_tracing(log: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn parse_caller(raw: &str) -> Caller {
    serde_json::from_str::<Value>(raw).map_or_else(|_| Caller::from(raw), Caller::from)
}

async fn cmd_oauth(client: &PluginData, caller: Caller, cmd: OauthCommand) -> Result<()> {
    let oauth = client.oauth(caller);
    let envelope = match cmd {
        OauthCommand::Get { kind } => oauth.get(kind).await,
        OauthCommand::Create { kind, data } => oauth.create(kind, parse_oauth(&data)?).await,
        OauthCommand::Update { kind, data } => oauth.update(kind, parse_oauth(&data)?).await,
        OauthCommand::Delete { kind } => oauth.delete(kind).await,
    }
    .map_err(|e| anyhow::anyhow!("oauth request failed: {e}"))?;
    print_json(&serde_json::to_value(&envelope)?)
}

async fn cmd_data(client: &PluginData, caller: Caller, cmd: DataCommand) -> Result<()> {
    let kv = client.local_data(caller);
    let value = match cmd {
        DataCommand::Fetch { key, scope } => kv.fetch::<Value>(key, Some(scope.scope())).await,
        DataCommand::Store { key, value, scope } => {
            let value: Value = serde_json::from_str(&value)
                .map_err(|e| anyhow::anyhow!("value is not valid JSON: {e}"))?;
            kv.store(key, &value, Some(scope.scope())).await
        }
        DataCommand::Delete { key, scope } => kv.delete(key, Some(scope.scope())).await,
    }
    .map_err(|e| anyhow::anyhow!("data request failed: {e}"))?;

    match value {
        Some(v) => print_json(&v),
        None => {
            eprintln!("no value stored");
            Ok(())
        }
    }
}

fn parse_oauth(raw: &str) -> Result<OAuth2Data> {
    serde_json::from_str(raw).map_err(|e| anyhow::anyhow!("invalid oauth2 data: {e}"))
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
