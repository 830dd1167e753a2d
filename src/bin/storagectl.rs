use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use storage_sdk::{StorageClient, StorageSystem};

#[derive(Parser)]
#[command(name = "storagectl")]
#[command(about = "Manage storage registrations on a storage proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    addr: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SystemArgs {
    /// Storage type, e.g. powerflex
    #[arg(long = "type")]
    storage_type: String,
    #[arg(long)]
    endpoint: String,
    #[arg(long)]
    system_id: String,
    #[arg(long)]
    user: String,
    #[arg(long)]
    password: String,
    /// Skip certificate verification when the proxy contacts the array
    #[arg(long)]
    insecure: bool,
}

impl From<SystemArgs> for StorageSystem {
    fn from(args: SystemArgs) -> Self {
        Self {
            storage_type: args.storage_type,
            endpoint: args.endpoint,
            system_id: args.system_id,
            user_name: args.user,
            password: args.password,
            insecure: args.insecure,
        }
    }
}

#[derive(Args)]
struct KeyArgs {
    #[arg(long = "type")]
    storage_type: String,
    #[arg(long)]
    system_id: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a storage system
    Create(SystemArgs),
    /// Replace an existing registration
    Update(SystemArgs),
    /// Show one registration
    Get(KeyArgs),
    /// Show every registration
    List,
    /// Remove a registration
    Delete(KeyArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = StorageClient::new(&cli.addr);

    match cli.command {
        Commands::Create(args) => {
            client.create(&args.into()).await?;
            println!("created");
        }
        Commands::Update(args) => {
            client.update(&args.into()).await?;
            println!("updated");
        }
        Commands::Get(key) => {
            let payload = client.get(&key.storage_type, &key.system_id).await?;
            print_payload(&payload)?;
        }
        Commands::List => {
            let payload = client.list().await?;
            print_payload(&payload)?;
        }
        Commands::Delete(key) => {
            client.delete(&key.storage_type, &key.system_id).await?;
            println!("deleted");
        }
    }

    Ok(())
}

fn print_payload(payload: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    match serde_json::from_slice::<Value>(payload) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", String::from_utf8_lossy(payload)),
    }
    Ok(())
}
