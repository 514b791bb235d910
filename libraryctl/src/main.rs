use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use libraryclient::{image_file_hash, Client, ClientConfig, LibraryRef};

/// CLI tool for interacting with a container library registry
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Registry base URL, overriding the configuration
    #[arg(short, long)]
    url: Option<String>,

    /// Bearer token, overriding the configuration
    #[arg(short, long)]
    token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the effective client configuration
    Info,

    /// Search the library for entities, collections, containers and images
    Search {
        /// Text to search for
        value: String,
    },

    /// Fetch a single record
    Get {
        #[arg(value_enum)]
        kind: Kind,

        /// Identifier, path-like reference or library:// reference
        reference: String,
    },

    /// Create a record
    #[command(subcommand)]
    Create(CreateCommand),

    /// Inspect or change container tags
    #[command(subcommand)]
    Tags(TagsCommand),
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Entity,
    Collection,
    Container,
    Image,
}

#[derive(Subcommand)]
enum CreateCommand {
    Entity {
        name: String,
    },
    Collection {
        name: String,
        /// Identifier of the owning entity
        #[arg(long)]
        entity: String,
    },
    Container {
        name: String,
        /// Identifier of the owning collection
        #[arg(long)]
        collection: String,
    },
    Image {
        /// Identifier of the owning container
        #[arg(long)]
        container: String,

        /// Image file to compute the hash from
        #[arg(short, long, required_unless_present = "hash")]
        file: Option<PathBuf>,

        /// Precomputed image hash (sha256.<hex>)
        #[arg(long, conflicts_with = "file")]
        hash: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },
}

#[derive(Subcommand)]
enum TagsCommand {
    /// List the tags of a container
    List { container: String },

    /// Point tags of a container at an image, replacing existing ones
    Set {
        container: String,
        image: String,
        #[arg(required = true)]
        tags: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = ClientConfig::load().context("Failed to load configuration")?;
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    if let Some(token) = cli.token {
        config.auth_token = Some(token);
    }

    if matches!(cli.command, Commands::Info) {
        return cmd_info(&config);
    }

    debug!("Using registry at {}", config.base_url);
    let client = Client::new(&config).context("Failed to create client")?;

    match cli.command {
        Commands::Info => unreachable!(), // Already handled above
        Commands::Search { value } => print_json(&client.search(&value).await?)?,
        Commands::Get { kind, reference } => cmd_get(&client, kind, &reference).await?,
        Commands::Create(command) => cmd_create(&client, command).await?,
        Commands::Tags(TagsCommand::List { container }) => {
            print_json(&client.get_tags(&container).await?)?
        }
        Commands::Tags(TagsCommand::Set {
            container,
            image,
            tags,
        }) => {
            client.set_tags(&container, &image, &tags).await?;
            println!("Set {} tag(s) on {}", tags.len(), container);
        }
    }

    Ok(())
}

fn cmd_info(config: &ClientConfig) -> Result<()> {
    println!("Registry URL: {}", config.base_url);
    println!(
        "Auth token: {}",
        if config.auth_token.is_some() { "set" } else { "not set" }
    );
    if let Some(timeout) = config.timeout() {
        println!("Timeout: {}s", timeout.as_secs());
    }
    Ok(())
}

// library:// references are turned into the path-like form the registry resolves
fn resolve_reference(kind: Kind, reference: &str) -> Result<String> {
    if !reference.starts_with("library://") {
        return Ok(reference.to_string());
    }
    let library_ref: LibraryRef = reference.parse()?;
    Ok(match kind {
        Kind::Entity => library_ref.entity_ref(),
        Kind::Collection => library_ref.collection_ref(),
        Kind::Container => library_ref.container_ref(),
        Kind::Image => library_ref.image_ref(&library_ref.tags[0]),
    })
}

async fn cmd_get(client: &Client, kind: Kind, reference: &str) -> Result<()> {
    let reference = resolve_reference(kind, reference)?;

    let found = match kind {
        Kind::Entity => client.get_entity(&reference).await?.map(|e| to_json(&e)),
        Kind::Collection => client.get_collection(&reference).await?.map(|c| to_json(&c)),
        Kind::Container => client.get_container(&reference).await?.map(|c| to_json(&c)),
        Kind::Image => client.get_image(&reference).await?.map(|i| to_json(&i)),
    };

    match found {
        Some(json) => {
            println!("{}", json?);
            Ok(())
        }
        None => bail!("{} not found", reference),
    }
}

async fn cmd_create(client: &Client, command: CreateCommand) -> Result<()> {
    match command {
        CreateCommand::Entity { name } => print_json(&client.create_entity(&name).await?),
        CreateCommand::Collection { name, entity } => {
            print_json(&client.create_collection(&name, &entity).await?)
        }
        CreateCommand::Container { name, collection } => {
            print_json(&client.create_container(&name, &collection).await?)
        }
        CreateCommand::Image {
            container,
            file,
            hash,
            description,
        } => {
            let hash = match (hash, file) {
                (Some(hash), _) => hash,
                (None, Some(file)) => image_file_hash(&file)
                    .with_context(|| format!("Failed to hash {}", file.display()))?,
                (None, None) => bail!("either --file or --hash is required"),
            };
            let image = client
                .create_image(&hash, &container, description.as_deref())
                .await?;
            print_json(&image)
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize response")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}
