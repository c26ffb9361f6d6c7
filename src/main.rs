use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

use s3_crud_demo::config::{Config, StorageOverrides};
use s3_crud_demo::operations;
use s3_crud_demo::storage::{ObjectStore, S3Client};
use s3_crud_demo::types::{StorageError, StorageResult};
use s3_crud_demo::utils::init_logger;

#[derive(Debug, Parser)]
#[command(name = "s3-crud-demo", version, about = "Bucket and object CRUD against S3-compatible storage")]
struct Cli {
    /// Region name (overrides S3_REGION)
    #[arg(long, global = true)]
    region: Option<String>,

    /// Custom endpoint URL, e.g. a MinIO server (overrides S3_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Credentials file in shared-credentials INI format (overrides S3_CREDENTIALS_FILE)
    #[arg(long, global = true)]
    credentials_file: Option<PathBuf>,

    /// Profile section to read from the credentials file (overrides S3_PROFILE)
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Use path-style addressing
    #[arg(long, global = true)]
    path_style: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a bucket (if missing) and print its location
    CreateBucket {
        /// Bucket name; a random my-first-s3-bucket-<uuid> name is used when omitted
        #[arg(long)]
        name: Option<String>,
    },
    /// List all buckets
    ListBuckets,
    /// List the objects in a bucket
    ListObjects {
        bucket: String,
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Upload a local file, or the built-in sample text
    Upload {
        bucket: String,
        key: String,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Download an object; text is printed, anything else is saved
    Download {
        bucket: String,
        key: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Delete one object
    DeleteObject { bucket: String, key: String },
    /// Delete one bucket
    DeleteBucket { bucket: String },
    /// Delete every bucket that holds no objects
    DeleteEmptyBuckets,
}

impl Cli {
    fn overrides(&self) -> StorageOverrides {
        StorageOverrides {
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            credentials_file: self.credentials_file.clone(),
            profile: self.profile.clone(),
            path_style: self.path_style,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match connect(cli.overrides()) {
        Ok(client) => run(&client, cli.command, &mut out).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("Operation failed: {}", e);
        operations::print_error(&e, &mut out)?;
        out.flush()?;
        process::exit(1);
    }

    Ok(())
}

fn connect(overrides: StorageOverrides) -> StorageResult<S3Client> {
    let mut config = Config::from_env().map_err(StorageError::setup)?;
    config.storage.apply(overrides);
    info!("Configuration loaded: {:?}", config.storage);

    S3Client::connect(&config.storage)
}

async fn run<W: Write>(store: &dyn ObjectStore, command: Command, out: &mut W) -> StorageResult<()> {
    match command {
        Command::CreateBucket { name } => {
            operations::create_bucket(store, name.as_deref(), out).await?;
        }
        Command::ListBuckets => {
            operations::list_buckets(store, out).await?;
        }
        Command::ListObjects { bucket, prefix } => {
            operations::list_objects(store, &bucket, prefix.as_deref(), out).await?;
        }
        Command::Upload { bucket, key, file } => {
            operations::upload_file(store, &bucket, &key, file.as_deref(), out).await?;
        }
        Command::Download { bucket, key, output } => {
            operations::download_object(store, &bucket, &key, output.as_deref(), out).await?;
        }
        Command::DeleteObject { bucket, key } => {
            operations::delete_object(store, &bucket, &key, out).await?;
        }
        Command::DeleteBucket { bucket } => {
            operations::delete_bucket(store, &bucket, out).await?;
        }
        Command::DeleteEmptyBuckets => {
            operations::delete_empty_buckets(store, out).await?;
        }
    }
    Ok(())
}
