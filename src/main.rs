use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use scour::confirm::StdinConfirmer;
use scour::pipeline::{self, PurgeRequest};
use scour::report;
use scour::stamp::RunStamp;
use scour::store::{S3Store, S3StoreConfig};
use scour::window::{ScanWindow, normalize_prefix};

#[derive(Parser, Debug)]
#[command(version, about = "Time-windowed bulk deletion for S3 buckets", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Scan a bucket, preview matching objects, and delete them after
    /// confirmation
    Purge(PurgeArgs),
    /// Summarize a candidates CSV by bucket and folder
    Summarize(SummarizeArgs),
}

#[derive(clap::Args, Debug)]
struct PurgeArgs {
    /// Bucket to operate on
    #[arg(long, env = "AWS_BUCKET_NAME")]
    bucket: String,

    /// Inclusive window start (YYYY-MM-DD or RFC 3339)
    #[arg(long, env = "START_DATE")]
    start: String,

    /// Inclusive window end (a bare date runs through end of day)
    #[arg(long, env = "END_DATE")]
    end: String,

    /// Restrict the scan to keys under this prefix
    #[arg(long, env = "KEY_PREFIX")]
    prefix: Option<String>,

    /// Preview only; no delete calls are issued
    #[arg(long, env = "DRY_RUN")]
    dry_run: bool,

    /// Directory for preview, export, and audit artifacts
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// AWS region (defaults to the provider chain)
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Custom endpoint for S3-compatible stores (MinIO, R2, Spaces)
    #[arg(long, env = "S3_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// Use path-style addressing, required by some S3-compatible stores
    #[arg(long)]
    force_path_style: bool,
}

#[derive(clap::Args, Debug)]
struct SummarizeArgs {
    /// CSV to summarize (schema: s3_uri,uploaded_at)
    #[arg(long)]
    input: PathBuf,

    /// Directory for the summary file
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    // Load a local .env if present; real environment variables win.
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let exit_code = match args.command {
        Command::Purge(purge) => run_purge_command(purge).await,
        Command::Summarize(summarize) => run_summarize_command(summarize),
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scour=info"));
    let fmt_layer = tracing_subscriber::fmt::layer().compact().with_target(false);
    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

async fn run_purge_command(args: PurgeArgs) -> i32 {
    let window = match ScanWindow::parse(&args.start, &args.end) {
        Ok(window) => window,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_recognized_inputs();
            return 2;
        }
    };

    let store = S3Store::new(S3StoreConfig {
        region: args.region,
        endpoint: args.endpoint_url,
        force_path_style: args.force_path_style,
        ..Default::default()
    })
    .await;

    let request = PurgeRequest {
        bucket: args.bucket,
        window,
        prefix: args.prefix.as_deref().and_then(normalize_prefix),
        dry_run: args.dry_run,
        output_dir: args.output_dir,
    };

    match pipeline::run_purge(&store, &StdinConfirmer, &request).await {
        Ok(summary) => {
            print!("{}", summary.render());
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn run_summarize_command(args: SummarizeArgs) -> i32 {
    let totals = match report::tally_csv(&args.input) {
        Ok(totals) => totals,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    match report::write_summary(&args.output_dir, RunStamp::now(), &totals) {
        Ok(path) => {
            println!("Summary written to: {}", path.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn print_recognized_inputs() {
    eprintln!();
    eprintln!("Required inputs (flag / environment variable):");
    eprintln!("  --bucket / AWS_BUCKET_NAME   bucket to operate on");
    eprintln!("  --start  / START_DATE        inclusive start, YYYY-MM-DD or RFC 3339");
    eprintln!("  --end    / END_DATE          inclusive end, YYYY-MM-DD or RFC 3339");
    eprintln!("Optional inputs:");
    eprintln!("  --prefix / KEY_PREFIX        restrict to keys under a prefix");
    eprintln!("  --dry-run / DRY_RUN          preview only, delete nothing");
    eprintln!("  --output-dir                 artifact directory (default: current dir)");
    eprintln!("  --region / AWS_REGION        AWS region");
    eprintln!("  --endpoint-url / S3_ENDPOINT_URL, --force-path-style");
}
