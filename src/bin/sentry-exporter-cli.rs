use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sentry-exporter-cli")]
#[command(about = "Management CLI for a running sentry_exporter", long_about = None)]
struct Cli {
    /// Base URL of the exporter.
    #[arg(short, long, default_value = "http://localhost:9412")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reload the exporter configuration and wait for the result
    Reload,
    /// Run one probe and print the metric lines
    Probe {
        /// Target passed to the module's prober
        #[arg(short, long)]
        target: String,

        /// Module to probe with
        #[arg(short, long, default_value = "sentry")]
        module: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Reload => client.post(format!("{base}/-/reload")).send().await?,
        Commands::Probe { target, module } => {
            client
                .get(format!("{base}/probe"))
                .query(&[("target", target.as_str()), ("module", module.as_str())])
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: exporter returned status {}", status);
        if !text.is_empty() {
            eprint!("{}", text);
        }
        return Ok(ExitCode::FAILURE);
    }

    if text.is_empty() {
        println!("OK");
    } else {
        print!("{}", text);
    }
    Ok(ExitCode::SUCCESS)
}
