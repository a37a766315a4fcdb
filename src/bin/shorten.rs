use std::time::Duration;

use anyhow::bail;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use url_shortener::{
    LinkError,
    client::ApiClient,
    form::{LinkForm, SubmitOutcome},
    models::TimePeriod,
};

#[derive(Parser)]
#[command(name = "shorten", about = "Create and manage short links")]
struct Cli {
    /// Base URL of the link API
    #[arg(long, env = "SHORTENER_API_URL", default_value = "http://localhost:5000")]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Shorten a long URL
    Create {
        #[arg(long)]
        url: String,
        /// Desired slug; one is generated when omitted
        #[arg(long)]
        slug: Option<String>,
        /// RFC 3339 timestamp after which the link stops resolving
        #[arg(long)]
        expires_on: Option<DateTime<Utc>>,
    },
    /// List all live links
    List,
    /// Show one link
    Get { slug: String },
    /// Delete a link
    Delete { slug: String },
    /// Count clicks on a link
    Clicks {
        slug: String,
        #[arg(long, value_enum, default_value_t = Period::AllTime)]
        period: Period,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Period {
    #[value(name = "24-hours")]
    Last24Hours,
    PastWeek,
    AllTime,
}

impl From<Period> for TimePeriod {
    fn from(period: Period) -> Self {
        match period {
            Period::Last24Hours => TimePeriod::Last24Hours,
            Period::PastWeek => TimePeriod::PastWeek,
            Period::AllTime => TimePeriod::AllTime,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let timeout = Duration::from_secs(cli.timeout_secs);
    let client = ApiClient::new(&cli.api_url, Some(timeout))?;

    match cli.command {
        Command::Create {
            url,
            slug,
            expires_on,
        } => {
            let form = LinkForm::new(client).with_timeout(timeout);
            form.set_long_url(url);
            form.set_slug(slug.unwrap_or_default());
            form.set_expires_on(expires_on);

            match form.submit().await {
                SubmitOutcome::Created(link) => println!("{}", link.short_url),
                SubmitOutcome::Invalid(err)
                | SubmitOutcome::Failed(LinkError::Validation(err)) => {
                    bail!("{}: {err}", err.field())
                }
                SubmitOutcome::Failed(err) => bail!("{err}"),
                SubmitOutcome::Ignored => bail!("a submission is already in flight"),
            }
        }
        Command::List => {
            for link in client.list_links().await? {
                println!("{}\t{}", link.short_url, link.long_url);
            }
        }
        Command::Get { slug } => {
            let link = client.get_link(&slug).await?;
            println!("{}", serde_json::to_string_pretty(&link)?);
        }
        Command::Delete { slug } => {
            client.delete_link(&slug).await?;
            println!("deleted {slug}");
        }
        Command::Clicks { slug, period } => {
            let clicks = client.clicks(&slug, period.into()).await?;
            println!("{} clicks ({})", clicks.count, clicks.time_period.as_str());
        }
    }

    Ok(())
}
