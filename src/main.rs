use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tripcrew::{
    render_markdown_file, run_pipeline, write_deliverables, LlmClient, LlmConfig, PageLayout,
    PipelineConfig, TripRequest, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};

#[derive(Parser)]
#[command(name = "tripcrew")]
#[command(author, version, about = "Draft a travel itinerary with a three-stage LLM pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a destination and write a day-by-day travel plan
    Plan {
        /// Starting city
        #[arg(long = "from", default_value = "India")]
        origin: String,

        /// Destination city
        #[arg(long = "to", default_value = "Rome")]
        destination: String,

        /// Departure date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        depart: Option<NaiveDate>,

        /// Return date (YYYY-MM-DD)
        #[arg(long = "return")]
        return_date: NaiveDate,

        /// Interests that shape the local guide
        #[arg(long, default_value = "Sightseeing, food, and local culture")]
        interests: String,

        /// Directory for Markdown, text and PDF outputs
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Model id; `claude-*` ids use Anthropic, others OpenAI
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Sampling temperature
        #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
        temperature: f64,

        /// Run the location and guide stages at the same time
        #[arg(long)]
        concurrent_research: bool,

        /// Skip PDF rendering
        #[arg(long)]
        no_pdf: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Render a Markdown file to PDF
    Render {
        /// Markdown file to render
        #[arg(short, long)]
        input: PathBuf,

        /// PDF file to write
        #[arg(short, long, default_value = "travel_plan.pdf")]
        output: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            origin,
            destination,
            depart,
            return_date,
            interests,
            output_dir,
            model,
            temperature,
            concurrent_research,
            no_pdf,
            verbose,
        } => {
            setup_logging(verbose);
            let start_date = depart.unwrap_or_else(|| Local::now().date_naive());
            let request = TripRequest::new(origin, destination, start_date, return_date, interests);
            let config = PipelineConfig {
                output_dir,
                concurrent_research,
            };
            plan_trip(request, config, model, temperature, !no_pdf).await
        }
        Commands::Render {
            input,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            let rendered = render_markdown_file(&input, &output, &PageLayout::default())
                .with_context(|| format!("Failed to render {:?}", input))?;
            if rendered.replaced_chars > 0 {
                eprintln!(
                    "Warning: {} unsupported characters were drawn as '?'",
                    rendered.replaced_chars
                );
            }
            Ok(())
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn plan_trip(
    request: TripRequest,
    config: PipelineConfig,
    model: String,
    temperature: f64,
    render_pdf: bool,
) -> Result<()> {
    request.ensure_complete()?;

    let client = LlmClient::new(LlmConfig::from_env(model, temperature)?);
    info!(
        "Planning {} -> {} ({} to {}) with {}",
        request.origin,
        request.destination,
        request.start_date,
        request.end_date,
        client.config().model
    );

    let plan = run_pipeline(&client, &request, &config)
        .await
        .context("Travel planning failed")?;

    println!("{}", plan.text());

    let layout = PageLayout::default();
    let deliverables = write_deliverables(&plan, &config.output_dir, render_pdf, &layout)
        .context("Failed to write travel plan download")?;

    info!("Itinerary: {:?}", plan.markdown_path);
    info!("Text download: {:?}", deliverables.text_path);
    if let Some(pdf) = &deliverables.pdf_path {
        info!("PDF download: {:?}", pdf);
    }
    if let Some(warning) = &deliverables.warning {
        eprintln!("Warning: {}", warning);
    }

    Ok(())
}
