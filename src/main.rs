use crate::config::{default_categories, Cli, Command, CleanArgs, PredictArgs, ScrapeArgs, ServeArgs};
use crate::domain::clean::{clean_dataset, read_clean_csv, write_clean_csv};
use crate::domain::dataset::Dataset;
use crate::predict::{predict_price, LinearModel, PredictionInput};
use crate::responses::error_to_response;
use crate::router::{handle, AppState};
use crate::scraper::{scrape_all, HttpPageSource};
use anyhow::Context;
use astra::Server;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod domain;
mod errors;
mod predict;
mod responses;
mod router;
mod scraper;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Scrape(args) => run_scrape(args),
        Command::Clean(args) => run_clean(args),
        Command::Serve(args) => run_serve(args),
        Command::Predict(args) => run_predict(args),
    }
}

fn run_scrape(args: ScrapeArgs) -> anyhow::Result<()> {
    let categories = default_categories();
    let source = HttpPageSource::new(args.timeout(), args.max_attempts)
        .context("building HTTP client")?;

    info!(
        categories = categories.len(),
        max_records = args.max_records,
        stop_page = args.stop_page,
        "🧵 scrape started"
    );

    let crawls = scrape_all(
        &source,
        &categories,
        args.max_records,
        args.stop_page,
        args.pacing(),
    );

    for (category, crawl) in categories.iter().zip(&crawls) {
        let stats = serde_json::to_string(&crawl.stats).unwrap_or_default();
        info!(label = %category.property_type, %stats, "📊 category stats");
    }

    let dataset = Dataset::from_categories(crawls.into_iter().map(|c| c.records));
    dataset
        .write_csv(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    info!(rows = dataset.len(), "✅ FINAL TOTAL RECORDS");
    Ok(())
}

fn run_clean(args: CleanArgs) -> anyhow::Result<()> {
    let raw = Dataset::read_csv(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let clean = clean_dataset(&raw);
    write_clean_csv(&clean, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    Ok(())
}

fn run_serve(args: ServeArgs) -> anyhow::Result<()> {
    let listings = read_clean_csv(&args.data)
        .with_context(|| format!("loading {}", args.data.display()))?;

    // The dashboard still works without a model; only /predict needs it.
    let model = match LinearModel::load(&args.model) {
        Ok(m) => Some(m),
        Err(e) => {
            warn!("price predictor disabled: {e}");
            None
        }
    };

    let state = AppState::new(listings, model);
    info!(addr = %args.bind, rows = state.listings.len(), "Starting server");

    let server = Server::bind(&args.bind).max_workers(args.workers);

    server
        .serve(move |req, _info| match handle(req, &state) {
            Ok(resp) => resp,
            Err(err) => error_to_response(err),
        })
        .context("server ended with error")?;

    info!("Server shut down cleanly.");
    Ok(())
}

fn run_predict(args: PredictArgs) -> anyhow::Result<()> {
    let model = LinearModel::load(&args.model)?;

    let prediction = predict_price(
        &model,
        PredictionInput {
            location: args.location,
            bedrooms: args.bedrooms,
            bathrooms: args.bathrooms,
            size_sqm: args.size,
            amenity_score: args.amenity_score,
        },
    )?;

    println!("Predicted Price: KES {:.0}", prediction.price);
    println!(
        "Estimated Range: KES {:.0} - KES {:.0}",
        prediction.lower, prediction.upper
    );
    Ok(())
}
