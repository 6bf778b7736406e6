use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::info;

use ygo_deckdb::cli::Args;
use ygo_deckdb::config::AppConfig;
use ygo_deckdb::core::client::{CardDataSource, ResponseCache, YgoProDeckClient};
use ygo_deckdb::core::deck;
use ygo_deckdb::core::generator::{DatabaseGenerator, GenerationReport};
use ygo_deckdb::core::logging;
use ygo_deckdb::core::resolution::ResolutionEngine;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::layered(args.config.as_deref()).into_diagnostic()?;
    args.apply(&mut config);
    config.validate().into_diagnostic()?;

    let _log_guard = logging::init(args.verbose, args.log_file.as_deref());
    info!("{} v{} starting", ygo_deckdb::NAME, ygo_deckdb::VERSION);

    let deck_list = match &args.input {
        Some(path) => deck::read_deck_list(path)
            .into_diagnostic()
            .wrap_err("Could not load the deck list")?,
        None => {
            info!("No input file given, using the built-in sample deck");
            deck::default_deck_list()
        }
    };
    if deck_list.is_empty() {
        logging::print_warning("The deck list contains no card names");
        return Ok(());
    }

    let cache = if config.client.use_cache {
        ResponseCache::new(
            Some(config.client.cache_dir.clone()),
            config.client.memory_cache_capacity,
        )
    } else {
        ResponseCache::disabled()
    };
    let client = YgoProDeckClient::with_options(
        config.client.base_url.clone(),
        cache,
        Duration::from_millis(config.client.rate_limit_ms),
        Duration::from_secs(config.client.timeout_secs),
    )
    .into_diagnostic()?;

    if args.clear_cache {
        let removed = client.clear_cache().await.into_diagnostic()?;
        logging::print_success(&format!("Cleared {removed} cached responses"));
    }

    let source: Arc<dyn CardDataSource> = Arc::new(client);
    let engine = ResolutionEngine::new(source, config.resolution.similarity_threshold)
        .await
        .into_diagnostic()?;

    let generator = DatabaseGenerator::new(Arc::new(engine), config.output.format)
        .with_title(config.output.title.clone())
        .with_max_workers(config.runtime.max_workers);

    let progress = logging::resolution_progress(deck_list.len() as u64);
    let report = generator
        .generate_with_progress(&deck_list, |_| progress.inc(1))
        .await
        .into_diagnostic()?;
    logging::finish_progress(&progress);

    generator
        .write(&report, &config.output.path)
        .into_diagnostic()
        .wrap_err("Could not write the card database")?;

    if let Some(path) = &config.output.corrections_path {
        if report.corrections.is_empty() {
            info!("No name corrections to write");
        } else {
            deck::write_corrections(&report.corrections, path).into_diagnostic()?;
        }
    }

    print_summary(&report, &config);
    Ok(())
}

fn print_summary(report: &GenerationReport, config: &AppConfig) {
    let mut lines = vec![
        format!("Total cards processed: {}", report.total),
        format!("Exact matches:         {}", report.exact),
        format!("Corrected matches:     {}", report.corrected),
        format!("Not found:             {}", report.not_found),
        String::new(),
        format!("Output saved to: {}", config.output.path.display()),
    ];
    if let (Some(path), false) = (&config.output.corrections_path, report.corrections.is_empty()) {
        lines.push(format!("Name corrections saved to: {}", path.display()));
    }
    logging::print_panel("Database Generation Summary", &lines.join("\n"));

    if report.not_found > 0 {
        logging::print_warning(&format!(
            "{} card(s) could not be found; check their spelling",
            report.not_found
        ));
    }
}
