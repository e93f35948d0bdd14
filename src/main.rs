use clap::Parser;
use quote_engine::utils::{logger, validation::Validate};
use quote_engine::{
    CliConfig, DocumentCache, FileDocumentStore, PlainTextRenderer, PricingEngine, QuoteAssembler,
    QuoteError, QuoteRequest, RateCatalog,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting quote-engine CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    match run(&config).await {
        Ok(path) => {
            tracing::info!("✅ Quotation completed successfully!");
            tracing::info!("📁 Document saved to: {}", path);
            println!("✅ Quotation completed successfully!");
            println!("📁 Document saved to: {}", path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Quotation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                quote_engine::utils::error::ErrorSeverity::Low => 2,
                quote_engine::utils::error::ErrorSeverity::Medium => 2,
                quote_engine::utils::error::ErrorSeverity::High => 1,
                quote_engine::utils::error::ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(config: &CliConfig) -> Result<String, QuoteError> {
    let request = QuoteRequest::from_file(&config.input)?;
    request.validate()?;

    let engine = PricingEngine::new(RateCatalog::default());
    let estimate = engine.estimate(&request.service)?;

    tracing::info!(
        "Estimate: {:.2} EUR{}",
        estimate.total_price,
        if estimate.is_recurring_monthly {
            " per month"
        } else {
            ""
        }
    );
    for line in &estimate.breakdown {
        tracing::info!("  {:<50} {:>10.2}", line.label, line.amount);
    }

    let assembler = QuoteAssembler::default();
    let outcome = assembler.assemble(
        &estimate,
        request.service_details(&estimate.unit_label),
        request.customer.clone(),
        request.company.clone(),
        request.notes.clone(),
    )?;
    for warning in &outcome.warnings {
        tracing::warn!("{}", warning.message());
    }
    tracing::info!(
        "Quote {} assembled: {:.2} EUR incl. {:.2} EUR VAT",
        outcome.quote.number,
        outcome.quote.total_amount,
        outcome.quote.vat_amount
    );

    let store = FileDocumentStore::new(config.cache_file());
    let cache = DocumentCache::new(
        store,
        chrono::Duration::seconds(config.cache_ttl_seconds),
        config.cache_capacity,
    );
    let renderer = PlainTextRenderer::new();
    let document = cache.get_or_render(&outcome.quote, &renderer).await?;
    if document.from_cache {
        tracing::info!("Served from document cache");
    }

    let output_file = std::path::Path::new(&config.output_path).join(&document.filename);
    if let Some(parent) = output_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output_file, &document.bytes)?;

    Ok(output_file.display().to_string())
}
