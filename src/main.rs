//! cluster-geomap - cluster node map and status lookup
//!
//! This is the composition root that wires together all the components.

use cluster_geomap::adapters::inbound::ConsoleReporter;
use cluster_geomap::adapters::outbound::{
    build_client, build_geo_provider, CorsRelay, HttpClusterSource, HttpFetcher,
};
use cluster_geomap::config::{load_config, Config};
use cluster_geomap::infrastructure::{FixedDelayLimiter, RateLimitConfig};
use cluster_geomap::NodeMapService;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    cfg.validate()?;

    tracing::info!(
        "starting cluster-geomap cluster={} provider={} relay(cluster={}, geo={})",
        cfg.cluster_url,
        cfg.geo_provider,
        cfg.cluster_via_relay,
        cfg.geo_via_relay
    );

    let service = build_service(&cfg)?;

    match cfg.poll_interval() {
        Some(interval) => loop {
            run_cycle(&service, &cfg).await;
            tokio::time::sleep(interval).await;
        },
        None => {
            if !run_cycle(&service, &cfg).await {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

// ===== COMPOSITION ROOT =====

fn build_service(cfg: &Config) -> anyhow::Result<NodeMapService> {
    let client = build_client(cfg.http_timeout())?;
    let relay = CorsRelay::new(cfg.relay_url.clone(), cfg.relay_field.clone());

    let fetcher_for = |via_relay: bool| {
        if via_relay {
            HttpFetcher::relayed(client.clone(), relay.clone())
        } else {
            HttpFetcher::direct(client.clone())
        }
    };

    // Cluster source
    let source = Arc::new(HttpClusterSource::new(
        fetcher_for(cfg.cluster_via_relay),
        cfg.cluster_url.clone(),
    ));

    // Geolocation strategy
    let provider = build_geo_provider(
        cfg.provider_kind()?,
        fetcher_for(cfg.geo_via_relay),
        cfg.geo_base_url.as_deref(),
        cfg.batch_size,
    );

    // Rate limiter
    let limiter = Arc::new(FixedDelayLimiter::new(RateLimitConfig {
        min_interval: cfg.throttle_interval(),
        max_batch: None,
    }));

    Ok(NodeMapService::new(source, provider, limiter))
}

/// Run one fetch cycle and print its outcome. Returns false on failure.
async fn run_cycle(service: &NodeMapService, cfg: &Config) -> bool {
    let outcome = match &cfg.lookup_ids {
        Some(raw) => service
            .lookup(raw)
            .await
            .map(|results| ConsoleReporter::render_lookups(&results)),
        None => service
            .build_map()
            .await
            .map(|view| ConsoleReporter::render_map(&view)),
    };

    match outcome {
        Ok(text) => {
            print!("{}", text);
            true
        }
        Err(e) => {
            tracing::error!("cycle failed: {:?}", e);
            println!("{}", ConsoleReporter::render_failure(&e));
            false
        }
    }
}
