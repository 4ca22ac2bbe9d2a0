//! Travel log example
//!
//! This example demonstrates:
//! - Opening the service from an optional YAML config (first argument)
//! - Creating, updating and removing locations
//! - Filtering and sorting the list, with distances from a user position
//! - Rating and recency statistics as percentage segments
//!
//! Run with `RUST_LOG=travel_tip=debug` to see the service logs.

use anyhow::Result;
use travel_tip::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("🗺️  Travel Tip Example");
    println!("======================\n");

    // Load configuration
    let config = match std::env::args().nth(1) {
        Some(path) => ServiceConfig::from_yaml_file(&path)?,
        None => ServiceConfig::default(),
    };
    println!("✅ Storage backend: {:?}\n", config.storage);

    let log = TravelLog::from_config(config).await?;
    let store = log.store();

    println!("📋 Creating locations...");
    let seed = [
        ("Cafe Hafuch", 5, 32.0853, 34.7818),
        ("Jaffa Port", 4, 32.0543, 34.7516),
        ("Carmel Market", 3, 32.0686, 34.7689),
        ("Cafe Xoho", 2, 32.0790, 34.7705),
        ("Old Bus Station", 1, 32.0557, 34.7796),
    ];
    let mut created = Vec::new();
    for (name, rate, lat, lng) in seed {
        let loc = store
            .create(LocationDraft::new(name, rate, GeoPoint::new(lat, lng)))
            .await?;
        println!("   ✅ {} ({}★) {}", loc.name, loc.rate, loc.id);
        created.push(loc);
    }

    // A draft with a bad rating is rejected and nothing is stored
    let rejected = store
        .create(LocationDraft::new("Nowhere", 9, GeoPoint::new(0.0, 0.0)))
        .await;
    if let Err(e) = rejected {
        println!("   ❌ Rejected draft: {} [{}]", e, e.error_code());
    }

    println!("\n✏️  Updating and removing...");
    let mut market = created[2].clone();
    market.rate = 4;
    let market = store.update(market).await?;
    println!("   ✅ {} is now {}★", market.name, market.rate);
    store.remove(&created[4].id).await?;
    println!("   🗑️  Removed {}", created[4].name);

    println!("\n🔍 Cafes rated 2+, best first, distance from Dizengoff Square:");
    let params = QueryParams::from_pairs([("txt", "CAFE"), ("minRate", "2")])?;
    let cafes = log
        .query(&params.filter_criteria(), &SortCriteria::desc("rate"))
        .await?;
    let here = LatLng::new(32.0778, 34.7740);
    for entry in TravelLog::with_distances(cafes, Some(here)) {
        println!(
            "   - {} ({}★) {} km",
            entry.location.name,
            entry.location.rate,
            entry.distance_km.unwrap_or_default()
        );
    }

    println!("\n📊 By rating:");
    print_segments(&log.rating_stats().await?);

    println!("\n🕒 By recency:");
    print_segments(&log.recency_stats().await?);

    Ok(())
}

fn print_segments(counts: &TierCounts) {
    for segment in counts.segments() {
        println!(
            "   {:<8} {:>2} record(s)  {:>3}% → {:>3}%",
            segment.label, segment.count, segment.start, segment.end
        );
    }
    println!("   total    {:>2}", counts.total());
}
