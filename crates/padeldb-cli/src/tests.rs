use super::*;
use crate::commands::{best_prices, parse_rackets, run_best_price, run_normalize, RunOptions};
use padeldb_core::{PriceResolver, NO_PRICE_AVAILABLE};
use rust_decimal::Decimal;

const DUMP: &str = r#"[
    {
        "id": 1,
        "name": "Nox AT10",
        "on_offer": true,
        "padelnuestro_actual_price": 200,
        "padelnuestro_link": "pn",
        "padelmarket_actual_price": 180,
        "padelmarket_original_price": 220,
        "padelmarket_discount_percentage": 18,
        "padelmarket_link": "pm",
        "padelproshop_actual_price": null
    },
    {
        "id": 2,
        "name": "Head Delta",
        "scraped_at": "2025-01-05T10:00:00.000Z",
        "padelmarket_actual_price": 0
    }
]"#;

fn write_dump(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("padeldb-cli-{}-{name}.json", std::process::id()));
    std::fs::write(&path, DUMP).expect("write dump");
    path
}

#[test]
fn parses_normalize_command() {
    let cli = Cli::try_parse_from(["padeldb-cli", "normalize", "dump.json", "--pretty"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Normalize(args) => {
            assert_eq!(args.path, PathBuf::from("dump.json"));
            assert!(args.pretty);
            assert!(args.now.is_none());
        }
        Commands::BestPrice(_) => panic!("expected normalize"),
    }
}

#[test]
fn parses_best_price_with_sources() {
    let cli = Cli::try_parse_from([
        "padeldb-cli",
        "best-price",
        "-",
        "--sources",
        "padelmarket,padelnuestro",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::BestPrice(InputArgs { sources: Some(ref s), .. }) if s == "padelmarket,padelnuestro"
    ));
}

#[test]
fn missing_path_is_rejected() {
    assert!(Cli::try_parse_from(["padeldb-cli", "normalize"]).is_err());
}

#[test]
fn missing_command_is_rejected() {
    assert!(Cli::try_parse_from(["padeldb-cli"]).is_err());
}

#[test]
fn run_options_reject_bad_sources() {
    let result = RunOptions::new(PathBuf::from("-"), Some("padel market"), None, false);
    assert!(result.is_err());
}

#[test]
fn run_options_reject_bad_timestamp() {
    let result = RunOptions::new(PathBuf::from("-"), None, Some("yesterday"), false);
    assert!(result.is_err());
}

#[test]
fn parse_rackets_rejects_non_array() {
    assert!(parse_rackets(r#"{"id": 1}"#).is_err());
}

#[test]
fn best_prices_keeps_order_and_picks_cheapest() {
    let rackets = parse_rackets(DUMP).expect("valid dump");
    let rows = best_prices(&PriceResolver::default(), rackets);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, 1);
    assert_eq!(rows[0].price.fuente, "padelmarket");
    assert_eq!(rows[0].price.precio_actual, Decimal::new(180, 0));
    assert_eq!(rows[0].price.precio_original, Some(Decimal::new(220, 0)));
    assert_eq!(rows[1].price.fuente, NO_PRICE_AVAILABLE);
}

#[test]
fn normalize_reads_file_and_stamps_missing_timestamps() {
    let path = write_dump("normalize");
    let options = RunOptions::new(path.clone(), None, Some("2025-02-14T09:30:00Z"), false)
        .expect("valid options");

    let out = run_normalize(&options).expect("normalize succeeds");
    std::fs::remove_file(&path).ok();

    let json: serde_json::Value = serde_json::from_str(&out).expect("json output");
    assert_eq!(json[0]["scrapeado_en"], "2025-02-14T09:30:00.000Z");
    assert_eq!(json[0]["enlace"], "pm");
    assert_eq!(json[0]["on_offer"], true);
    assert_eq!(json[1]["scrapeado_en"], "2025-01-05T10:00:00.000Z");
    assert_eq!(json[1]["precio_actual"].as_f64(), Some(0.0));
}

#[test]
fn best_price_honours_source_order() {
    let path = write_dump("best-price");
    let options = RunOptions::new(path.clone(), Some("padelnuestro"), None, true)
        .expect("valid options");

    let out = run_best_price(&options).expect("best-price succeeds");
    std::fs::remove_file(&path).ok();

    let json: serde_json::Value = serde_json::from_str(&out).expect("json output");
    assert_eq!(json[0]["id"], 1);
    assert_eq!(json[0]["fuente"], "padelnuestro");
    assert_eq!(json[0]["precio_actual"].as_f64(), Some(200.0));
    assert!(json[0].get("scrapeado_en").is_none());
}

#[test]
fn missing_file_is_an_error() {
    let options = RunOptions::new(PathBuf::from("/nonexistent/padeldb.json"), None, None, false)
        .expect("valid options");
    assert!(run_normalize(&options).is_err());
}
