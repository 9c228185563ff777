//! `po-gen`: render purchase orders from JSON
//!
//! ```text
//! po-gen sample --variant local > order.json
//! po-gen totals order.json
//! po-gen render order.json --config render.json --out-dir out/
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use po_template::{OrderRequest, PurchaseOrder, PurchaseOrderRenderer, RenderConfig, Variant};
use po_text::format_amount;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "po-gen", version, about = "Generate local and foreign purchase-order PDFs")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an order JSON file to PDF
    Render {
        /// Order JSON: { "variant", "header", "items" }
        order: PathBuf,

        /// Render configuration (asset paths, font)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file; defaults to the order's own file name
        #[arg(short, long, conflicts_with = "out_dir")]
        output: Option<PathBuf>,

        /// Directory for the default file name
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Date printed when the order has no PO date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Print subtotal, tax and grand total
    Totals {
        order: PathBuf,
    },

    /// Print an example order filled with the form defaults
    Sample {
        #[arg(long, value_enum, default_value_t = VariantArg::Local)]
        variant: VariantArg,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    Local,
    Foreign,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Local => Variant::Local,
            VariantArg::Foreign => Variant::Foreign,
        }
    }
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    po_text::parse_iso_date(s).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Render {
            order,
            config,
            output,
            out_dir,
            date,
        } => {
            let path = render(&order, config.as_deref(), output, &out_dir, date)?;
            println!("{}", path.display());
        }
        Command::Totals { order } => {
            let order = load_order(&order)?;
            print!("{}", totals_report(&order)?);
        }
        Command::Sample { variant } => {
            let sample = OrderRequest::sample(variant.into());
            println!("{}", serde_json::to_string_pretty(&sample)?);
        }
    }

    Ok(())
}

fn load_order(path: &Path) -> Result<PurchaseOrder> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read order {}", path.display()))?;
    let request = OrderRequest::from_json(&json)
        .with_context(|| format!("Failed to parse order {}", path.display()))?;
    let order = request
        .into_order()
        .with_context(|| format!("Invalid line item in {}", path.display()))?;
    debug!(variant = %order.variant(), items = order.item_count(), "Loaded order");
    Ok(order)
}

fn render(
    order_path: &Path,
    config_path: Option<&Path>,
    output: Option<PathBuf>,
    out_dir: &Path,
    date: Option<NaiveDate>,
) -> Result<PathBuf> {
    let config = match config_path {
        Some(path) => RenderConfig::from_file(path)?,
        None => RenderConfig::default(),
    };
    let order = load_order(order_path)?;

    let mut renderer =
        PurchaseOrderRenderer::from_config(&config).context("Failed to set up renderer")?;
    if let Some(date) = date {
        renderer = renderer.with_date(date);
    }
    let rendered = renderer.render(&order).context("Failed to render order")?;

    let target = output.unwrap_or_else(|| out_dir.join(&rendered.file_name));
    write_atomically(&target, &rendered.bytes)?;
    info!(path = %target.display(), "Wrote purchase order");
    Ok(target)
}

/// Write through a temporary file in the target directory, then rename it
/// into place. The temporary file is removed if anything fails first.
fn write_atomically(target: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(target)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    Ok(())
}

fn totals_report(order: &PurchaseOrder) -> Result<String> {
    let totals = order.totals()?.rounded();
    let mut report = format!("Total: {}\n", format_amount(totals.subtotal));
    if let Some(tax) = totals.tax {
        report.push_str(&format!("15% VAT: {}\n", format_amount(tax)));
    }
    let currency = match order.variant() {
        Variant::Local => "SAR",
        Variant::Foreign => "USD",
    };
    report.push_str(&format!(
        "Grand Total ({currency}): {}\n",
        format_amount(totals.grand_total)
    ));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "po-gen", "-v", "render", "order.json", "--out-dir", "out", "--date", "2025-08-10",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Render { out_dir, date, output, .. } => {
                assert_eq!(out_dir, PathBuf::from("out"));
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 8, 10));
                assert_eq!(output, None);
            }
            other => panic!("Unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["po-gen", "render", "o.json", "--date", "10/08/2025"]).is_err());
    }

    #[test]
    fn test_totals_report() {
        let local = OrderRequest::sample(Variant::Local).into_order().unwrap();
        let report = totals_report(&local).unwrap();
        assert!(report.starts_with("Total: "));
        assert!(report.contains("15% VAT: "));
        assert!(report.contains("Grand Total (SAR): "));

        let foreign = OrderRequest::sample(Variant::Foreign).into_order().unwrap();
        assert_eq!(
            totals_report(&foreign).unwrap(),
            "Total: 5,684.00\nGrand Total (USD): 5,684.00\n"
        );
    }

    #[test]
    fn test_write_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("PO-1.pdf");
        write_atomically(&target, b"%PDF-1.7").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"%PDF-1.7");

        // Only the persisted file remains
        let entries = std::fs::read_dir(target.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_render_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let order_path = dir.path().join("order.json");
        let sample = OrderRequest::sample(Variant::Foreign);
        std::fs::write(&order_path, serde_json::to_string(&sample).unwrap()).unwrap();

        let config_path = dir.path().join("render.json");
        let config = RenderConfig {
            assets: po_template::AssetPaths::in_dir(dir.path()),
            font: None,
        };
        std::fs::write(&config_path, serde_json::to_string(&config).unwrap()).unwrap();

        let out_dir = dir.path().join("out");
        let path = render(&order_path, Some(config_path.as_path()), None, &out_dir, None).unwrap();
        assert_eq!(path, out_dir.join("Foreign_Purchase_Order.pdf"));
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
}
