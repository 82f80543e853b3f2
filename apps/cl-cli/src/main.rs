use clap::{Parser, Subcommand};
use cl_app::{
    AnalysisOptions, AnalysisReport, AnalysisRequest, AppError, AppResult, ReportMemo,
    analysis_service, document_service, query,
};
use cl_plan::{AnalysisSettings, PoolEfficiencyMode};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cl-cli")]
#[command(about = "Cutlist CLI - cut-plan result checking and reporting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a result document and optional settings file
    Validate {
        /// Path to the optimizer result JSON
        document: PathBuf,
        /// Analysis settings (YAML or JSON)
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
    /// Analyze one or more result documents and store the reports
    Analyze {
        /// Paths to optimizer result JSON files
        #[arg(required = true)]
        documents: Vec<PathBuf>,
        /// Analysis settings (YAML or JSON)
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Ignore stored reports and analyze again
        #[arg(long)]
        no_cache: bool,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show per-work-order rows
    WorkOrders {
        document: PathBuf,
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Only rows below this efficiency (percent)
        #[arg(long)]
        below: Option<f64>,
    },
    /// Show per-pool rows of a pooled result
    Pools {
        document: PathBuf,
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Recompute pool efficiency from each pool's cuts
        #[arg(long)]
        recompute: bool,
    },
    /// List profile types cut more than once
    Duplicates { document: PathBuf },
    /// List stored reports for a document
    Reports { document: PathBuf },
    /// Show a stored report
    ShowReport {
        document: PathBuf,
        report_id: String,
    },
    /// Export work-order rows as CSV
    ExportRows {
        document: PathBuf,
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { document, settings } => cmd_validate(&document, settings.as_deref()),
        Commands::Analyze {
            documents,
            settings,
            no_cache,
            json,
        } => cmd_analyze(&documents, settings.as_deref(), !no_cache, json),
        Commands::WorkOrders {
            document,
            settings,
            below,
        } => cmd_work_orders(&document, settings.as_deref(), below),
        Commands::Pools {
            document,
            settings,
            recompute,
        } => cmd_pools(&document, settings.as_deref(), recompute),
        Commands::Duplicates { document } => cmd_duplicates(&document),
        Commands::Reports { document } => cmd_reports(&document),
        Commands::ShowReport {
            document,
            report_id,
        } => cmd_show_report(&document, &report_id),
        Commands::ExportRows {
            document,
            settings,
            output,
        } => cmd_export_rows(&document, settings.as_deref(), output.as_deref()),
    }
}

fn analyze_in_memory(
    document: &Path,
    settings: Option<&Path>,
) -> AppResult<AnalysisReport> {
    let result = document_service::load_result(document)?;
    let settings = document_service::load_settings(settings)?;
    Ok(analysis_service::analyze(&result, &settings))
}

fn cmd_validate(document: &Path, settings: Option<&Path>) -> AppResult<()> {
    println!("Validating document: {}", document.display());
    let result = document_service::load_result(document)?;
    let settings = document_service::load_settings(settings)?;
    document_service::check_settings(&settings)?;

    let summary = document_service::summarize_document(&result);
    println!(
        "  {} cuts, {} segments, {} pieces, {} work orders{}",
        summary.cut_count,
        summary.segment_count,
        summary.piece_count,
        summary.work_order_count,
        if summary.pooled { " (pooled)" } else { "" }
    );
    if let Some(algorithm) = &summary.algorithm {
        println!("  Algorithm: {}", algorithm);
    }

    if summary.issues.is_empty() {
        println!("✓ Document is well-formed");
    } else {
        println!("Found {} issue(s):", summary.issues.len());
        for issue in &summary.issues {
            println!("  - {}", issue);
        }
    }
    Ok(())
}

fn cmd_analyze(
    documents: &[PathBuf],
    settings: Option<&Path>,
    use_cache: bool,
    json: bool,
) -> AppResult<()> {
    let mut memo = ReportMemo::new();

    for document in documents {
        tracing::debug!(document = %document.display(), use_cache, "analyzing");
        let request = AnalysisRequest {
            document_path: document,
            settings_path: settings,
            options: AnalysisOptions {
                use_cache,
                ..Default::default()
            },
        };
        let response = analysis_service::ensure_report_with_memo(&request, Some(&mut memo))?;

        if json {
            let out = serde_json::to_string_pretty(&response.report)
                .map_err(|e| AppError::Export(e.to_string()))?;
            println!("{}", out);
            continue;
        }

        if response.loaded_from_cache {
            println!("✓ Loaded from cache: {}", response.report_id);
        } else {
            println!("✓ Analysis completed: {}", response.report_id);
        }
        print_summary(&response.report);
    }
    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    let summary = query::summarize_report(report);

    println!("\nSummary:");
    println!(
        "  Cuts: {} ({} accepted, {} skipped)",
        summary.cut_count, summary.accepted_cuts, summary.skipped_cuts
    );
    println!(
        "  Efficiency: {:.2}%{}",
        summary.efficiency,
        if summary.is_valid { "" } else { " (partial data)" }
    );
    if let (Some(reported), Some(delta)) = (summary.reported_efficiency, summary.efficiency_delta) {
        println!("  Reported:   {:.2}% (delta {:+.2})", reported, delta);
    }
    println!(
        "  Totals: stock {:.2} m, used {:.2} m, waste {:.2} m",
        report.totals_m.stock_m, report.totals_m.used_m, report.totals_m.waste_m
    );
    println!(
        "  Leftovers: {} reusable ({:.2} {unit}), {} scrap ({:.2} {unit})",
        report.waste.reusable.count,
        report.waste.reusable.total_length,
        report.waste.scrap.count,
        report.waste.scrap.total_length,
        unit = report.length_unit
    );
    println!("  Work orders: {}", summary.work_order_count);
    if summary.pool_count > 0 {
        println!("  Pools: {}", summary.pool_count);
    }

    for error in &report.overall.errors {
        println!("  ! {}", error);
    }
    for skipped in &report.skipped {
        println!("  ! Cut '{}' skipped ({:?})", skipped.cut_id, skipped.reason);
    }
    if report.duplicates.has_duplicates {
        println!("  Note: repeated profile types, see `duplicates`");
    }
}

fn cmd_work_orders(document: &Path, settings: Option<&Path>, below: Option<f64>) -> AppResult<()> {
    let report = analyze_in_memory(document, settings)?;

    let rows: Vec<_> = match below {
        Some(threshold) => query::low_efficiency_rows(&report, threshold),
        None => report.work_orders.iter().collect(),
    };

    if rows.is_empty() {
        println!("No work orders to show");
        return Ok(());
    }

    println!("Work orders:");
    for row in rows {
        let flag = if row.efficiency_report.is_valid {
            ""
        } else {
            "  (invalid)"
        };
        println!(
            "  {:<20} bars={:<4} segments={:<5} efficiency={:>6.2}%{}",
            row.work_order_id, row.stock_count, row.total_segments, row.efficiency, flag
        );
    }
    Ok(())
}

fn cmd_pools(document: &Path, settings: Option<&Path>, recompute: bool) -> AppResult<()> {
    let result = document_service::load_result(document)?;
    let mut settings: AnalysisSettings = document_service::load_settings(settings)?;
    if recompute {
        settings = settings.with_pool_efficiency(PoolEfficiencyMode::Recomputed);
    }
    let report = analysis_service::analyze(&result, &settings);

    let Some(pools) = &report.pools else {
        println!("Result is not pooled");
        return Ok(());
    };

    println!("Profile pools:");
    for pool in pools {
        println!(
            "  {:<20} profile={:<10} work_orders={:<3} bars={:<4} mixed={:<3} efficiency={:>6.2}% ({:?})",
            pool.pool_key,
            pool.profile_type,
            pool.work_order_count,
            pool.stock_count,
            pool.mixed_cuts,
            pool.efficiency,
            pool.efficiency_source
        );
    }
    Ok(())
}

fn cmd_duplicates(document: &Path) -> AppResult<()> {
    let report = analyze_in_memory(document, None)?;

    if !report.duplicates.has_duplicates {
        println!("No repeated profile types");
        return Ok(());
    }

    println!("Repeated profile types:");
    for tally in &report.duplicates.duplicates {
        println!("  {} x{}", tally.profile_type, tally.count);
    }
    Ok(())
}

fn cmd_reports(document: &Path) -> AppResult<()> {
    let reports = analysis_service::list_reports(document)?;

    if reports.is_empty() {
        println!("No stored reports for: {}", document.display());
    } else {
        println!("Stored reports for '{}':", document.display());
        for manifest in reports {
            println!(
                "  {} ({}, {:.2}%, v{})",
                manifest.report_id, manifest.timestamp, manifest.efficiency, manifest.analyzer_version
            );
        }
    }
    Ok(())
}

fn cmd_show_report(document: &Path, report_id: &str) -> AppResult<()> {
    println!("Loading report: {}", report_id);

    let (manifest, report) = analysis_service::load_report(document, report_id)?;
    println!("  Created: {}", manifest.timestamp);
    println!("  Analyzer: v{}", manifest.analyzer_version);
    print_summary(&report);
    Ok(())
}

fn cmd_export_rows(document: &Path, settings: Option<&Path>, output: Option<&Path>) -> AppResult<()> {
    let report = analyze_in_memory(document, settings)?;
    let csv = query::work_order_rows_csv(&report)?;

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} work-order rows to {}",
            report.work_orders.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}
