use crate::infra::{parse_date, InMemoryInspectionRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use condition_score::config::AppConfig;
use condition_score::error::AppError;
use condition_score::workflows::inspection::report::write_csv;
use condition_score::workflows::inspection::{
    DefectCatalog, Inspection, InspectionReport, InspectionRequest, InspectionService,
    InspectionServiceError, ObservationKey, SampleSizeTable, ScoringEngine, ScoringPolicy,
    Severity,
};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct SampleSizeArgs {
    /// Total number of units at the property
    #[arg(long)]
    pub(crate) units: u32,
    /// Sample table as `bound:size,...` (defaults to the configured table)
    #[arg(long)]
    pub(crate) table: Option<SampleSizeTable>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Stored inspection (JSON) to score
    #[arg(long)]
    pub(crate) inspection: PathBuf,
    /// Defect catalog (JSON) to score against (defaults to the configured catalog)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Write the findings listing to this CSV file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Total number of units at the demo property
    #[arg(long, default_value_t = 60)]
    pub(crate) units: u32,
    /// Inspection date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Record a missing smoke detector to show a life-threatening failure
    #[arg(long)]
    pub(crate) critical: bool,
}

pub(crate) fn run_sample_size(args: SampleSizeArgs) -> Result<(), AppError> {
    let table = match args.table {
        Some(table) => table,
        None => AppConfig::load()?.scoring.sample_table,
    };

    let sample_size = table
        .resolve(args.units)
        .map_err(InspectionServiceError::from)?;
    println!(
        "Inspect {} of {} units (table: {})",
        sample_size, args.units, table
    );
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        inspection,
        catalog,
        csv,
    } = args;

    let config = AppConfig::load()?;
    let catalog = match catalog {
        Some(path) => DefectCatalog::from_path(path)?,
        None => config.scoring.load_catalog()?,
    };

    let reader = BufReader::new(File::open(&inspection)?);
    let inspection: Inspection = serde_json::from_reader(reader)?;

    let engine = ScoringEngine::new(Arc::new(catalog), config.scoring.policy);
    let report =
        InspectionReport::build(&inspection, &engine).map_err(InspectionServiceError::from)?;
    render_report(&report);

    if let Some(path) = csv {
        write_csv(&report, File::create(&path)?)?;
        println!("\nFindings exported to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        units,
        date,
        critical,
    } = args;
    let inspection_date = date.unwrap_or_else(|| Local::now().date_naive());

    let service = InspectionService::new(
        Arc::new(InMemoryInspectionRepository::default()),
        Arc::new(DefectCatalog::standard()),
        ScoringPolicy::default(),
        SampleSizeTable::standard(),
    );

    println!("Condition inspection demo");
    let inspection = service.start(InspectionRequest {
        property_name: "Riverside Commons".to_string(),
        total_units: units,
        inspector: Some("Demo Inspector".to_string()),
        inspection_date,
    })?;
    let id = inspection.id().clone();
    let sample_size = inspection.sample_size();
    println!(
        "Started {} for {} units; inspecting {} sampled units",
        id, units, sample_size
    );

    for step in scripted_observations(sample_size, critical) {
        let count = service.record_occurrence(&id, step.key, step.delta)?;
        if let Some(note) = step.note {
            service.set_note(&id, step.key, note.to_string())?;
        }
        println!("- {} ({:+}) -> count {}", step.key, step.delta, count);
    }

    println!();
    let report = service.report(&id)?;
    render_report(&report);

    let completed = service.complete(&id, inspection_date)?;
    println!("\nCompleted: {}", completed.summary());
    Ok(())
}

pub(crate) struct ScriptedObservation {
    pub(crate) key: ObservationKey,
    pub(crate) delta: i64,
    pub(crate) note: Option<&'static str>,
}

/// Walkthrough against the built-in catalog, addressed to units inside the sample.
pub(crate) fn scripted_observations(sample_size: u32, critical: bool) -> Vec<ScriptedObservation> {
    let unit = |n: u32| n.min(sample_size.max(1));
    let mut steps = vec![
        ScriptedObservation {
            key: ObservationKey::common(0, 0, Severity::Low, 0),
            delta: 3,
            note: Some("north fence line"),
        },
        ScriptedObservation {
            key: ObservationKey::common(3, 0, Severity::Moderate, 0),
            delta: 1,
            note: None,
        },
        ScriptedObservation {
            key: ObservationKey::unit(unit(1), 4, 0, Severity::Moderate, 1),
            delta: 1,
            note: Some("supply line under vanity"),
        },
        ScriptedObservation {
            key: ObservationKey::unit(unit(2), 4, 1, Severity::Low, 0),
            delta: 2,
            note: None,
        },
        ScriptedObservation {
            key: ObservationKey::unit(unit(2), 4, 1, Severity::Low, 0),
            delta: -1,
            note: None,
        },
        ScriptedObservation {
            key: ObservationKey::unit(unit(3), 4, 3, Severity::Moderate, 0),
            delta: 1,
            note: Some("ceiling stain below upstairs bath"),
        },
    ];

    if critical {
        steps.push(ScriptedObservation {
            key: ObservationKey::unit(unit(3), 4, 2, Severity::Severe, 0),
            delta: 1,
            note: Some("detector removed by resident"),
        });
    }

    steps
}

pub(crate) fn render_report(report: &InspectionReport) {
    let view = &report.inspection;
    let score = &report.score;

    println!("Inspection {} - {}", view.id, view.property_name);
    println!(
        "Inspected {} by {} ({})",
        view.inspection_date,
        view.inspector.as_deref().unwrap_or("unassigned"),
        view.status_label
    );
    println!(
        "Population: {} units, {} sampled",
        score.total_units, score.sample_size
    );

    println!("\nScore");
    println!("- Common area deductions: {:.2}", score.common_score);
    println!(
        "- Sampled unit deductions: {:.2} (extrapolated {:.2})",
        score.total_unit_deduction, score.interior_score
    );
    println!(
        "- Final score: {} {}",
        score.display_score,
        score.verdict_label()
    );
    for reason in &score.failures {
        println!("  - {}", reason.summary());
    }

    if !score.critical_findings.is_empty() {
        println!("\nLife-threatening findings");
        for finding in &score.critical_findings {
            println!(
                "- [{}] {} / {}: {} x{}",
                finding.key.scope.label(),
                finding.category_name,
                finding.item_name,
                finding.description,
                finding.count
            );
        }
    }

    if report.category_deductions.is_empty() {
        println!("\nCategory deductions: none");
    } else {
        println!("\nCategory deductions");
        for entry in &report.category_deductions {
            println!(
                "- {}: {:.2} common, {:.2} unit ({} findings)",
                entry.category_name, entry.common_points, entry.unit_points, entry.findings
            );
        }
    }

    if report.findings.is_empty() {
        println!("\nFindings: none");
        return;
    }

    println!("\nFindings");
    for line in &report.findings {
        println!(
            "- [{}] {} / {} ({}): {} x{} = {:.2}",
            line.scope_label,
            line.category_name,
            line.item_name,
            line.severity_label,
            line.description,
            line.count,
            line.points
        );
        if let Some(note) = &line.note {
            println!("    note: {}", note);
        }
    }
}
