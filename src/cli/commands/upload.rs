//! Default command - upload polymers from a CSV file into a CRIPT inventory

use console::style;
use miette::Result;
use serde_json::json;
use tabled::{builder::Builder, settings::Style};

use crate::cli::args::Cli;
use crate::cli::helpers::truncate_str;
use crate::cli::prompt::TerminalPrompter;
use crate::core::client::HttpClient;
use crate::core::config::{resolve, NoInput, PartialConfig, Settings};
use crate::core::repository::{MemoryRepository, NodeKind, Repository, SaveOutcome};
use crate::ingest::{upload, RowEvent, UploadSummary};

pub fn run(cli: &Cli) -> Result<()> {
    let partial = PartialConfig::load(&cli.config)?;
    let settings = if cli.no_prompt {
        resolve(partial, &mut NoInput)?
    } else {
        resolve(partial, &mut TerminalPrompter::new())?
    };

    if !settings.path.exists() {
        return Err(miette::miette!(
            "CSV file not found: {}",
            settings.path.display()
        ));
    }

    let quiet = cli.global.quiet;
    if !quiet {
        println!(
            "{} Uploading polymers from {} into inventory {}{}",
            style("→").blue(),
            style(settings.path.display()).yellow(),
            style(&settings.inventory).cyan(),
            if cli.dry_run {
                style(" (dry run)").dim().to_string()
            } else {
                String::new()
            }
        );
        println!();
    }

    let summary = if cli.dry_run {
        let repo = dry_run_repository(&settings);
        run_upload(&repo, &settings, quiet)?
    } else {
        let client = HttpClient::connect(&settings.host, &settings.token)
            .map_err(|e| miette::miette!("{}", e))?;
        run_upload(&client, &settings, quiet)?
    };

    if !quiet {
        print_summary(&summary);
    }

    if cli.dry_run {
        if !quiet {
            print_materials(&summary);
        }
        println!(
            "{}",
            style(format!(
                "Dry run complete. Nothing was sent to {}.",
                settings.host
            ))
            .yellow()
        );
    } else {
        println!("Upload completed");
    }

    Ok(())
}

fn run_upload(repo: &dyn Repository, settings: &Settings, quiet: bool) -> Result<UploadSummary> {
    upload(repo, settings, |event| {
        if !quiet {
            print_row(&event);
        }
    })
    .map_err(|e| miette::miette!("{}", e))
}

/// In-memory stand-in holding the configured group, project and collection
fn dry_run_repository(settings: &Settings) -> MemoryRepository {
    let repo = MemoryRepository::new();
    let group = repo.seed(NodeKind::Group, json!({ "name": settings.group }));
    let project = repo.seed(NodeKind::Project, json!({ "name": settings.project }));
    repo.seed(
        NodeKind::Collection,
        json!({
            "name": settings.collection,
            "group": group,
            "project": project,
        }),
    );
    repo
}

fn print_row(event: &RowEvent<'_>) {
    let verb = match event.outcome {
        SaveOutcome::Created => style("Created").green(),
        SaveOutcome::Updated => style("Updated").yellow(),
    };
    println!(
        "{} Row {}: {} {}",
        style("✓").green(),
        event.line,
        verb,
        style(truncate_str(&event.material.name, 60)).cyan()
    );
}

fn print_summary(summary: &UploadSummary) {
    let report = &summary.report;
    let ancestors = &summary.ancestors;

    println!();
    println!("{}", style("─".repeat(50)).dim());
    println!("{}", style("Upload Summary").bold());
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  Target:             {} / {} / {}",
        ancestors.group.name, ancestors.project.name, ancestors.collection.name
    );
    println!(
        "  Inventory:          {} ({})",
        style(&summary.inventory.name).cyan(),
        summary.inventory_outcome
    );
    println!("  Rows processed:     {}", style(report.rows_processed).cyan());
    println!(
        "  Materials created:  {}",
        style(report.materials_created).green()
    );
    if report.materials_updated > 0 {
        println!(
            "  Materials updated:  {}",
            style(report.materials_updated).yellow()
        );
    }
    println!();
}

fn print_materials(summary: &UploadSummary) {
    if summary.materials.is_empty() {
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(["Row", "Material", "BigSMILES", "Public"]);
    for (index, material) in summary.materials.iter().enumerate() {
        builder.push_record([
            (index + 1).to_string(),
            material.name.clone(),
            truncate_str(material.identifier("bigsmiles").unwrap_or(""), 40),
            if material.public { "yes" } else { "no" }.to_string(),
        ]);
    }
    let table = builder.build().with(Style::rounded()).to_string();
    println!("{}", table);
    println!();
}
