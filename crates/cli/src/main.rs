use casedx_core::{
    audit_case, classify_feedback, compute_score, parse_review, FeedbackKind, FeedbackSection,
};
use casedx_wire::{read_case_file, read_selection_file};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "casedx")]
#[command(about = "Clinical case review engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a case file for authoring defects
    Validate {
        /// Path to the case JSON file
        case: PathBuf,
    },
    /// Score a selection against a case
    Score {
        /// Path to the case JSON file
        case: PathBuf,
        /// Path to the selection JSON file
        selection: PathBuf,
    },
    /// Show feedback sections for a selection
    Feedback {
        /// Path to the case JSON file
        case: PathBuf,
        /// Path to the selection JSON file
        selection: PathBuf,
    },
    /// Show the parsed review narrative for a case
    Review {
        /// Path to the case JSON file
        case: PathBuf,
    },
}

fn kind_label(kind: FeedbackKind) -> &'static str {
    match kind {
        FeedbackKind::Success => "success",
        FeedbackKind::Error => "error",
        FeedbackKind::Info => "info",
    }
}

fn print_sections(category: &str, sections: &[FeedbackSection]) {
    println!("{category}:");
    if sections.is_empty() {
        println!("  (no sections)");
        return;
    }
    for section in sections {
        println!("  [{}] {}", kind_label(section.kind), section.title);
        for item in &section.items {
            println!("    - {item}");
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("casedx=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate { case }) => {
            let case = read_case_file(&case)?;
            let defects = audit_case(&case);
            if defects.is_empty() {
                println!("No defects found.");
            } else {
                println!("{} defect(s) found:", defects.len());
                for defect in &defects {
                    println!("  - {defect}");
                }
                std::process::exit(1);
            }
        }
        Some(Commands::Score { case, selection }) => {
            let case = read_case_file(&case)?;
            let selection = read_selection_file(&selection)?;
            let breakdown = compute_score(&case, &selection);
            println!("tests:     {:.1}", breakdown.tests);
            println!("diagnosis: {:.1}", breakdown.diagnosis);
            println!("treatment: {:.1}", breakdown.treatment);
            println!("total:     {:.1}", breakdown.total);
        }
        Some(Commands::Feedback { case, selection }) => {
            let case = read_case_file(&case)?;
            let selection = read_selection_file(&selection)?;
            let feedback = classify_feedback(&case, &selection);
            print_sections("Tests", &feedback.tests);
            print_sections("Diagnosis", &feedback.diagnosis);
            print_sections("Treatment", &feedback.treatment);
        }
        Some(Commands::Review { case }) => {
            let case = read_case_file(&case)?;
            let content = parse_review(&case.review);

            println!("Diagnosis landing:");
            for insight in &content.diagnosis_landing {
                println!("  {}: {}", insight.title, insight.description);
            }

            println!("Test rationale:");
            for rationale in &content.test_rationale {
                if rationale.priority.is_empty() {
                    println!("  {}: {}", rationale.name, rationale.description);
                } else {
                    println!(
                        "  {} ({}): {}",
                        rationale.name, rationale.priority, rationale.description
                    );
                }
            }

            println!("Treatment sequencing:");
            for step in &content.treatment_sequencing {
                println!("  {}. {}: {}", step.step, step.title, step.description);
            }

            println!("Rejected differentials:");
            for rejected in &content.differential_rejection {
                println!("  {}: {}", rejected.diagnosis_name, rejected.reasoning);
            }

            println!("Core insight:");
            println!("  Reasoning: {}", content.core_insight.clinical_reasoning);
            println!("  Takeaway:  {}", content.core_insight.key_takeaway);
            for trap in &content.core_insight.traps_to_avoid {
                println!("  Avoid:     {trap}");
            }
        }
        None => {
            println!("Use 'casedx --help' for commands");
        }
    }

    Ok(())
}
