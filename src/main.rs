use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

mod data;
mod filter;
mod models;
mod report;
mod risk;

use filter::StudentFilter;
use models::RiskLevel;

#[derive(Parser)]
#[command(name = "astitva")]
#[command(about = "Student dropout risk tracker and report generator", long_about = None)]
struct Cli {
    /// Dataset to load (.csv or .json); the bundled sample cohort when omitted
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cohort overview with risk distribution and department breakdown
    Summary,
    /// Department-wise risk counts
    Departments,
    /// List students, filtered by search text, risk level and department
    Students {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        risk: Option<RiskLevel>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Show one student's profile with risk explanation and notes
    Profile {
        /// Roll number or email
        #[arg(long)]
        student: String,
    },
    /// Export a CSV report (risk-analysis, high-risk or attendance)
    Export {
        #[arg(long, default_value = report::RISK_ANALYSIS)]
        report: String,
        #[arg(long)]
        department: Option<String>,
        /// Defaults to <report>-report-<date>.csv in the working directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let students = data::load_dataset(cli.data.as_deref())?;

    match cli.command {
        Commands::Summary => {
            print!("{}", report::build_summary(&students));
        }
        Commands::Departments => {
            let stats = risk::department_stats(&students);
            if stats.is_empty() {
                println!("No students loaded.");
                return Ok(());
            }

            println!(
                "{:<12} {:>6} {:>6} {:>8} {:>6}",
                "Department", "Total", "High", "Medium", "Low"
            );
            for summary in stats {
                println!(
                    "{:<12} {:>6} {:>6} {:>8} {:>6}",
                    summary.department,
                    summary.total,
                    summary.high_risk,
                    summary.medium_risk,
                    summary.low_risk
                );
            }
        }
        Commands::Students {
            query,
            risk,
            department,
            limit,
        } => {
            let filter = StudentFilter {
                query,
                risk,
                department,
            };
            let matches = filter.apply(&students);
            if matches.is_empty() {
                println!("No students match the current filters.");
                return Ok(());
            }

            println!("Students ({}):", matches.len());
            for student in matches.iter().take(limit) {
                println!(
                    "- {} ({}, {}) {} risk, attendance {}%, grades {}/10, backs {}, fees {}",
                    student.name,
                    student.roll_no,
                    student.department,
                    student.risk_level,
                    student.attendance,
                    student.grades,
                    student.number_of_backs,
                    student.fee_status()
                );
            }
        }
        Commands::Profile { student } => {
            let needle = student.to_lowercase();
            let found = students
                .iter()
                .find(|candidate| {
                    candidate.roll_no.to_lowercase() == needle
                        || candidate.email.to_lowercase() == needle
                })
                .with_context(|| format!("no student with roll number or email {student:?}"))?;

            println!("{} ({})", found.name, found.roll_no);
            println!("Department: {} (semester {})", found.department, found.semester);
            println!("Email: {}", found.email);
            println!("Phone: {}", found.phone);
            println!("Attendance: {}%", found.attendance);
            println!("Grades: {}/10", found.grades);
            println!("Subject backs: {}", found.number_of_backs);
            println!("Fee status: {}", found.fee_status());
            println!(
                "Risk: {} ({}%)",
                found.risk_level,
                (found.risk_score * 100.0).round()
            );
            println!("{}", found.risk_explanation());

            println!();
            if found.intervention_notes.is_empty() {
                println!("No intervention notes yet.");
            } else {
                println!("Intervention notes:");
                for note in &found.intervention_notes {
                    println!("- {note}");
                }
            }
        }
        Commands::Export {
            report,
            department,
            out,
        } => {
            let rows = report::report_rows(&students, &report, department.as_deref());
            if rows.is_empty() {
                println!("No records match this report.");
                return Ok(());
            }

            let csv = report::to_csv(&rows);
            let out = out.unwrap_or_else(|| PathBuf::from(report::report_filename(&report)));
            std::fs::write(&out, csv)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {} ({} rows).", out.display(), rows.len());
        }
    }

    Ok(())
}
