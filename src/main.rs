//! neurohr CLI application
//!
//! Command-line interface for the neurohr library.

use clap::{Parser, ValueEnum};
use neurohr::logging::{self, LOG_FILE};
use neurohr::{Config, OpenAiHrSystem, StdConsole};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Action {
    /// Parse vacancy and resume PDFs and rebuild the indexes
    Process,
    /// Find resumes for a vacancy
    SearchResumes,
    /// Find vacancies for a resume
    SearchVacancies,
    /// Interview a candidate for a vacancy
    Interview,
}

#[derive(Parser)]
#[command(name = "neurohr")]
#[command(about = "Interview automation with neural networks")]
#[command(version)]
struct Cli {
    /// Action to perform
    #[arg(long, value_enum)]
    action: Action,

    /// Path to the data directory
    #[arg(long, default_value = "./data")]
    data_path: PathBuf,

    /// Resume ID for vacancy search or interview
    #[arg(long)]
    resume_id: Option<String>,

    /// Vacancy ID for resume search or interview
    #[arg(long)]
    vacancy_id: Option<String>,

    /// Number of search results
    #[arg(long, default_value = "3")]
    count: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(LOG_FILE);

    let cli = Cli::parse();
    let config = Config::from_env().with_data_path(&cli.data_path);
    let system = OpenAiHrSystem::from_config(config)?;

    match cli.action {
        Action::Process => {
            let report = system.process_pdf_files().await;
            log::info!(
                "Processed {} vacancies and {} resumes",
                report.vacancies.records_saved,
                report.resumes.records_saved
            );
        }
        Action::SearchResumes => {
            let Some(vacancy_id) = cli.vacancy_id else {
                println!("Error: vacancy ID is not specified (--vacancy-id)");
                return Ok(());
            };

            let results = system.search_resumes_for_vacancy(&vacancy_id, cli.count).await;
            println!("\nResume search results for vacancy {}:", vacancy_id);
            for result in results {
                println!(
                    "{}. ID: {}, Position: {}, Skills: {}, Similarity score: {:.4}",
                    result.rank,
                    result.id,
                    result.position_title,
                    result.skills.as_deref().unwrap_or_default(),
                    result.score
                );
            }
        }
        Action::SearchVacancies => {
            let Some(resume_id) = cli.resume_id else {
                println!("Error: resume ID is not specified (--resume-id)");
                return Ok(());
            };

            let results = system.search_vacancies_for_resume(&resume_id, cli.count).await;
            println!("\nVacancy search results for resume {}:", resume_id);
            for result in results {
                println!(
                    "{}. ID: {}, Position: {}, Company: {}, Similarity score: {:.4}",
                    result.rank,
                    result.id,
                    result.position_title,
                    result.company.as_deref().unwrap_or_default(),
                    result.score
                );
            }
        }
        Action::Interview => {
            let (Some(resume_id), Some(vacancy_id)) = (cli.resume_id, cli.vacancy_id) else {
                println!("Error: resume ID (--resume-id) and vacancy ID (--vacancy-id) are required");
                return Ok(());
            };

            let mut console = StdConsole;
            if system
                .conduct_interview(&resume_id, &vacancy_id, &mut console)
                .await
                .is_none()
            {
                log::warn!("Interview for resume {} did not produce a report", resume_id);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "neurohr",
            "--action",
            "search-resumes",
            "--vacancy-id",
            "python_dev",
            "--count",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.action, Action::SearchResumes);
        assert_eq!(cli.vacancy_id.as_deref(), Some("python_dev"));
        assert_eq!(cli.count, 5);
        assert_eq!(cli.data_path, PathBuf::from("./data"));
    }

    #[test]
    fn test_action_is_required() {
        assert!(Cli::try_parse_from(["neurohr"]).is_err());
        assert!(Cli::try_parse_from(["neurohr", "--action", "dance"]).is_err());
    }
}
