use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use bloom_core::models::assessment::AnalysisType;

#[derive(Parser)]
#[command(
    name = "bloom",
    version,
    about = "Score SDQ screenings and manage a child's assessment history"
)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "BLOOM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file with default settings
    Init(InitCommand),
    /// Score an answers file without saving anything
    Score(ScoreCommand),
    /// Score an answers file and add the result to a child's history
    Record(RecordCommand),
    /// List a child's assessments, newest first
    History(HistoryCommand),
    /// Show a child's most recent assessment
    Latest(LatestCommand),
    /// Re-score a stored assessment from corrected answers
    Correct(CorrectCommand),
    /// Remove a stored assessment
    Delete(DeleteCommand),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AnalysisKind {
    Facial,
    Sdq,
    Combined,
}

impl From<AnalysisKind> for AnalysisType {
    fn from(kind: AnalysisKind) -> Self {
        match kind {
            AnalysisKind::Facial => AnalysisType::Facial,
            AnalysisKind::Sdq => AnalysisType::Sdq,
            AnalysisKind::Combined => AnalysisType::Combined,
        }
    }
}

#[derive(Args)]
pub struct InitCommand {
    /// Keep documents in this S3 bucket instead of on local disk
    #[arg(long, conflicts_with = "data_dir")]
    pub s3_bucket: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    /// Local document directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ScoreCommand {
    /// JSON object mapping item id to response (0, 1 or 2)
    #[arg(long)]
    pub answers: PathBuf,
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct RecordCommand {
    #[arg(long)]
    pub child: String,
    #[arg(long)]
    pub answers: PathBuf,
    #[arg(long, value_enum, default_value = "sdq")]
    pub analysis_type: AnalysisKind,
    #[arg(long)]
    pub notes: Option<String>,
    /// Reference to a facial image already uploaded elsewhere
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long)]
    pub confidence: Option<f64>,
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct HistoryCommand {
    #[arg(long)]
    pub child: String,
    #[arg(long, value_enum)]
    pub analysis_type: Option<AnalysisKind>,
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct LatestCommand {
    #[arg(long)]
    pub child: String,
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct CorrectCommand {
    #[arg(long)]
    pub id: Uuid,
    #[arg(long)]
    pub answers: Option<PathBuf>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct DeleteCommand {
    #[arg(long)]
    pub id: Uuid,
}
