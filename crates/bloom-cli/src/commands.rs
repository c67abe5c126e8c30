use std::path::Path;
use std::sync::Arc;

use bloom_core::models::scores::ScoringResult;
use bloom_instruments::definition::DefinedQuestionnaire;
use bloom_instruments::scoring::AnswerSet;
use bloom_instruments::{get_questionnaire, Questionnaire};
use bloom_records::{AssessmentStore, Correction, NewAssessment};
use bloom_storage::backends::{LocalDocumentStore, S3DocumentStore};
use bloom_storage::DocumentStore;

use crate::cli::{Commands, InitCommand, OutputFormat};
use crate::config::{self, BloomConfig, StorageBackend};
use crate::render;

/// Loaded config plus the questionnaire it selects.
struct Context {
    config: BloomConfig,
    questionnaire: Box<dyn Questionnaire>,
}

impl Context {
    fn load(config_path: Option<&Path>) -> eyre::Result<Self> {
        let config = config::load_config(config_path)?;
        let questionnaire = load_questionnaire(&config)?;
        Ok(Self {
            config,
            questionnaire,
        })
    }

    fn score(&self, answers_path: &Path) -> eyre::Result<ScoringResult> {
        let answers = read_answers(answers_path)?;
        Ok(self.questionnaire.score(&answers, &self.config.scoring)?)
    }
}

pub async fn run(command: Commands, config_path: Option<&Path>) -> eyre::Result<()> {
    match command {
        Commands::Init(cmd) => init(cmd, config_path)?,
        Commands::Score(cmd) => {
            let ctx = Context::load(config_path)?;
            let result = ctx.score(&cmd.answers)?;
            print!("{}", render::scoring_result(ctx.questionnaire.as_ref(), &result, cmd.format)?);
        }
        Commands::Record(cmd) => {
            let ctx = Context::load(config_path)?;
            let result = ctx.score(&cmd.answers)?;

            let mut new = NewAssessment::new(cmd.child, result, cmd.analysis_type.into());
            new.notes = cmd.notes;
            new.image_ref = cmd.image;
            new.confidence = cmd.confidence;

            let record = open_store(&ctx.config).await?.create(new).await?;
            print!("{}", render::record(ctx.questionnaire.as_ref(), &record, cmd.format)?);
        }
        Commands::History(cmd) => {
            let ctx = Context::load(config_path)?;
            let store = open_store(&ctx.config).await?;
            let records = match cmd.analysis_type {
                Some(kind) => store.list_by_type(&cmd.child, kind.into()).await?,
                None => store.list_by_child(&cmd.child).await?,
            };
            print!("{}", render::history(&records, cmd.format)?);
        }
        Commands::Latest(cmd) => {
            let ctx = Context::load(config_path)?;
            let latest = open_store(&ctx.config).await?.get_most_recent(&cmd.child).await?;
            match latest {
                Some(record) => {
                    print!("{}", render::record(ctx.questionnaire.as_ref(), &record, cmd.format)?);
                }
                None => match cmd.format {
                    OutputFormat::Json => println!("null"),
                    OutputFormat::Text => println!("no assessments recorded for {}", cmd.child),
                },
            }
        }
        Commands::Correct(cmd) => {
            let ctx = Context::load(config_path)?;
            let category_scores = match &cmd.answers {
                Some(path) => Some(ctx.score(path)?.category_scores),
                None => None,
            };
            let correction = Correction {
                category_scores,
                notes: cmd.notes,
                ..Default::default()
            };
            let record = open_store(&ctx.config).await?.correct(cmd.id, correction).await?;
            print!("{}", render::record(ctx.questionnaire.as_ref(), &record, cmd.format)?);
        }
        Commands::Delete(cmd) => {
            let ctx = Context::load(config_path)?;
            open_store(&ctx.config).await?.delete(cmd.id).await?;
            println!("deleted {}", cmd.id);
        }
    }
    Ok(())
}

fn init(cmd: InitCommand, config_path: Option<&Path>) -> eyre::Result<()> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    if path.exists() && !cmd.force {
        return Err(eyre::eyre!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }

    let storage = match cmd.s3_bucket {
        Some(bucket) => StorageBackend::S3 {
            bucket,
            region: cmd.region,
        },
        None => StorageBackend::Local { root: cmd.data_dir },
    };
    let config = BloomConfig {
        storage,
        ..Default::default()
    };
    config::save_config(&config, &path)?;
    println!("wrote {}", path.display());
    Ok(())
}

fn load_questionnaire(config: &BloomConfig) -> eyre::Result<Box<dyn Questionnaire>> {
    match &config.questionnaire_path {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| {
                eyre::eyre!("failed to read questionnaire at {}: {e}", path.display())
            })?;
            Ok(Box::new(DefinedQuestionnaire::from_json(&json)?))
        }
        None => Ok(get_questionnaire("sdq")?),
    }
}

fn read_answers(path: &Path) -> eyre::Result<AnswerSet> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read answers at {}: {e}", path.display()))?;
    Ok(AnswerSet::from_json(&json)?)
}

async fn open_store(config: &BloomConfig) -> eyre::Result<AssessmentStore> {
    let backend: Arc<dyn DocumentStore> = match &config.storage {
        StorageBackend::Local { root } => {
            let root = match root {
                Some(r) => r.clone(),
                None => config::default_data_dir()?,
            };
            tracing::debug!(root = %root.display(), "using local document store");
            Arc::new(LocalDocumentStore::new(root))
        }
        StorageBackend::S3 { bucket, region } => {
            let client = match region {
                Some(r) => bloom_storage::client::build_client_for_region(r).await,
                None => bloom_storage::client::build_client().await,
            };
            tracing::debug!(bucket = %bucket, "using S3 document store");
            Arc::new(S3DocumentStore::new(client, bucket.clone()))
        }
    };
    Ok(AssessmentStore::new(backend).with_thresholds(config.scoring.thresholds)?)
}
