// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses flags with clap and hands a TrainConfig to Layer 2.
// Nothing here touches tensors or files.

pub mod args;

use anyhow::Result;
use clap::Parser;
use args::TrainArgs;

use crate::application::train_use_case::{TrainConfig, TrainUseCase};

#[derive(Parser, Debug)]
#[command(
    name = "reuters-attention",
    version = "0.1.0",
    about = "Train a GRU topic classifier on Reuters newswires, with or without attention pooling."
)]
pub struct Cli {
    #[command(flatten)]
    pub train: TrainArgs,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config: TrainConfig = self.train.into();
        tracing::info!(
            "Starting {} run on corpus in: {}",
            if config.attention { "attention" } else { "flatten" },
            config.data_dir
        );

        let evaluation = TrainUseCase::new(config).execute()?;
        tracing::info!(
            "Done: test loss {:.6}, accuracy {:.4} over {} samples",
            evaluation.loss,
            evaluation.accuracy,
            evaluation.samples
        );
        Ok(())
    }
}
