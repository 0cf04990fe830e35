use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::TaskKind;

#[derive(Parser)]
#[command(name = "cutbench")]
#[command(version = "0.1.0")]
#[command(about = "Evaluation harness for pretrained max-cut / vertex-cover solvers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file directory
    #[arg(short, long, default_value = "config")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select the best checkpoint, evaluate a graph corpus, write reports
    Eval {
        /// Task variant
        #[arg(long, value_enum)]
        task: Option<TaskKind>,
        /// Directory holding training logs and checkpoints
        #[arg(long)]
        save_dir: Option<PathBuf>,
        /// Smallest graph size in the training range
        #[arg(long)]
        min_size: Option<u32>,
        /// Largest graph size in the training range
        #[arg(long)]
        max_size: Option<u32>,
        /// JSON corpus of graphs to evaluate
        #[arg(long)]
        data: Option<PathBuf>,
        /// Output directory for report/result files (defaults to save-dir)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Bound each solve call to this many seconds
        #[arg(long)]
        solve_timeout: Option<u64>,
        /// Evaluate at most this many graphs
        #[arg(long)]
        max_graphs: Option<usize>,
    },
    /// Print the best training iteration for a size range and exit
    BestIter {
        /// Task variant
        #[arg(long, value_enum, default_value = "maxcut")]
        task: TaskKind,
        /// Directory holding training logs
        #[arg(long)]
        save_dir: PathBuf,
        /// Smallest graph size in the training range
        #[arg(long)]
        min_size: u32,
        /// Largest graph size in the training range
        #[arg(long)]
        max_size: u32,
    },
}
