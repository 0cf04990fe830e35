use clap::Parser;
use cutbench::cli::{Cli, Commands};
use cutbench::config::{EvalConfig, LoggingConfig};
use cutbench::error::Result;
use cutbench::metric_log::{self, training_log_path};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Eval {
            task,
            save_dir,
            min_size,
            max_size,
            data,
            output_dir,
            solve_timeout,
            max_graphs,
        } => {
            let mut cfg = EvalConfig::load_from(&cli.config)?;

            // CLI flags override file/environment configuration
            if let Some(task) = task {
                cfg.task = *task;
            }
            if let Some(dir) = save_dir {
                cfg.save_dir = dir.clone();
            }
            if let Some(v) = min_size {
                cfg.min_size = *v;
            }
            if let Some(v) = max_size {
                cfg.max_size = *v;
            }
            if let Some(path) = data {
                cfg.data = path.clone();
            }
            if let Some(dir) = output_dir {
                cfg.output_dir = Some(dir.clone());
            }
            if let Some(secs) = solve_timeout {
                cfg.solve_timeout_secs = Some(*secs);
            }
            if let Some(cap) = max_graphs {
                cfg.max_graphs = Some(*cap);
            }

            init_logging(&cfg.logging);
            run_eval(&cfg).await?;
        }
        Commands::BestIter {
            task,
            save_dir,
            min_size,
            max_size,
        } => {
            init_logging_simple();
            let log_path = training_log_path(save_dir, *min_size, *max_size);
            let best = metric_log::select_best_iteration(&log_path, task.direction())?;
            println!("iter={} metric={}", best.iteration, best.metric);
        }
    }

    Ok(())
}

#[cfg(feature = "onnx")]
async fn run_eval(cfg: &EvalConfig) -> Result<()> {
    let summary = cutbench::run_evaluation(cfg, cutbench::ml::OnnxSolver::new()).await?;
    println!(
        "{} of {} graphs solved, average objective {:.2}, average solve time {:.4}s",
        summary.successful_count,
        summary.total_graphs,
        summary.average_objective(),
        summary.average_time()
    );
    Ok(())
}

#[cfg(not(feature = "onnx"))]
async fn run_eval(_cfg: &EvalConfig) -> Result<()> {
    Err(cutbench::error::EvalError::NoSolverCapability)
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.clone()));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }
}

fn init_logging_simple() {
    // Minimal logging for diagnostic commands
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}
