//! membw CLI
//! Memory-read throughput across working-set sizes

use std::io::BufRead;

use membw_core::{BenchConfig, Runner, StdoutReporter};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = BenchConfig::from_env()?;

    // Initialize logging; stdout is reserved for results
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true);
    if config.logging.json_output {
        builder.json().try_init().map_err(|e| anyhow::anyhow!(e))?;
    } else {
        builder.try_init().map_err(|e| anyhow::anyhow!(e))?;
    }

    info!("✅ Configuration loaded");
    info!(
        "   Sizes: {}KB..{}KB ({} steps)",
        config.sizes_kb.first().copied().unwrap_or(0),
        config.sizes_kb.last().copied().unwrap_or(0),
        config.sizes_kb.len()
    );
    info!(
        "   Threads: {} | Logical CPUs: {} | Pin core: {:?}",
        config.threads,
        num_cpus::get(),
        config.pin_core
    );

    let pause = config.pause_on_exit;
    let reporter = StdoutReporter;
    let runner = Runner::new(config, &reporter);
    let total = runner.run_all()?;

    println!("Stub to ensure we calculate anything: {}", total);

    if pause {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
    }

    Ok(())
}
