use anyhow::{Context, Result};
use eve_sde_blueprints::{
    assemble::assemble,
    catalog::{Catalog, REQUIRED_TABLES},
    cli::{Cli, Commands},
    fetch::{ResponseCache, SdeClient},
};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    match cli.command {
        Commands::Build {
            output,
            pretty,
            no_cache,
            cache_dir,
        } => {
            let start = Instant::now();

            let cache = if no_cache {
                None
            } else {
                Some(ResponseCache::new(cache_dir)?)
            };
            let mut client = SdeClient::new(cache)?;

            let catalog = Catalog::load(&mut client)?;
            let blueprints = assemble(&catalog);

            let json = if pretty {
                serde_json::to_string_pretty(&blueprints)?
            } else {
                serde_json::to_string(&blueprints)?
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {path:?}"))?;
                    eprintln!(
                        "Wrote {} blueprint records to {:?} in {:.1}s",
                        blueprints.len(),
                        path,
                        start.elapsed().as_secs_f64()
                    );
                }
                None => println!("{json}"),
            }
        }

        Commands::ListTables => {
            println!("Required tables:\n");
            for name in REQUIRED_TABLES {
                println!("  {name}");
            }
        }
    }

    Ok(())
}
