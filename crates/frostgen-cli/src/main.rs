//! Frostgen - Main entry point
//!
//! Generates one FROST validator group and exits.

use std::io::Write;

use frostgen_cli::{write_group, write_report, GeneratorConfig};
use frostgen_dkg::{KeyGenerator, Secp256k1};
use rand::rngs::OsRng;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr; stdout carries the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "frostgen=info,frostgen_cli=info,frostgen_dkg=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    let config = GeneratorConfig::from_env()?;
    let params = config.params()?;

    info!(
        validators = params.participants(),
        threshold = params.threshold(),
        "Starting frostgen v{}",
        env!("CARGO_PKG_VERSION")
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "generating FROST group...")?;

    let mut generator = KeyGenerator::<Secp256k1>::from_params(params);
    let keys = generator.generate(&mut OsRng)?;

    write_report(&mut out, &keys)?;
    write_group(&config.output, &keys.group)?;
    writeln!(out, "wrote frost group to {}!", config.output.display())?;

    Ok(())
}
