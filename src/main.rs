use anyhow::{Context, Result};
use clap::Parser;
use stracegraph::cli::{Cli, OutputFormat};
use stracegraph::{encoder, report, svg_output, EncoderConfig};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(args: &Cli) -> Result<EncoderConfig> {
    let mut config = match &args.config {
        Some(path) => EncoderConfig::from_toml(path)?,
        None => EncoderConfig::builtin()?,
    };

    if let Some(alpha) = args.katz_alpha {
        // An explicit alpha is used as given, even past the convergence bound
        config.centrality.katz_alpha = alpha;
        config.centrality.katz_adaptive = false;
        config
            .validate()
            .context("Invalid value for --katz-alpha")?;
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = load_config(&args)?;
    let graph = encoder::encode_trace(&args.file, args.filter, &config)
        .with_context(|| format!("Failed to encode {}", args.file.display()))?;

    match args.format {
        OutputFormat::Text => print!("{}", report::render_text(&graph)),
        OutputFormat::Csv => {
            print!("{}", report::nodes_csv(&graph));
            println!();
            print!("{}", report::edges_csv(&graph));
        }
    }

    if args.plot {
        let path = svg_output::write_plot(&graph, &args.file, args.filter)?;
        eprintln!("Plot written to {}", path.display());
    }

    Ok(())
}
