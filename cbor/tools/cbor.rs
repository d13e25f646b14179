/*!
cbor-events - trace how a CBOR document decodes

# Commands

- `events`: feed the input to the push decoder in fixed-size chunks and print
  one line per decoded head, indented by nesting depth
- `walk`: use the cursor reader to step over each top-level item and print
  its offset, encoded length and major type

# Examples

```bash
# Print the events of a file, feeding the decoder 3 bytes at a time
cbor-events events --chunk-size 3 bundle.cbor

# Item boundaries of a CBOR sequence read from stdin
cat seq.cbor | cbor-events walk -

# Decoder state transitions only
CBOR_EVENTS_LOG=hardy_cbor_stream::decoder=trace cbor-events events bundle.cbor

# Tighter limits for untrusted input
CBOR_EVENTS__LIMITS__MAX_DEPTH=8 cbor-events walk untrusted.cbor
```
*/

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod events;
mod io;
mod settings;
mod walk;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Trace how CBOR data is decoded, event by event or item by item"
)]
struct Cli {
    /// Configuration file (TOML) with `log_level` and `[limits]`
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Overrides the configured log level
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Overrides the configured maximum nesting depth
    #[arg(long, value_name = "DEPTH")]
    max_depth: Option<usize>,

    /// Overrides the configured maximum string length in bytes
    #[arg(long, value_name = "BYTES")]
    max_length: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print push-decoder events
    Events(events::Command),

    /// Print the boundaries of top-level items
    Walk(walk::Command),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = settings::Settings::load(cli.config.as_deref(), cli.log_level)?;
    if let Some(max_depth) = cli.max_depth {
        settings.limits = settings.limits.with_max_depth(max_depth);
    }
    if let Some(max_length) = cli.max_length {
        settings.limits = settings.limits.with_max_length(max_length);
    }
    settings.init_logger()?;

    match cli.command {
        Commands::Events(args) => args.exec(&settings),
        Commands::Walk(args) => args.exec(&settings),
    }
}
