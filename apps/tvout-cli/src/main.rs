mod app;
mod args;
mod fb;
mod i2c;

use std::process;

use clap::{CommandFactory, Parser};
use tracing_subscriber::FmtSubscriber;

use crate::args::Args;

fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Unrecognized or malformed arguments: name the offender and get
            // out before any device is opened.
            eprint!("{err}");
            process::exit(1);
        }
    };

    let Some(target) = args.target() else {
        // No standard requested, or --help: usage only, no hardware access.
        eprint!("{}", Args::command().render_help());
        return Ok(());
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    app::run(target);
    Ok(())
}
