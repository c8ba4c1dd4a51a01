use colored::Colorize;
use schema_structs::cli::CommandLineInterface;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "schema_structs=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();

    let command_line_interface = CommandLineInterface::load();
    if !command_line_interface.has_inputs() {
        eprintln!("{}", CommandLineInterface::usage());
        std::process::exit(1);
    }
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}
