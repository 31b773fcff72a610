use colored::Colorize;
use grouprecon::commands::command_argument_builder;
use grouprecon::handlers::{
    handle_domains, handle_fetch, handle_probe, handle_urls, init_tracing,
};

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();

    init_tracing();

    let outcome = match chosen_command.subcommand() {
        Some(("fetch", primary_command)) => handle_fetch(primary_command).await,
        Some(("domains", primary_command)) => handle_domains(primary_command).await,
        Some(("urls", primary_command)) => handle_urls(primary_command).await,
        Some(("probe", primary_command)) => handle_probe(primary_command).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = outcome {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
