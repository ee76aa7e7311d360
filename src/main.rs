use clap::{Parser, Subcommand};

mod cmd;
mod money;
mod tax;

#[derive(Parser, Debug)]
#[command(name = "stampduty", version, about = "Calculate UK Stamp Duty on a property purchase")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate stamp duty for a single purchase
    Calc(cmd::calc::CalcCommand),
    /// Show the rate bands for each region
    Rates(cmd::rates::RatesCommand),
    /// Calculate stamp duty for every purchase in a CSV or JSON file
    Batch(cmd::batch::BatchCommand),
    /// Interactive calculator reading commands from stdin
    Session(cmd::session::SessionCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    log::debug!("{:?}", cli.command);

    for config in tax::ALL_CONFIGS {
        config.validate()?;
    }

    match cli.command {
        Command::Calc(calc) => calc.exec(),
        Command::Rates(rates) => rates.exec(),
        Command::Batch(batch) => batch.exec(),
        Command::Session(session) => session.exec(),
    }
}
