//! Session command - interactive calculator that recalculates on every change

use crate::money::{format_gbp, parse_price_input};
use crate::tax::{compute_duty, BuyerStatus, CalculationInput, Region};
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::{self, BufRead, Write};

/// Price shown before the user enters one
const INITIAL_PRICE: Decimal = dec!(10000);

const HELP: &str = "Commands:
  price <amount>     set the property price, e.g. price £300,000
  region <name>      england, scotland, wales or northern-ireland
  status <type>      first, sole or additional
  show               print the current result
  help               print this message
  quit               exit";

#[derive(Args, Debug)]
pub struct SessionCommand {}

/// Current selections. Each change produces a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub price: Decimal,
    pub region: Option<Region>,
    pub status: Option<BuyerStatus>,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            price: INITIAL_PRICE,
            region: None,
            status: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    SetPrice(Decimal),
    SetRegion(Option<Region>),
    SetStatus(BuyerStatus),
    Show,
    Help,
    Quit,
}

impl SessionState {
    fn apply(self, action: &Action) -> SessionState {
        match action {
            Action::SetPrice(price) => SessionState {
                price: *price,
                ..self
            },
            Action::SetRegion(region) => SessionState {
                region: *region,
                ..self
            },
            Action::SetStatus(status) => SessionState {
                status: Some(*status),
                ..self
            },
            Action::Show | Action::Help | Action::Quit => self,
        }
    }

    /// Text shown to the user for the current selections
    pub fn render(&self) -> anyhow::Result<String> {
        let region = self.region.map_or("not selected", |r| r.display());
        let Some(status) = self.status else {
            return Ok(format!(
                "Region: {} | Price: {}\nPlease, choose type first",
                region,
                format_gbp(self.price, 0)
            ));
        };

        let input = CalculationInput::new(self.price, self.region, status);
        let result = compute_duty(&input)?;
        Ok(format!(
            "Region: {} | Price: {} | Type: {}\nStamp duty to pay: {}",
            region,
            format_gbp(self.price, 0),
            status,
            format_gbp(result.duty_owed, 2)
        ))
    }
}

fn parse_action(line: &str) -> Result<Action, String> {
    let line = line.trim();
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    match command.to_lowercase().as_str() {
        "price" | "p" => Ok(Action::SetPrice(parse_price_input(arg))),
        "region" | "r" => {
            let region = Region::from_name(arg);
            if region.is_none() {
                log::warn!("Unknown region '{}'", arg);
            }
            Ok(Action::SetRegion(region))
        }
        "status" | "s" => BuyerStatus::from_name(arg)
            .map(Action::SetStatus)
            .ok_or_else(|| format!("Unknown buyer status '{}'. Use first, sole or additional.", arg)),
        "show" => Ok(Action::Show),
        "help" | "?" => Ok(Action::Help),
        "quit" | "exit" | "q" => Ok(Action::Quit),
        other => Err(format!("Unknown command '{}'. Type 'help' for commands.", other)),
    }
}

/// Drive a session from `input`, writing results to `output` after every change.
pub fn run<R: BufRead, W: Write>(input: R, mut output: W) -> anyhow::Result<SessionState> {
    let mut state = SessionState::default();
    writeln!(output, "Stamp duty calculator. Type 'help' for commands.")?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let action = match parse_action(&line) {
            Ok(action) => action,
            Err(message) => {
                writeln!(output, "{}", message)?;
                continue;
            }
        };

        match action {
            Action::Quit => break,
            Action::Help => writeln!(output, "{}", HELP)?,
            _ => {
                state = state.apply(&action);
                log::debug!("Session state: {:?}", state);
                writeln!(output, "{}", state.render()?)?;
            }
        }
    }

    Ok(state)
}

impl SessionCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        run(stdin.lock(), stdout.lock())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(script: &str) -> (SessionState, String) {
        let mut out = Vec::new();
        let state = run(script.as_bytes(), &mut out).unwrap();
        (state, String::from_utf8(out).unwrap())
    }

    #[test]
    fn asks_for_type_first() {
        let (state, out) = session("price 300000\n");
        assert_eq!(state.status, None);
        assert!(out.contains("Please, choose type first"));
        assert!(!out.contains("Stamp duty to pay"));
    }

    #[test]
    fn recalculates_after_each_change() {
        let (state, out) = session(
            "region england\nstatus sole\nprice £300,000\nstatus additional\n",
        );
        assert_eq!(
            state,
            SessionState {
                price: dec!(300000),
                region: Some(Region::England),
                status: Some(BuyerStatus::Additional),
            }
        );
        assert!(out.contains("Stamp duty to pay: £0.00"));
        assert!(out.contains("Stamp duty to pay: £2,500.00"));
        assert!(out.contains("Stamp duty to pay: £11,500.00"));
    }

    #[test]
    fn wales_additional() {
        let (_, out) = session("region wales\nprice 100000\nstatus additional\n");
        assert!(out.contains("Stamp duty to pay: £4,000.00"));
    }

    #[test]
    fn lone_pound_sign_is_zero() {
        let (state, _) = session("price £\n");
        assert_eq!(state.price, dec!(0));
    }

    #[test]
    fn unknown_region_falls_back_to_england_rates() {
        let (state, out) = session("region mars\nstatus sole\nprice 300000\n");
        assert_eq!(state.region, None);
        assert!(out.contains("Region: not selected"));
        assert!(out.contains("Stamp duty to pay: £2,500.00"));
    }

    #[test]
    fn quit_stops_processing() {
        let (state, _) = session("price 500000\nquit\nprice 600000\n");
        assert_eq!(state.price, dec!(500000));
    }

    #[test]
    fn bad_commands_are_reported() {
        let (state, out) = session("status landlord\nfly\n");
        assert_eq!(state, SessionState::default());
        assert!(out.contains("Unknown buyer status 'landlord'"));
        assert!(out.contains("Unknown command 'fly'"));
    }

    #[test]
    fn parse_actions() {
        assert_eq!(parse_action("p 250,000"), Ok(Action::SetPrice(dec!(250000))));
        assert_eq!(parse_action("region Northern Ireland"), Ok(Action::SetRegion(Some(Region::NorthernIreland))));
        assert_eq!(parse_action("s first"), Ok(Action::SetStatus(BuyerStatus::FirstTime)));
        assert_eq!(parse_action("  show  "), Ok(Action::Show));
        assert_eq!(parse_action("exit"), Ok(Action::Quit));
    }
}
