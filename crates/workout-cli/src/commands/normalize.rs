use clap::Args;
use serde::Serialize;
use workout_core::timer::{normalize_time_field, RoundsInput};

use super::{print_json, CliResult};

#[derive(Args)]
pub struct NormalizeArgs {
    /// Raw text as typed into a minutes/seconds or rounds field
    #[arg(allow_hyphen_values = true)]
    value: String,
    /// Treat the value as a rounds field instead of a time field
    #[arg(long)]
    rounds: bool,
}

#[derive(Serialize)]
struct Normalized {
    input: String,
    text: String,
    value: u64,
}

fn normalize(args: &NormalizeArgs) -> Normalized {
    let (text, value) = if args.rounds {
        let mut input = RoundsInput::default();
        input.set(&args.value);
        (input.text().to_string(), input.value())
    } else {
        let text = normalize_time_field(&args.value);
        let value = text.parse().unwrap_or(0);
        (text, value)
    };
    Normalized {
        input: args.value.clone(),
        text,
        value,
    }
}

pub fn run(args: NormalizeArgs) -> CliResult {
    print_json(&normalize(&args))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(value: &str, rounds: bool) -> NormalizeArgs {
        NormalizeArgs {
            value: value.to_string(),
            rounds,
        }
    }

    #[test]
    fn time_field_keeps_two_digits() {
        let out = normalize(&args("1:23x4", false));
        assert_eq!(out.text, "12");
        assert_eq!(out.value, 12);
        assert_eq!(normalize(&args("7", false)).text, "07");
    }

    #[test]
    fn rounds_field_floors_at_one() {
        let out = normalize(&args("-abc", true));
        assert_eq!(out.text, "");
        assert_eq!(out.value, 1);
        assert_eq!(normalize(&args("0012", true)).value, 12);
    }
}
