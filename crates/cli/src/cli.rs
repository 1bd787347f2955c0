use clap::Parser;
use runway_config::ActionInputs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "runway")]
#[command(about = "Install, serve, and run an end-to-end test suite in CI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Set an action input, overriding INPUT_<NAME> (repeatable)
    #[arg(long = "input", value_name = "NAME=VALUE", value_parser = parse_input)]
    pub inputs: Vec<(String, String)>,

    /// Shortcut for `--input working-directory=<DIR>`
    #[arg(long, value_name = "DIR")]
    pub working_directory: Option<PathBuf>,
}

impl Cli {
    /// Inputs from the environment with command-line overrides applied
    pub fn action_inputs(&self) -> ActionInputs {
        self.apply_overrides(ActionInputs::from_env())
    }

    pub fn apply_overrides(&self, mut inputs: ActionInputs) -> ActionInputs {
        if let Some(dir) = &self.working_directory {
            inputs.set("working-directory", dir.to_string_lossy());
        }
        for (name, value) in &self.inputs {
            inputs.set(name, value.clone());
        }
        inputs
    }
}

fn parse_input(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_override_environment() {
        let cli = Cli::try_parse_from([
            "runway",
            "--input",
            "record=true",
            "--input",
            "wait-on=http://localhost:3000",
            "--working-directory",
            "web",
        ])
        .unwrap();

        let inputs = cli.apply_overrides(ActionInputs::new().with("record", "false"));

        assert_eq!(inputs.get("record").as_deref(), Some("true"));
        assert_eq!(inputs.get("wait-on").as_deref(), Some("http://localhost:3000"));
        assert_eq!(inputs.get("working-directory").as_deref(), Some("web"));
    }

    #[test]
    fn test_value_may_contain_equals() {
        assert_eq!(
            parse_input("env=host=local").unwrap(),
            ("env".to_string(), "host=local".to_string())
        );
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        assert!(parse_input("record").is_err());
        assert!(parse_input("=true").is_err());
        assert!(Cli::try_parse_from(["runway", "--input", "nope"]).is_err());
    }
}
