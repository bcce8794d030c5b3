//! Interactive configuration on the terminal.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::warn;

use ticketing_core::{load_config, save_config, validate_config, TicketingConfig};

/// Ask a yes/no question until the answer is one of the two.
pub fn ask_yes_no<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<bool> {
    loop {
        let answer = read_answer(input, output, question)?;
        match answer.to_ascii_lowercase().as_str() {
            "yes" | "y" => return Ok(true),
            "no" | "n" => return Ok(false),
            _ => writeln!(output, "Please answer 'yes' or 'no'.")?,
        }
    }
}

/// Ask for a positive integer until one is entered.
pub fn prompt_positive<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<u64> {
    loop {
        let answer = read_answer(input, output, question)?;
        match answer.parse::<u64>() {
            Ok(value) if value > 0 => return Ok(value),
            Ok(_) => writeln!(output, "Value must be greater than 0. Please try again.")?,
            Err(_) => writeln!(output, "Invalid input. Please enter a positive whole number.")?,
        }
    }
}

/// Build a configuration from the terminal.
///
/// Offers the configuration saved at `saved_path` first. A freshly entered
/// configuration is re-entered until it validates, and may then be saved.
pub fn configure<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    saved_path: &Path,
) -> Result<TicketingConfig> {
    writeln!(output, "Welcome to the Real-Time Event Ticketing System Configuration!")?;

    if ask_yes_no(input, output, "Do you want to load the previous configuration? (yes/no): ")? {
        match load_config(saved_path).and_then(|config| validate_config(&config).map(|_| config)) {
            Ok(config) => {
                writeln!(output, "\n--- Loaded Configuration ---")?;
                print_config(output, &config)?;
                return Ok(config);
            }
            Err(e) => {
                warn!("Could not use saved configuration: {}", e);
                writeln!(output, "Could not load previous configuration ({e}). Please enter a new one.")?;
            }
        }
    }

    let config = loop {
        let config = read_config(input, output)?;
        match validate_config(&config) {
            Ok(()) => break config,
            Err(e) => writeln!(output, "Configuration Error: {e}\nPlease enter the configuration again.")?,
        }
    };

    writeln!(output, "\n--- Configuration Summary ---")?;
    print_config(output, &config)?;

    if ask_yes_no(input, output, "Do you want to save this configuration? (yes/no): ")? {
        match save_config(&config, saved_path) {
            Ok(()) => writeln!(output, "Configuration saved to {}.", saved_path.display())?,
            Err(e) => {
                warn!("Failed to save configuration: {}", e);
                writeln!(output, "Could not save configuration: {e}")?;
            }
        }
    }

    writeln!(output, "\n--- System Ready ---")?;
    Ok(config)
}

fn read_config<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<TicketingConfig> {
    let total_tickets = prompt_positive(input, output, "Enter total number of tickets: ")?;
    let release_rate_ms = prompt_positive(input, output, "Enter ticket release rate (ms): ")?;
    let retrieval_rate_ms = prompt_positive(input, output, "Enter customer retrieval rate (ms): ")?;
    let max_capacity = prompt_positive(input, output, "Enter maximum ticket capacity: ")?;

    Ok(TicketingConfig::new(
        usize::try_from(total_tickets).context("total tickets out of range")?,
        release_rate_ms,
        retrieval_rate_ms,
        usize::try_from(max_capacity).context("max capacity out of range")?,
    ))
}

fn print_config<W: Write>(output: &mut W, config: &TicketingConfig) -> Result<()> {
    writeln!(output, "Total Tickets: {}", config.total_tickets)?;
    writeln!(output, "Ticket Release Rate: {} ms", config.release_rate_ms)?;
    writeln!(output, "Customer Retrieval Rate: {} ms", config.retrieval_rate_ms)?;
    writeln!(output, "Max Ticket Capacity: {}", config.max_capacity)?;
    Ok(())
}

fn read_answer<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{question}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("input closed while waiting for an answer");
    }
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_configure(answers: &str, saved_path: &Path) -> (Result<TicketingConfig>, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = configure(&mut input, &mut output, saved_path);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_ask_yes_no_reprompts_until_valid() {
        let mut input = Cursor::new(b"maybe\nYES\n".to_vec());
        let mut output = Vec::new();
        assert!(ask_yes_no(&mut input, &mut output, "? ").unwrap());
        assert!(String::from_utf8(output).unwrap().contains("Please answer 'yes' or 'no'."));
    }

    #[test]
    fn test_prompt_positive_rejects_zero_and_text() {
        let mut input = Cursor::new(b"0\nabc\n-3\n7\n".to_vec());
        let mut output = Vec::new();
        assert_eq!(prompt_positive(&mut input, &mut output, "n: ").unwrap(), 7);

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Value must be greater than 0"));
        assert_eq!(output.matches("Invalid input").count(), 2);
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        assert!(prompt_positive(&mut input, &mut output, "n: ").is_err());
    }

    #[test]
    fn test_configure_new_and_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let (result, output) = run_configure("no\n5\n10\n10\n5\nyes\n", &path);
        let config = result.unwrap();

        assert_eq!(config, TicketingConfig::new(5, 10, 10, 5));
        assert!(output.contains("--- Configuration Summary ---"));
        assert!(output.contains("--- System Ready ---"));
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_configure_restarts_after_validation_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let (result, output) = run_configure("no\n10\n5\n50\n3\n10\n5\n50\n10\nno\n", &path);

        assert_eq!(result.unwrap(), TicketingConfig::new(10, 5, 50, 10));
        assert!(output.contains("Configuration Error"));
        assert!(output.contains("max capacity must be >= total tickets"));
        assert!(!path.exists());
    }

    #[test]
    fn test_configure_loads_saved_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        save_config(&TicketingConfig::new(3, 20, 30, 4), &path).unwrap();

        let (result, output) = run_configure("yes\n", &path);

        assert_eq!(result.unwrap(), TicketingConfig::new(3, 20, 30, 4));
        assert!(output.contains("--- Loaded Configuration ---"));
    }

    #[test]
    fn test_configure_falls_back_when_saved_config_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");

        let (result, output) = run_configure("yes\n2\n10\n10\n2\nno\n", &path);

        assert_eq!(result.unwrap(), TicketingConfig::new(2, 10, 10, 2));
        assert!(output.contains("Could not load previous configuration"));
    }
}
