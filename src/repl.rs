//! Read-eval-print loop
//!
//! Reads lines from any async reader, dispatches them to [`Session::execute`]
//! and prints command errors without stopping.

use crossterm::style::Stylize;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::commands::{Command, Flow, Session};
use crate::data::Transport;

const PROMPT: &str = "Pokedex > ";

/// Lowercases input and splits it into words
pub fn clean_input(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect()
}

/// Runs the REPL until `exit` or end of input
///
/// # Arguments
/// * `session` - Command state
/// * `input` - Line source (stdin in the binary)
/// * `out` - Where prompts, output and errors are written
/// * `color` - Whether to style the prompt and errors with ANSI colors
pub async fn run<T, R, W>(
    session: &mut Session<T>,
    mut input: R,
    out: &mut W,
    color: bool,
) -> io::Result<()>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut buf = Vec::new();

    loop {
        if color {
            write!(out, "{}", PROMPT.cyan())?;
        } else {
            write!(out, "{}", PROMPT)?;
        }
        out.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            writeln!(out)?;
            break;
        }

        // Invalid UTF-8 is replaced rather than ending the session
        let line = String::from_utf8_lossy(&buf);
        let words = clean_input(&line);
        let Some((name, args)) = words.split_first() else {
            continue;
        };

        let Some(command) = Command::from_name(name) else {
            writeln!(out, "Unknown command")?;
            continue;
        };

        match session.execute(command, args, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(e) => {
                if color {
                    writeln!(out, "{}", e.to_string().red())?;
                } else {
                    writeln!(out, "{}", e)?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;
    use crate::data::{Client, NetworkError, PokeApiClient};
    use crate::pokedex::Pokedex;
    use bytes::Bytes;
    use reqwest::StatusCode;
    use std::path::PathBuf;
    use std::time::Duration;

    struct OfflineTransport;

    impl Transport for OfflineTransport {
        async fn get(&self, url: &str) -> Result<Bytes, NetworkError> {
            Err(NetworkError::Status {
                url: url.to_string(),
                status: StatusCode::SERVICE_UNAVAILABLE,
            })
        }
    }

    async fn run_script(script: impl AsRef<[u8]>) -> String {
        let client = Client::with_transport(OfflineTransport, Cache::new(Duration::from_secs(60)));
        let api = PokeApiClient::new(client, "http://api.test/v2");
        let mut session = Session::new(api, Pokedex::new(), PathBuf::from("unused.json"));
        let mut out = Vec::new();

        run(&mut session, script.as_ref(), &mut out, false)
            .await
            .expect("REPL should not fail on in-memory IO");
        String::from_utf8(out).expect("Output should be UTF-8")
    }

    #[test]
    fn test_clean_input() {
        let cases = [
            ("  hello  world  ", vec!["hello", "world"]),
            ("   ", vec![]),
            ("HeLlo WorLd", vec!["hello", "world"]),
            (" hello ", vec!["hello"]),
        ];

        for (input, expected) in cases {
            assert_eq!(clean_input(input), expected, "Input: {:?}", input);
        }
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let output = run_script("fly\nexit\n").await;
        assert!(output.contains("Unknown command"));
        assert!(output.contains("Goodbye"));
    }

    #[tokio::test]
    async fn test_blank_lines_are_ignored() {
        let output = run_script("\n   \nexit\n").await;
        assert_eq!(output.matches(PROMPT).count(), 3);
        assert!(!output.contains("Unknown command"));
    }

    #[tokio::test]
    async fn test_errors_do_not_stop_the_loop() {
        let output = run_script("map\nmapb\nHELP\n").await;

        assert!(output.contains("returned 503"));
        assert!(output.contains("you're on the first page"));
        assert!(output.contains("Welcome to the Pokedex!"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_end_session() {
        let output = run_script(b"caf\xe9\nhelp\nexit\n").await;

        assert!(output.contains("Unknown command"));
        assert!(output.contains("Welcome to the Pokedex!"));
        assert!(output.contains("Goodbye"));
    }

    #[tokio::test]
    async fn test_last_line_without_newline_is_executed() {
        let output = run_script("help").await;
        assert!(output.contains("Welcome to the Pokedex!"));
    }

    #[tokio::test]
    async fn test_end_of_input_stops_loop() {
        let output = run_script("").await;
        assert_eq!(output.matches(PROMPT).count(), 1);
    }
}
