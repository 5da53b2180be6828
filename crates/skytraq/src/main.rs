mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "skytraq", version, about = "SkyTraq GPS receiver CLI")]
struct Cli {
    /// Output format. Default: pretty on a terminal, json otherwise.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        env = "SKYTRAQ_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_send_subcommand() {
        let cli = Cli::try_parse_from([
            "skytraq",
            "send",
            "/dev/ttyUSB0",
            "--id",
            "0x02",
            "--data",
            "01",
            "--attempts",
            "5",
        ])
        .expect("send args should parse");

        match cli.command {
            Command::Send(args) => {
                assert_eq!(args.delivery.attempts, 5);
                assert_eq!(args.delivery.max_irrelevant, 5);
                assert_eq!(args.serial.baud, 230_400);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_listen_with_reconnect() {
        let cli = Cli::try_parse_from([
            "skytraq",
            "--format",
            "json",
            "listen",
            "/dev/ttyUSB0",
            "--count",
            "3",
            "--reconnect",
            "--reconnect-delay",
            "250ms",
        ])
        .expect("listen args should parse");

        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Command::Listen(args) => {
                assert_eq!(args.count, Some(3));
                assert!(args.reconnect);
                assert_eq!(args.reconnect_delay, "250ms");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn encode_requires_id() {
        let err = Cli::try_parse_from(["skytraq", "encode", "--data", "01"])
            .expect_err("missing id should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
