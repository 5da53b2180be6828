use std::cell::Cell;
use std::thread;

use skytraq_link::{connect_serial, CancelToken, Handlers, LinkConfig, LinkError};
use skytraq_transport::SerialConfig;
use tracing::{info, warn};

use crate::cmd::{parse_duration, ListenArgs};
use crate::exit::{link_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_frame, print_navigation, print_version, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let serial = args.serial.to_config()?;
    let config = args.delivery.to_config();
    let delay = parse_duration(&args.reconnect_delay)?;

    let cancel = CancelToken::new();
    install_ctrlc_handler(cancel.clone())?;

    let printed = Cell::new(0usize);
    loop {
        match session(&args, &serial, &config, format, &cancel, &printed) {
            Ok(()) => return Ok(SUCCESS),
            // A read that times out or fails after Ctrl-C is part of stopping.
            Err(_) if cancel.is_cancelled() => return Ok(SUCCESS),
            Err(err) if args.reconnect => {
                warn!(
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "session ended; reconnecting"
                );
                thread::sleep(delay);
                if cancel.is_cancelled() {
                    return Ok(SUCCESS);
                }
            }
            Err(err) => return Err(link_error("listen failed", err)),
        }
    }
}

/// One transport lifetime: open, handshake, stream until cancelled or failed.
fn session(
    args: &ListenArgs,
    serial: &SerialConfig,
    config: &LinkConfig,
    format: OutputFormat,
    cancel: &CancelToken,
    printed: &Cell<usize>,
) -> Result<(), LinkError> {
    let mut link = connect_serial(serial, config.clone())?;
    info!(
        port = %serial.path,
        max_attempts = link.config().max_attempts,
        "listening"
    );

    let record = || {
        printed.set(printed.get().saturating_add(1));
        if args.count.is_some_and(|count| printed.get() >= count) {
            cancel.cancel();
        }
    };

    let mut handlers = Handlers::new()
        .on_software_version(|version| {
            print_version(&version, format);
            record();
        })
        .on_navigation(|nav| {
            print_navigation(&nav, format);
            record();
        });
    if args.all {
        handlers = handlers.on_frame(|frame| {
            print_frame(frame, format);
            record();
        });
    }

    let result = link.run(&mut handlers, cancel);
    drop(handlers);
    if let Err(err) = link.close() {
        warn!(error = %err, "close failed");
    }
    result
}

fn install_ctrlc_handler(cancel: CancelToken) -> CliResult<()> {
    ctrlc::set_handler(move || cancel.cancel())
        .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
