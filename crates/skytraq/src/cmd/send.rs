use serde::Serialize;
use skytraq_frame::{Frame, MAX_PAYLOAD};
use skytraq_link::connect_serial;
use tracing::warn;

use crate::cmd::{parse_message_id, parse_payload, SendArgs};
use crate::exit::{link_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{spaced_hex, OutputFormat};

#[derive(Serialize)]
struct SendOutput<'a> {
    id: u8,
    name: &'a str,
    payload: String,
    acknowledged: bool,
}

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let frame = build_frame(&args)?;
    let serial = args.serial.to_config()?;

    let mut link = connect_serial(&serial, args.delivery.to_config())
        .map_err(|err| link_error("connect failed", err))?;

    let sent = if args.no_ack {
        link.send_unconfirmed(&frame)
    } else {
        link.send(&frame)
    };
    if let Err(err) = link.close() {
        warn!(error = %err, "close failed");
    }
    sent.map_err(|err| link_error("send failed", err))?;

    match format {
        OutputFormat::Json => {
            let out = SendOutput {
                id: frame.id.0,
                name: frame.id.name(),
                payload: hex::encode(frame.payload.as_ref()),
                acknowledged: !args.no_ack,
            };
            match serde_json::to_string(&out) {
                Ok(line) => println!("{line}"),
                Err(_) => println!("{{}}"),
            }
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            let status = if args.no_ack { "sent" } else { "acknowledged" };
            println!(
                "{} ({}) [{}] {status}",
                frame.id,
                frame.id.name(),
                spaced_hex(frame.payload.as_ref())
            );
        }
    }

    Ok(SUCCESS)
}

pub(crate) fn build_frame_from(id: &str, data: &str) -> CliResult<Frame> {
    let id = parse_message_id(id)?;
    let payload = parse_payload(data)?;
    if payload.len() > MAX_PAYLOAD {
        return Err(CliError::new(
            DATA_INVALID,
            format!("payload of {} bytes exceeds {MAX_PAYLOAD}", payload.len()),
        ));
    }
    Ok(Frame::new(id, payload))
}

fn build_frame(args: &SendArgs) -> CliResult<Frame> {
    build_frame_from(&args.id, &args.data)
}

#[cfg(test)]
mod tests {
    use skytraq_frame::MessageId;

    use super::*;
    use crate::exit::USAGE;

    #[test]
    fn builds_query() {
        let frame = build_frame_from("0x02", "01").unwrap();
        assert_eq!(frame.id, MessageId::QUERY_SOFTWARE_VERSION);
        assert_eq!(frame.payload.as_ref(), &[0x01]);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(build_frame_from("x", "").unwrap_err().code, USAGE);
        assert_eq!(build_frame_from("1", "0").unwrap_err().code, USAGE);
    }

    #[test]
    fn rejects_oversized_payload() {
        let data = "00".repeat(MAX_PAYLOAD + 1);
        let err = build_frame_from("1", &data).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }
}
