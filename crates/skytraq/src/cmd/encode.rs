use bytes::BytesMut;
use skytraq_frame::encode_frame;

use crate::cmd::send::build_frame_from;
use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_wire, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let frame = build_frame_from(&args.id, &args.data)?;

    let mut wire = BytesMut::with_capacity(frame.wire_size());
    encode_frame(frame.id, frame.payload.as_ref(), &mut wire)
        .map_err(|err| frame_error("encode failed", err))?;

    print_wire(&frame, &wire, format);
    Ok(SUCCESS)
}
