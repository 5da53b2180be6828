use std::fs::File;
use std::io::BufReader;

use skytraq_frame::{FrameError, FrameReader};
use tracing::{info, warn};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let file = File::open(&args.file)
        .map_err(|err| io_error(&format!("failed reading {}", args.file.display()), err))?;
    let mut reader = FrameReader::new(BufReader::new(file));

    let mut frames = 0usize;
    let mut rejected = 0usize;
    loop {
        match reader.read_frame() {
            Ok(frame) => {
                print_frame(&frame, format);
                frames += 1;
            }
            Err(FrameError::ConnectionClosed) => break,
            Err(err) if err.is_framing() => {
                warn!(error = %err, "skipping rejected frame");
                rejected += 1;
            }
            Err(err) => return Err(frame_error("decode failed", err)),
        }
    }

    info!(frames, rejected, "end of capture");
    Ok(SUCCESS)
}
