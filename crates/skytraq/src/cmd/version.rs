use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("skytraq {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: skytraq");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("SKYTRAQ_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("features: serial={}, cli=true", cfg!(feature = "serial"));
    println!(
        "defaults: baud={} attempts={} max_irrelevant={}",
        skytraq_transport::DEFAULT_BAUD_RATE,
        skytraq_link::DEFAULT_MAX_ATTEMPTS,
        skytraq_link::DEFAULT_MAX_IRRELEVANT_FRAMES
    );

    Ok(SUCCESS)
}
