use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("tbinary {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: tbinary");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("TBINARY_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "protocol: binary v{:#x}",
        tbinary_protocol::VERSION_1 >> 16
    );
    println!(
        "i64 range: ±{} (exact-integer)",
        tbinary_protocol::MAX_EXACT_INTEGER
    );

    Ok(SUCCESS)
}
