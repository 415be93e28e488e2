use std::io::Read;
use std::path::Path;

use tbinary_protocol::{BinaryProtocol, ProtocolConfig, TType};
use tbinary_transport::MemoryTransport;
use tracing::{debug, warn};

use crate::cmd::InspectArgs;
use crate::exit::{io_error, protocol_error, CliResult, SUCCESS};
use crate::output::{print_inspect, InspectOutput, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let input = read_input(args.input.as_deref())?;
    let config = ProtocolConfig {
        strict_read: args.strict_read,
        string_limit: args.string_limit,
        container_limit: args.container_limit,
        max_depth: Some(args.max_depth),
        ..ProtocolConfig::default()
    };

    let out = decode(&input, config).map_err(|err| protocol_error("decode failed", err))?;
    if out.trailing_bytes > 0 {
        warn!(trailing = out.trailing_bytes, "input continues past the first message");
    }
    print_inspect(&out, format);
    Ok(SUCCESS)
}

/// Decode one message envelope and its struct body.
pub fn decode(input: &[u8], config: ProtocolConfig) -> tbinary_protocol::Result<InspectOutput> {
    let mut session = BinaryProtocol::with_config(MemoryTransport::from_bytes(input), config);

    let message = session.read_message_begin()?;
    let body = session.read_value(TType::Struct)?;
    session.read_message_end()?;

    let trailing_bytes = session.get_ref().len();
    let message_bytes = input.len() - trailing_bytes;
    debug!(name = %message.name, message_bytes, "decoded message");

    Ok(InspectOutput {
        message,
        body,
        message_bytes,
        trailing_bytes,
    })
}

fn read_input(path: Option<&Path>) -> CliResult<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err)),
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|err| io_error("failed reading stdin", err))?;
            Ok(buf)
        }
    }
}
