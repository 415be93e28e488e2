use tbinary_protocol::{BinaryProtocol, MessageHeader, ProtocolConfig};
use tbinary_transport::MemoryTransport;
use tracing::debug;

use crate::cmd::EncodeArgs;
use crate::exit::{io_error, protocol_error, CliResult, SUCCESS};
use crate::output::{hex, print_raw};

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let header = MessageHeader::new(args.name.as_str(), args.kind.into(), args.seq_id);
    let config = ProtocolConfig::with_strict(false, !args.non_strict);
    let wire = encode(&header, config).map_err(|err| protocol_error("encode failed", err))?;
    debug!(bytes = wire.len(), strict = config.strict_write, "encoded message");

    let rendered = if args.hex {
        let mut text = hex(&wire).into_bytes();
        text.push(b'\n');
        text
    } else {
        wire
    };

    match &args.output {
        Some(path) => std::fs::write(path, &rendered)
            .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))?,
        None => print_raw(&rendered),
    }
    Ok(SUCCESS)
}

/// Encode a message whose body is an empty struct.
pub fn encode(header: &MessageHeader, config: ProtocolConfig) -> tbinary_protocol::Result<Vec<u8>> {
    let mut session = BinaryProtocol::with_config(MemoryTransport::new(), config);
    session.write_message_begin(header)?;
    session.write_struct_begin("")?;
    session.write_field_stop()?;
    session.write_struct_end()?;
    session.write_message_end()?;
    Ok(session.into_inner().take().to_vec())
}

#[cfg(test)]
mod tests {
    use tbinary_protocol::MessageType;

    use super::*;

    #[test]
    fn strict_ping_bytes() {
        let wire = encode(
            &MessageHeader::new("ping", MessageType::Call, 42),
            ProtocolConfig::default(),
        )
        .unwrap();

        assert_eq!(hex(&wire), "800100010000000470696e670000002a00");
    }

    #[test]
    fn non_strict_ping_bytes() {
        let wire = encode(
            &MessageHeader::new("ping", MessageType::Reply, 1),
            ProtocolConfig::with_strict(false, false),
        )
        .unwrap();

        assert_eq!(hex(&wire), "0000000470696e67020000000100");
    }
}
