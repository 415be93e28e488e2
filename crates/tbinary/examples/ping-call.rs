//! Round-trips a `ping` call through an in-memory channel and prints the bytes.
//!
//! Run with:
//!   cargo run --example ping-call

use tbinary::protocol::{
    BinaryProtocol, FieldHeader, MessageHeader, MessageType, TType, Value,
};
use tbinary::transport::MemoryTransport;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = BinaryProtocol::new(MemoryTransport::new(), true, true);

    session.write_message_begin(&MessageHeader::new("ping", MessageType::Call, 1))?;
    session.write_struct_begin("ping_args")?;
    session.write_field_begin(&FieldHeader::new(TType::String, 1))?;
    session.write_string("hello")?;
    session.write_field_end()?;
    session.write_field_stop()?;
    session.write_struct_end()?;
    session.write_message_end()?;

    let wire = session.get_ref().as_bytes().to_vec();
    println!("{} bytes on the wire", wire.len());

    let header = session.read_message_begin()?;
    let body = session.read_value(TType::Struct)?;
    session.read_message_end()?;

    println!("{} {} seq={}", header.kind, header.name, header.sequence_id);
    if let Value::Struct(fields) = body {
        for field in fields {
            println!("  {}: {:?}", field.id, field.value);
        }
    }
    Ok(())
}
