use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use tbinary_protocol::MessageType;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod encode;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode one message and print its envelope and body.
    Inspect(InspectArgs),
    /// Encode a message with an empty body.
    Encode(EncodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Inspect(args) => inspect::run(args, format),
        Command::Encode(args) => encode::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input file. Reads stdin when omitted or `-`.
    pub input: Option<PathBuf>,
    /// Reject message headers without a version identifier.
    #[arg(long)]
    pub strict_read: bool,
    /// Maximum string/binary length to accept.
    #[arg(long, value_name = "BYTES")]
    pub string_limit: Option<usize>,
    /// Maximum collection count to accept.
    #[arg(long, value_name = "COUNT")]
    pub container_limit: Option<usize>,
    /// Maximum nesting of structs and collections.
    #[arg(long, value_name = "DEPTH", default_value = "64")]
    pub max_depth: usize,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Method name.
    #[arg(long)]
    pub name: String,
    /// Message kind.
    #[arg(long, value_enum, default_value = "call")]
    pub kind: KindArg,
    /// Sequence id.
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub seq_id: i32,
    /// Write the legacy header without a version identifier.
    #[arg(long)]
    pub non_strict: bool,
    /// Print the bytes as lowercase hex instead of raw.
    #[arg(long)]
    pub hex: bool,
    /// Output file. Writes stdout when omitted.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum KindArg {
    Call,
    Reply,
    Exception,
    Oneway,
}

impl From<KindArg> for MessageType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Call => MessageType::Call,
            KindArg::Reply => MessageType::Reply,
            KindArg::Exception => MessageType::Exception,
            KindArg::Oneway => MessageType::Oneway,
        }
    }
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
