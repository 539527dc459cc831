//! sui-bind: offline tooling over the Move call codec
//!
//! ```bash
//! # BCS-encode a value for a Move parameter type
//! sui-bind encode --type u64 --value 42
//! sui-bind encode --type 'vector<address>' --value '["0x1", "0x2"]'
//!
//! # Decode BCS bytes (hex or base64) as a Move type
//! sui-bind decode --type u256 --hex 0x0400000000000000000000000000000000000000000000000000000000000000
//!
//! # Substitute generic parameters in a type string
//! sui-bind resolve-type --type-param T --type-arg u64 --type-param U --type-arg address 'Pair<T, vector<U>>'
//! ```

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use sui_bind_types::encoding::{base64_decode, base64_encode, parse_hex_bytes};
use sui_move_bind::codec::{Codec, MoveValue};
use sui_move_bind::GenericTypeResolver;

#[derive(Parser)]
#[command(
    name = "sui-bind",
    author,
    version,
    about = "Encode and decode Sui Move call arguments"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// BCS-encode a JSON value as a Move type
    Encode(EncodeCmd),

    /// Decode BCS bytes as a Move type
    Decode(DecodeCmd),

    /// Substitute generic parameters in a Move type string
    ResolveType(ResolveTypeCmd),
}

#[derive(Args)]
struct EncodeCmd {
    /// Move type string (e.g., "vector<u8>", "0x1::string::String")
    #[arg(long = "type", value_name = "TYPE")]
    move_type: String,

    /// Value as JSON; bare words are taken as strings
    #[arg(long, value_name = "JSON")]
    value: String,
}

#[derive(Args)]
struct DecodeCmd {
    /// Move type string
    #[arg(long = "type", value_name = "TYPE")]
    move_type: String,

    /// Hex-encoded BCS bytes
    #[arg(long, conflicts_with = "base64", required_unless_present = "base64")]
    hex: Option<String>,

    /// Base64-encoded BCS bytes
    #[arg(long)]
    base64: Option<String>,
}

#[derive(Args)]
struct ResolveTypeCmd {
    /// Generic parameter name; repeat once per parameter
    #[arg(long = "type-param", value_name = "NAME")]
    type_params: Vec<String>,

    /// Concrete type argument, in parameter order
    #[arg(long = "type-arg", value_name = "TYPE")]
    type_args: Vec<String>,

    /// Type expression to resolve
    type_expr: String,
}

#[derive(Serialize)]
struct EncodeOutput {
    r#type: String,
    hex: String,
    bcs_base64: String,
    size_bytes: usize,
}

#[derive(Serialize)]
struct DecodeOutput {
    r#type: String,
    value: Value,
}

#[derive(Serialize)]
struct ResolveOutput {
    input: String,
    resolved: String,
}

fn parse_json_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

impl EncodeCmd {
    fn execute(&self, codec: &Codec, json: bool) -> Result<()> {
        let value = MoveValue::from_json(&parse_json_value(&self.value), &self.move_type)
            .with_context(|| format!("invalid value for {}", self.move_type))?;
        let bytes = codec
            .encode(&value, &self.move_type)
            .with_context(|| format!("encode as {}", self.move_type))?;
        if json {
            print_json(&EncodeOutput {
                r#type: self.move_type.clone(),
                hex: format!("0x{}", hex::encode(&bytes)),
                bcs_base64: base64_encode(&bytes),
                size_bytes: bytes.len(),
            })
        } else {
            println!("0x{}", hex::encode(&bytes));
            Ok(())
        }
    }
}

impl DecodeCmd {
    fn execute(&self, codec: &Codec, json: bool) -> Result<()> {
        let bytes = match (&self.hex, &self.base64) {
            (Some(h), _) => parse_hex_bytes(h, "BCS bytes")?,
            (None, Some(b)) => base64_decode(b, "BCS bytes")?,
            (None, None) => bail!("one of --hex or --base64 is required"),
        };
        let value: MoveValue = codec
            .decode(&bytes, &self.move_type)
            .with_context(|| format!("decode as {}", self.move_type))?;
        if json {
            print_json(&DecodeOutput {
                r#type: self.move_type.clone(),
                value: value.to_json(),
            })
        } else {
            println!("{}", value.to_json());
            Ok(())
        }
    }
}

impl ResolveTypeCmd {
    fn execute(&self, json: bool) -> Result<()> {
        let resolver = GenericTypeResolver::new(&self.type_params, &self.type_args)?;
        let resolved = resolver.resolve(&self.type_expr);
        if json {
            print_json(&ResolveOutput {
                input: self.type_expr.clone(),
                resolved,
            })
        } else {
            println!("{}", resolved);
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let Cli {
        command,
        json,
        verbose,
    } = Cli::parse();
    init_tracing(verbose);

    let codec = Codec::new();
    match command {
        Commands::Encode(cmd) => cmd.execute(&codec, json),
        Commands::Decode(cmd) => cmd.execute(&codec, json),
        Commands::ResolveType(cmd) => cmd.execute(json),
    }
}
