use clap::{ArgAction, Parser, ValueEnum};
use ipobf_core::{Encoding, ObfError, ObfuscationSpec, ObfuscatorConfig, Strategy};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Hex,
    Dword,
    Octal,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EncodingArg {
    Hex,
    Dword,
    Octal,
}

impl From<EncodingArg> for Encoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Hex => Encoding::Hex,
            EncodingArg::Dword => Encoding::Dword,
            EncodingArg::Octal => Encoding::Octal,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "ipobf", about = "Obfuscate an IP address")]
pub struct Cli {
    /// IP address to obfuscate
    #[arg(short = 'u', long = "ip", value_name = "IP")]
    pub ip: Option<String>,

    /// Obfuscation method
    #[arg(short, long, value_enum, default_value_t = MethodArg::Hex)]
    pub method: MethodArg,

    /// (Used only when method is 'mixed') Method for the leading octets
    #[arg(short, long, value_enum, default_value_t = EncodingArg::Hex)]
    pub first: EncodingArg,

    /// (Used only when method is 'mixed') Method for the trailing octets
    #[arg(short, long, value_enum, default_value_t = EncodingArg::Dword)]
    pub last: EncodingArg,

    /// (Used only when method is 'mixed') Number of octets encoded with --first
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub switch: u8,

    /// Randomize all obfuscation attributes
    #[arg(short, long, default_value_t = false, action = ArgAction::Set)]
    pub random: bool,

    /// (Used only when randomizing) Number of randomized trials
    #[arg(
        short,
        long,
        default_value_t = 100,
        value_parser = clap::value_parser!(u16).range(1..=100)
    )]
    pub iterations: u16,

    /// Percent-encode the "." separators of the output
    #[arg(short, long, default_value_t = false, action = ArgAction::Set)]
    pub dotless: bool,

    /// Number of concurrent trials [default: CPU core count]
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=100))]
    pub threads: Option<u16>,

    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// HTTP client used as the oracle [default: curl, curl.exe on Windows]
    #[arg(long, value_name = "BIN")]
    pub client: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The spec described by the fixed-method flags.
    pub fn spec(&self) -> Result<ObfuscationSpec, ObfError> {
        let strategy = match self.method {
            MethodArg::Hex => Strategy::Single(Encoding::Hex),
            MethodArg::Dword => Strategy::Single(Encoding::Dword),
            MethodArg::Octal => Strategy::Single(Encoding::Octal),
            MethodArg::Mixed => {
                Strategy::mixed(self.first.into(), self.last.into(), self.switch)?
            }
        };
        Ok(ObfuscationSpec::new(strategy, self.dotless))
    }

    /// File configuration (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<ObfuscatorConfig, ObfError> {
        let mut config = match &self.config {
            Some(path) => ObfuscatorConfig::load(path)?,
            None => ObfuscatorConfig::default(),
        };
        if let Some(threads) = self.threads {
            config.threads = usize::from(threads);
        }
        if let Some(client) = &self.client {
            config.client = Some(client.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

/// Asks for the address on `output` and reads one line from `input`.
pub fn prompt_ip<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<String> {
    write!(output, "Enter an IP address to obfuscate: ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
