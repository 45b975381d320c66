pub mod commands;
pub mod context;
pub mod output;

use clap::{Parser, Subcommand};

/// Decrypt PGP traffic with the team key, one message or a batch of files at a time.
#[derive(Parser, Debug)]
#[command(name = "csirt-pgp", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Data directory holding config.toml and the history file
    #[arg(long, global = true)]
    pub config: Option<String>,
}

/// Where the private key and its passphrase come from.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct KeyArgs {
    /// Read a whole armored private key from this file instead of the fragment variables
    #[arg(long)]
    pub key_file: Option<String>,

    /// Passphrase for the private key (default: the configured passphrase variable)
    #[arg(long, env = "CSIRT_PGP_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory with a default config and an empty history
    Init,

    /// Decrypt one message from a file, --text, or stdin
    Decrypt {
        /// File holding the armored message (.txt, .eml, .pgp, .gpg)
        file: Option<String>,
        /// Armored message given inline
        #[arg(long, conflicts_with = "file", allow_hyphen_values = true)]
        text: Option<String>,
        /// Write the plaintext here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        key: KeyArgs,
    },

    /// Decrypt several files concurrently, one output file per input
    Batch {
        /// Files to decrypt
        #[arg(required = true)]
        files: Vec<String>,
        /// Directory for the `<name>_decrypted.txt` outputs (default: current directory)
        #[arg(long)]
        out_dir: Option<String>,
        /// Override the configured per-file size limit, in bytes
        #[arg(long)]
        max_size: Option<u64>,
        #[command(flatten)]
        key: KeyArgs,
    },

    /// Encrypt a message for a recipient public key, signed with the team key
    Encrypt {
        /// File holding the plaintext
        file: Option<String>,
        /// Plaintext given inline
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// Armored public key file (default: the configured public key variable)
        #[arg(long)]
        recipient: Option<String>,
        /// Write the armored message here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
        /// Leave the message unsigned; the team key is not needed
        #[arg(long)]
        no_sign: bool,
        #[command(flatten)]
        key: KeyArgs,
    },

    /// Show past decryptions
    History {
        /// Show last N entries
        #[arg(long)]
        last: Option<usize>,
    },
}
