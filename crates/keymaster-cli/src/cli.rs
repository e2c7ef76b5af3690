/*
[INPUT]:  Process arguments
[OUTPUT]: Parsed global flags and subcommand tree
[POS]:    CLI layer - argument definitions
[UPDATE]: When adding subcommands or flags
*/

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "keymaster", version, about = "Command-line client for the Keymaster service")]
pub struct Cli {
    /// Keymaster service URL
    #[arg(long, value_name = "URL", env = "KC_KEYMASTER_URL", global = true)]
    pub url: Option<String>,
    /// YAML configuration file
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_path: Option<PathBuf>,
    #[arg(long = "timeout-secs", value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,
    /// Wait for the service to become ready first
    #[arg(long, global = true)]
    pub wait: bool,
    /// Readiness retries before `--wait` gives up; 0 waits forever
    #[arg(long = "max-retries", value_name = "N", global = true)]
    pub max_retries: Option<u32>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn", global = true)]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check whether the service is ready
    Ready,
    /// Wallet management
    #[command(subcommand)]
    Wallet(WalletCommand),
    /// List DID registries known to the service
    Registries,
    /// Identity management
    #[command(subcommand)]
    Id(IdCommand),
    /// DID aliases
    #[command(subcommand)]
    Name(NameCommand),
    /// Resolve a DID, name or alias to its document
    ResolveDid {
        id: String,
        #[arg(long)]
        confirm: bool,
        #[arg(long = "at-version", value_name = "N")]
        at_version: Option<u32>,
    },
    /// Encrypt a message for a receiver
    EncryptMessage {
        message: String,
        receiver: String,
        #[arg(long)]
        registry: Option<String>,
        #[arg(long = "include-hash")]
        include_hash: bool,
    },
    /// Decrypt an encrypted message asset
    DecryptMessage { did: String },
    /// Sign a JSON file with the current identity
    SignFile { file: PathBuf },
    /// Verify the signature of a signed JSON file
    VerifyFile { file: PathBuf },
    /// Verifiable credentials
    #[command(subcommand)]
    Credential(CredentialCommand),
    /// Groups
    #[command(subcommand)]
    Group(GroupCommand),
    /// Group vaults
    #[command(subcommand)]
    Vault(VaultCommand),
    /// Polls
    #[command(subcommand)]
    Poll(PollCommand),
}

#[derive(Subcommand, Debug)]
pub enum WalletCommand {
    /// Print the wallet
    Show,
    /// Create a new wallet, optionally from a mnemonic
    New {
        #[arg(long)]
        mnemonic: Option<String>,
        #[arg(long)]
        overwrite: bool,
    },
    Backup,
    Recover,
    Check,
    Fix,
    /// Print the decrypted mnemonic
    Mnemonic,
    /// Print the encrypted wallet
    Export,
}

#[derive(Subcommand, Debug)]
pub enum IdCommand {
    List,
    Current,
    /// Switch the current identity
    Use { name: String },
    Create {
        name: String,
        #[arg(long)]
        registry: Option<String>,
    },
    Remove { id: String },
    Rename { id: String, name: String },
    /// Back up an identity; defaults to the current one
    Backup { id: Option<String> },
    Recover { did: String },
    Resolve { id: String },
}

#[derive(Subcommand, Debug)]
pub enum NameCommand {
    List,
    Add { name: String, did: String },
    Get { name: String },
    Remove { name: String },
}

#[derive(Subcommand, Debug)]
pub enum CredentialCommand {
    /// Credentials held by the current identity
    List,
    /// Credentials issued by the current identity
    Issued,
    Get { did: String },
    Accept { did: String },
    Remove { did: String },
    Revoke { did: String },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    List {
        #[arg(long)]
        owner: Option<String>,
    },
    Get { group: String },
    Create {
        name: String,
        #[arg(long)]
        registry: Option<String>,
    },
    Add { group: String, member: String },
    Remove { group: String, member: String },
}

#[derive(Subcommand, Debug)]
pub enum VaultCommand {
    Create {
        #[arg(long)]
        registry: Option<String>,
        #[arg(long = "secret-members")]
        secret_members: bool,
    },
    Members { vault: String },
    Items { vault: String },
    AddMember { vault: String, member: String },
    RemoveMember { vault: String, member: String },
    /// Store a file in the vault; the item name defaults to the file name
    Put {
        vault: String,
        file: PathBuf,
        #[arg(long)]
        name: Option<String>,
    },
    /// Write a vault item to a local file
    Get {
        vault: String,
        name: String,
        output: PathBuf,
    },
    Remove { vault: String, name: String },
}

#[derive(Subcommand, Debug)]
pub enum PollCommand {
    /// Print a poll template
    Template,
    List {
        #[arg(long)]
        owner: Option<String>,
    },
    View { poll: String },
    /// Vote for an option (1-based)
    Vote {
        poll: String,
        vote: u32,
        #[arg(long)]
        spoil: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "keymaster",
            "id",
            "list",
            "--url",
            "http://localhost:9999",
            "--wait",
        ])
        .expect("parse");
        assert_eq!(cli.url.as_deref(), Some("http://localhost:9999"));
        assert!(cli.wait);
        assert_eq!(cli.log_level, "warn");
        assert!(matches!(cli.command, Command::Id(IdCommand::List)));
    }

    #[test]
    fn test_parse_vault_put() {
        let cli = Cli::try_parse_from(["keymaster", "vault", "put", "did:test:vault", "notes.txt"])
            .expect("parse");
        match cli.command {
            Command::Vault(VaultCommand::Put { vault, file, name }) => {
                assert_eq!(vault, "did:test:vault");
                assert_eq!(file, PathBuf::from("notes.txt"));
                assert_eq!(name, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["keymaster"]).is_err());
    }
}
