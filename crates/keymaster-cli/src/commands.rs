/*
[INPUT]:  Parsed subcommands and a connected Keymaster client
[OUTPUT]: JSON value describing each command's result
[POS]:    CLI layer - command dispatch
[UPDATE]: When adding subcommands or changing their output
*/

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use keymaster_sdk::{
    CreateAssetOptions, CreateIdOptions, EncryptOptions, GroupVaultOptions, KeymasterClient,
    ResolveDidOptions, VoteOptions,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::cli::{
    Command, CredentialCommand, GroupCommand, IdCommand, NameCommand, PollCommand, VaultCommand,
    WalletCommand,
};

/// Run one subcommand against the service
pub async fn execute(client: &KeymasterClient, command: Command) -> Result<Value> {
    debug!(?command, "executing command");

    match command {
        Command::Ready => to_json(client.is_ready().await),
        Command::Wallet(command) => wallet(client, command).await,
        Command::Registries => to_json(client.list_registries().await.context("list registries")?),
        Command::Id(command) => id(client, command).await,
        Command::Name(command) => name(client, command).await,
        Command::ResolveDid {
            id,
            confirm,
            at_version,
        } => {
            let options = ResolveDidOptions {
                at_version,
                confirm: confirm.then_some(true),
                ..Default::default()
            };
            client
                .resolve_did(&id, Some(&options))
                .await
                .with_context(|| format!("resolve {id}"))
        }
        Command::EncryptMessage {
            message,
            receiver,
            registry,
            include_hash,
        } => {
            let options = EncryptOptions {
                registry,
                include_hash: include_hash.then_some(true),
                ..Default::default()
            };
            let did = client
                .encrypt_message(&message, &receiver, &options)
                .await
                .context("encrypt message")?;
            to_json(did)
        }
        Command::DecryptMessage { did } => {
            to_json(client.decrypt_message(&did).await.context("decrypt message")?)
        }
        Command::SignFile { file } => {
            let contents = read_json(&file)?;
            client.add_signature(&contents).await.context("sign file")
        }
        Command::VerifyFile { file } => {
            let contents = read_json(&file)?;
            to_json(client.verify_signature(&contents).await.context("verify file")?)
        }
        Command::Credential(command) => credential(client, command).await,
        Command::Group(command) => group(client, command).await,
        Command::Vault(command) => vault(client, command).await,
        Command::Poll(command) => poll(client, command).await,
    }
}

async fn wallet(client: &KeymasterClient, command: WalletCommand) -> Result<Value> {
    match command {
        WalletCommand::Show => client.load_wallet().await.context("load wallet"),
        WalletCommand::New {
            mnemonic,
            overwrite,
        } => client
            .new_wallet(mnemonic.as_deref(), overwrite)
            .await
            .context("create wallet"),
        WalletCommand::Backup => to_json(client.backup_wallet().await.context("back up wallet")?),
        WalletCommand::Recover => client.recover_wallet().await.context("recover wallet"),
        WalletCommand::Check => to_json(client.check_wallet().await.context("check wallet")?),
        WalletCommand::Fix => to_json(client.fix_wallet().await.context("fix wallet")?),
        WalletCommand::Mnemonic => {
            to_json(client.decrypt_mnemonic().await.context("decrypt mnemonic")?)
        }
        WalletCommand::Export => client
            .export_encrypted_wallet()
            .await
            .context("export wallet"),
    }
}

async fn id(client: &KeymasterClient, command: IdCommand) -> Result<Value> {
    match command {
        IdCommand::List => to_json(client.list_ids().await.context("list ids")?),
        IdCommand::Current => to_json(client.get_current_id().await.context("get current id")?),
        IdCommand::Use { name } => to_json(
            client
                .set_current_id(&name)
                .await
                .with_context(|| format!("use id {name}"))?,
        ),
        IdCommand::Create { name, registry } => {
            let options = CreateIdOptions { registry };
            to_json(
                client
                    .create_id(&name, &options)
                    .await
                    .with_context(|| format!("create id {name}"))?,
            )
        }
        IdCommand::Remove { id } => to_json(
            client
                .remove_id(&id)
                .await
                .with_context(|| format!("remove id {id}"))?,
        ),
        IdCommand::Rename { id, name } => to_json(
            client
                .rename_id(&id, &name)
                .await
                .with_context(|| format!("rename id {id}"))?,
        ),
        IdCommand::Backup { id } => to_json(
            client
                .backup_id(id.as_deref())
                .await
                .context("back up id")?,
        ),
        IdCommand::Recover { did } => to_json(
            client
                .recover_id(&did)
                .await
                .with_context(|| format!("recover id from {did}"))?,
        ),
        IdCommand::Resolve { id } => client
            .resolve_id(&id)
            .await
            .with_context(|| format!("resolve id {id}")),
    }
}

async fn name(client: &KeymasterClient, command: NameCommand) -> Result<Value> {
    match command {
        NameCommand::List => to_json(client.list_names().await.context("list names")?),
        NameCommand::Add { name, did } => to_json(
            client
                .add_name(&name, &did)
                .await
                .with_context(|| format!("add name {name}"))?,
        ),
        NameCommand::Get { name } => to_json(
            client
                .get_name(&name)
                .await
                .with_context(|| format!("get name {name}"))?,
        ),
        NameCommand::Remove { name } => to_json(
            client
                .remove_name(&name)
                .await
                .with_context(|| format!("remove name {name}"))?,
        ),
    }
}

async fn credential(client: &KeymasterClient, command: CredentialCommand) -> Result<Value> {
    match command {
        CredentialCommand::List => {
            to_json(client.list_credentials().await.context("list credentials")?)
        }
        CredentialCommand::Issued => to_json(client.list_issued().await.context("list issued")?),
        CredentialCommand::Get { did } => to_json(
            client
                .get_credential(&did)
                .await
                .with_context(|| format!("get credential {did}"))?,
        ),
        CredentialCommand::Accept { did } => to_json(
            client
                .accept_credential(&did)
                .await
                .with_context(|| format!("accept credential {did}"))?,
        ),
        CredentialCommand::Remove { did } => to_json(
            client
                .remove_credential(&did)
                .await
                .with_context(|| format!("remove credential {did}"))?,
        ),
        CredentialCommand::Revoke { did } => to_json(
            client
                .revoke_credential(&did)
                .await
                .with_context(|| format!("revoke credential {did}"))?,
        ),
    }
}

async fn group(client: &KeymasterClient, command: GroupCommand) -> Result<Value> {
    match command {
        GroupCommand::List { owner } => to_json(
            client
                .list_groups(owner.as_deref())
                .await
                .context("list groups")?,
        ),
        GroupCommand::Get { group } => to_json(
            client
                .get_group(&group)
                .await
                .with_context(|| format!("get group {group}"))?,
        ),
        GroupCommand::Create { name, registry } => {
            let options = CreateAssetOptions {
                registry,
                ..Default::default()
            };
            to_json(
                client
                    .create_group(&name, &options)
                    .await
                    .with_context(|| format!("create group {name}"))?,
            )
        }
        GroupCommand::Add { group, member } => to_json(
            client
                .add_group_member(&group, &member)
                .await
                .with_context(|| format!("add {member} to {group}"))?,
        ),
        GroupCommand::Remove { group, member } => to_json(
            client
                .remove_group_member(&group, &member)
                .await
                .with_context(|| format!("remove {member} from {group}"))?,
        ),
    }
}

async fn vault(client: &KeymasterClient, command: VaultCommand) -> Result<Value> {
    match command {
        VaultCommand::Create {
            registry,
            secret_members,
        } => {
            let options = GroupVaultOptions {
                registry,
                secret_members: secret_members.then_some(true),
                ..Default::default()
            };
            to_json(
                client
                    .create_group_vault(&options)
                    .await
                    .context("create group vault")?,
            )
        }
        VaultCommand::Members { vault } => client
            .list_group_vault_members(&vault)
            .await
            .with_context(|| format!("list members of {vault}")),
        VaultCommand::Items { vault } => client
            .list_group_vault_items(&vault, None)
            .await
            .with_context(|| format!("list items of {vault}")),
        VaultCommand::AddMember { vault, member } => to_json(
            client
                .add_group_vault_member(&vault, &member)
                .await
                .with_context(|| format!("add {member} to {vault}"))?,
        ),
        VaultCommand::RemoveMember { vault, member } => to_json(
            client
                .remove_group_vault_member(&vault, &member)
                .await
                .with_context(|| format!("remove {member} from {vault}"))?,
        ),
        VaultCommand::Put { vault, file, name } => {
            let name = match name {
                Some(name) => name,
                None => file_name(&file)?,
            };
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("read {}", file.display()))?;
            to_json(
                client
                    .add_group_vault_item(&vault, &name, data)
                    .await
                    .with_context(|| format!("store {name} in {vault}"))?,
            )
        }
        VaultCommand::Get {
            vault,
            name,
            output,
        } => {
            let data = client
                .get_group_vault_item(&vault, &name, None)
                .await
                .with_context(|| format!("fetch {name} from {vault}"))?
                .ok_or_else(|| anyhow!("item {name} not found in {vault}"))?;
            tokio::fs::write(&output, &data)
                .await
                .with_context(|| format!("write {}", output.display()))?;
            Ok(json!({
                "name": name,
                "bytes": data.len(),
                "output": output.display().to_string(),
            }))
        }
        VaultCommand::Remove { vault, name } => to_json(
            client
                .remove_group_vault_item(&vault, &name)
                .await
                .with_context(|| format!("remove {name} from {vault}"))?,
        ),
    }
}

async fn poll(client: &KeymasterClient, command: PollCommand) -> Result<Value> {
    match command {
        PollCommand::Template => to_json(client.poll_template().await.context("poll template")?),
        PollCommand::List { owner } => to_json(
            client
                .list_polls(owner.as_deref())
                .await
                .context("list polls")?,
        ),
        PollCommand::View { poll } => to_json(
            client
                .view_poll(&poll)
                .await
                .with_context(|| format!("view poll {poll}"))?,
        ),
        PollCommand::Vote { poll, vote, spoil } => {
            let options = VoteOptions {
                spoil: spoil.then_some(true),
                ..Default::default()
            };
            to_json(
                client
                    .vote_poll(&poll, vote, &options)
                    .await
                    .with_context(|| format!("vote on poll {poll}"))?,
            )
        }
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).context("serialize result")
}

fn read_json(path: &Path) -> Result<Value> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse {} as JSON", path.display()))
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("cannot derive an item name from {}", path.display()))
}
