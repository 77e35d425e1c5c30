use std::{fs::File, io::Write, path::Path};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use serde_json::{json, Value};
use spkz_common::{config::VERSION, crypto::SecretKey};
use spkz_ledger::{
    config::{Command, Config},
    core::{
        events::EventLog,
        genesis::Genesis,
        storage::{KeyValueStore, MemoryStore, SledStore},
        Ledger,
    },
    invocation::{Dispatcher, Invocation, SignedInvocation},
};

fn main() -> Result<()> {
    let mut config: Config = Config::parse();
    if let Some(path) = config.config_file.clone() {
        if config.generate_config_template {
            if Path::new(&path).exists() {
                eprintln!("Config file already exists at {}", path);
                return Ok(());
            }

            let mut file = File::create(&path).context("Error while creating config file")?;
            let json = serde_json::to_string_pretty(&config)
                .context("Error while serializing config file")?;
            file.write_all(json.as_bytes())
                .context("Error while writing config file")?;
            println!("Config file template generated at {}", path);
            return Ok(());
        }

        // the subcommand always comes from the command line
        let command = config.command.take();
        let file = File::open(&path).context("Error while opening config file")?;
        config = serde_json::from_reader(file).context("Error while reading config file")?;
        config.command = command;
    } else if config.generate_config_template {
        eprintln!("Provided config file path is required to generate the template with --config-file");
        return Ok(());
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let Some(command) = config.command.take() else {
        eprintln!("No command provided, see --help");
        return Ok(());
    };

    if let Command::Keygen = command {
        let secret = SecretKey::generate();
        let public_key = secret.public_key();
        print_json(&json!({
            "secret_key": secret.to_hex(),
            "public_key": public_key.to_hex(),
            "address": public_key.address().to_string(),
            "script_hash": public_key.address().to_hex(),
        }))?;
        return Ok(());
    }

    info!("Spokkz ledger v{} on {}", VERSION, config.network);
    let genesis = Genesis::for_network(config.network, config.deployer)
        .context("Invalid deployment configuration")?;

    if config.memory {
        run(MemoryStore::default(), genesis, command)
    } else {
        let store = SledStore::open(&config.dir_path)?;
        run(store, genesis, command)
    }
}

fn run<S: KeyValueStore>(store: S, genesis: Genesis, command: Command) -> Result<()> {
    let events = EventLog::new();
    let ledger = Ledger::new(store, genesis).with_event_sink(events.clone());
    let mut dispatcher = Dispatcher::new(ledger);

    let (invocation, signer) = build_invocation(command)?;
    let result = match signer {
        Some(secret) => {
            let signed = SignedInvocation::sign(invocation, &secret)?;
            info!("Invocation signed by {}", signed.signer());
            dispatcher.invoke_signed(&signed)
        }
        None => dispatcher.query(&invocation),
    };
    let value = result.context("Invocation failed")?;

    dispatcher
        .ledger_mut()
        .flush()
        .context("Error while flushing ledger")?;

    for event in events.events() {
        println!("notify {}", event.to_notification());
    }
    print_json(&value)
}

fn build_invocation(command: Command) -> Result<(Invocation, Option<SecretKey>)> {
    let (invocation, signer_key) = match command {
        Command::Keygen => bail!("keygen does not dispatch an invocation"),
        Command::Deploy { signer } => (Invocation::Deploy, Some(signer.signer_key)),
        Command::Name => (Invocation::Name, None),
        Command::Symbol => (Invocation::Symbol, None),
        Command::Decimals => (Invocation::Decimals, None),
        Command::TotalSupply => (Invocation::TotalSupply, None),
        Command::Owner => (Invocation::Owner, None),
        Command::BalanceOf { account } => (Invocation::BalanceOf { account }, None),
        Command::Allowance { owner, spender } => (Invocation::Allowance { owner, spender }, None),
        Command::Transfer { signer, to, amount } => {
            let secret = parse_secret(&signer.signer_key)?;
            let from = secret.address();
            return Ok((Invocation::Transfer { from, to, amount }, Some(secret)));
        }
        Command::TransferMulti { signer, batch } => {
            let args = parse_json_array(&batch)?;
            (
                Invocation::parse("transferMulti", &args)?,
                Some(signer.signer_key),
            )
        }
        Command::TransferFrom {
            signer,
            from,
            to,
            amount,
        } => {
            let secret = parse_secret(&signer.signer_key)?;
            let spender = secret.address();
            let invocation = Invocation::TransferFrom {
                spender,
                from,
                to,
                amount,
            };
            return Ok((invocation, Some(secret)));
        }
        Command::Approve {
            signer,
            spender,
            amount,
        } => {
            let secret = parse_secret(&signer.signer_key)?;
            let owner = secret.address();
            let invocation = Invocation::Approve {
                owner,
                spender,
                amount,
            };
            return Ok((invocation, Some(secret)));
        }
        Command::Burn { signer, amount } => (Invocation::Burn { amount }, Some(signer.signer_key)),
        Command::TransferOwnership { signer, new_owner } => (
            Invocation::TransferOwnership { new_owner },
            Some(signer.signer_key),
        ),
        Command::Invoke {
            operation,
            args,
            signer_key,
        } => {
            let args = parse_json_array(&args)?;
            (Invocation::parse(&operation, &args)?, signer_key)
        }
    };

    let secret = signer_key.as_deref().map(parse_secret).transpose()?;
    Ok((invocation, secret))
}

fn parse_secret(hex: &str) -> Result<SecretKey> {
    SecretKey::from_hex(hex).context("Invalid signer key")
}

// Inline JSON array, or @path to a file holding one
fn parse_json_array(value: &str) -> Result<Vec<Value>> {
    let parsed: Value = match value.strip_prefix('@') {
        Some(path) => {
            let file = File::open(path).context("Error while opening JSON file")?;
            serde_json::from_reader(file).context("Error while reading JSON file")?
        }
        None => serde_json::from_str(value).context("Error while parsing JSON arguments")?,
    };

    match parsed {
        Value::Array(values) => Ok(values),
        other => bail!("Expected a JSON array, got {}", other),
    }
}

fn print_json(value: &Value) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("Error while serializing output")?;
    println!("{}", output);
    Ok(())
}
