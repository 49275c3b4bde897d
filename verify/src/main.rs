use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use provenance_ledger::config::{Genesis, LedgerProfile};
use provenance_ledger::replay::replay_and_prove;
use provenance_ledger::types::Account;
use provenance_node::events::read_event_log;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Offline replay and verification of a provenance event log", long_about = None)]
struct Cli {
    #[command(flatten)]
    genesis: GenesisArgs,

    #[command(subcommand)]
    command: Cmd,
}

/// Inputs the ledger was constructed with. Must match the node's config
/// or the state hash will differ.
#[derive(Args, Debug)]
struct GenesisArgs {
    /// Initial administrator account (0x-prefixed hex)
    #[arg(long, global = true)]
    admin: Option<Account>,

    #[arg(long, global = true, default_value = "")]
    company_name: String,

    #[arg(long, global = true, default_value = "")]
    location: String,

    #[arg(long, global = true, default_value = "")]
    description: String,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Replay the event log and print a deterministic proof
    Proof {
        /// Path to the event log (e.g. events.log)
        event_log: PathBuf,

        /// Snapshot the events were committed on top of
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Replay the event log and print the ordered transfers of a batch
    Batch {
        event_log: PathBuf,
        batch_number: String,
    },
}

#[derive(Serialize)]
struct ProofOutput {
    protocol_version: u32,
    snapshot_hash: Option<String>,
    event_log_hash: String,
    final_state_hash: String,
    event_count: u64,
}

#[derive(Serialize)]
struct BatchEntry {
    position: usize,
    transfer_id: u64,
    point_id: u64,
    transfer_type: &'static str,
    link: String,
}

#[derive(Serialize)]
struct BatchOutput {
    batch_number: String,
    transfers: Vec<BatchEntry>,
}

impl GenesisArgs {
    fn genesis(&self) -> Result<Genesis> {
        let admin = self.admin.context("--admin is required")?;
        Ok(Genesis::new(admin).with_profile(LedgerProfile {
            company_name: self.company_name.clone(),
            location: self.location.clone(),
            description: self.description.clone(),
        }))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let genesis = cli.genesis.genesis()?;

    eprintln!("Provenance Verifier v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("Administrator at genesis: {}", genesis.administrator);

    match cli.command {
        Cmd::Proof { event_log, snapshot } => {
            let events = read_event_log(&event_log)
                .with_context(|| format!("Failed to read event log {:?}", event_log))?;
            let snap_bytes = match &snapshot {
                Some(path) => fs::read(path).with_context(|| format!("Failed to read snapshot {:?}", path))?,
                None => Vec::new(),
            };

            let (_, proof) = replay_and_prove(&genesis, &snap_bytes, &events)
                .map_err(|e| anyhow::anyhow!("Replay failed: {}", e))?;

            let out = ProofOutput {
                protocol_version: proof.protocol_version,
                snapshot_hash: proof.snapshot_hash.map(hex::encode),
                event_log_hash: hex::encode(proof.event_log_hash),
                final_state_hash: hex::encode(proof.final_state_hash),
                event_count: proof.event_count,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Cmd::Batch { event_log, batch_number } => {
            let events = read_event_log(&event_log)
                .with_context(|| format!("Failed to read event log {:?}", event_log))?;
            let (state, _) = replay_and_prove(&genesis, &[], &events)
                .map_err(|e| anyhow::anyhow!("Replay failed: {}", e))?;

            let transfers = state
                .transfers_for_batch(&batch_number)
                .iter()
                .enumerate()
                .map(|(position, id)| {
                    let t = state.product_transfers(*id)?;
                    Ok(BatchEntry {
                        position,
                        transfer_id: t.id.0,
                        point_id: t.point_id.0,
                        transfer_type: t.transfer_type.as_str(),
                        link: t.link.clone(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            println!("{}", serde_json::to_string_pretty(&BatchOutput { batch_number, transfers })?);
        }
    }

    Ok(())
}
