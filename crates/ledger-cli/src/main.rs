//! Command-line demos for the ledger primitives.
//!
//! Results go to stdout; progress goes through `log` (set `RUST_LOG=debug`
//! to watch the nonce search advance).

use clap::{Parser, Subcommand};
use log::{debug, info};
use serde::Serialize;

use ledger_core::block::{Block, BlockHeader};
use ledger_core::hash::{Digest, DigestError, Sha256Hasher};
use ledger_core::merkle::{verify_proof, MerkleError, MerkleTree};
use ledger_core::pow::{seal_batch, SEAL_BATCH_SIZE};

const DEFAULT_ITEMS: [&str; 5] = [
    "Transaction1",
    "Transaction2",
    "Transaction3",
    "Transaction4",
    "Transaction5",
];

/// Merkle commitment and proof-of-work demos.
#[derive(Parser)]
#[command(name = "ledger", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a Merkle tree over data items and print its root
    Root {
        /// Data items committed by the tree, in order
        #[arg(num_args = 1.., default_values = DEFAULT_ITEMS)]
        items: Vec<String>,
    },
    /// Produce an inclusion proof for one leaf and re-verify it
    Prove {
        /// Leaf position to prove
        #[arg(long, default_value_t = 2)]
        index: usize,
        /// Data items committed by the tree, in order
        #[arg(num_args = 1.., default_values = DEFAULT_ITEMS)]
        items: Vec<String>,
    },
    /// Seal a payload by brute-force nonce search and print the block as JSON
    Seal {
        /// Block payload
        #[arg(default_value = "Block 1")]
        data: String,
        /// Header version field
        #[arg(long, default_value_t = 1)]
        version: u32,
        /// Required leading zero hex characters in the block hash
        #[arg(long, default_value_t = 4)]
        difficulty: u32,
        /// Previous block hash as 64 hex characters (defaults to all zeros)
        #[arg(long)]
        previous_hash: Option<String>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("merkle error: {0}")]
    Merkle(#[from] MerkleError),
    #[error("invalid previous hash: {0}")]
    PreviousHash(#[from] DigestError),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized form of a sealed block. Block serialization is the embedding's
/// concern, so the view lives here rather than in the core.
#[derive(Serialize)]
struct BlockView {
    data: String,
    blockheader: HeaderView,
    nonce: u64,
    hash: String,
}

#[derive(Serialize)]
struct HeaderView {
    version: u32,
    difficulty: u32,
    previous_hash: String,
}

impl From<&Block> for BlockView {
    fn from(block: &Block) -> Self {
        BlockView {
            data: String::from_utf8_lossy(&block.data).into_owned(),
            blockheader: HeaderView {
                version: block.header.version,
                difficulty: block.header.difficulty,
                previous_hash: block.header.previous_hash.to_hex(),
            },
            nonce: block.nonce,
            hash: block.hash.to_hex(),
        }
    }
}

fn cmd_root(items: Vec<String>) -> Result<(), CliError> {
    let tree = MerkleTree::build(&items)?;
    println!("{}", tree.root());
    Ok(())
}

fn cmd_prove(items: Vec<String>, index: usize) -> Result<(), CliError> {
    let tree = MerkleTree::build(&items)?;
    let proof = tree.proof(index)?;
    let verified = verify_proof(index, &items[index], &proof, tree.root())?;

    println!("root: {}", tree.root());
    println!("{}", serde_json::to_string_pretty(&proof)?);
    println!("verified: {}", verified);
    Ok(())
}

fn cmd_seal(
    data: String,
    version: u32,
    difficulty: u32,
    previous_hash: Option<String>,
) -> Result<(), CliError> {
    let previous_hash = match previous_hash {
        Some(hex) => Digest::from_hex(&hex)?,
        None => Digest::ZERO,
    };
    let header = BlockHeader::new(version, difficulty, previous_hash);

    info!("sealing {} bytes at difficulty {}", data.len(), difficulty);

    // Drive the search in batches so progress is observable between them.
    let mut nonce_start = 0u64;
    let (nonce, hash) = loop {
        let batch = seal_batch(
            &Sha256Hasher,
            data.as_bytes(),
            &header,
            nonce_start,
            SEAL_BATCH_SIZE,
        );
        if let (Some(nonce), Some(hash)) = (batch.nonce, batch.hash) {
            break (nonce, hash);
        }
        nonce_start += SEAL_BATCH_SIZE;
        debug!("no seal below nonce {}", nonce_start);
    };

    info!("sealed after {} hashes", nonce + 1);

    let block = Block::from_seal(data.into_bytes(), header, nonce, hash);
    println!("{}", serde_json::to_string_pretty(&BlockView::from(&block))?);
    Ok(())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Root { items } => cmd_root(items),
        Command::Prove { items, index } => cmd_prove(items, index),
        Command::Seal {
            data,
            version,
            difficulty,
            previous_hash,
        } => cmd_seal(data, version, difficulty, previous_hash),
    };

    if let Err(err) = result {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
