use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mingit_core::{ObjectId, ObjectKind, Store, encode_frame};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// mingit - a minimal Git-compatible object database
#[derive(Parser)]
#[command(name = "mingit")]
#[command(about = "Minimal Git-compatible content-addressed object database", long_about = None)]
#[command(version)]
struct Cli {
    /// Object database root (defaults to .git)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new object database
    Init,

    /// Print the payload of an object
    CatFile {
        /// Pretty-print the object's content
        #[arg(short = 'p')]
        pretty: bool,

        /// Id of the object (40 hex characters)
        object: String,
    },

    /// Compute the blob id of a file
    HashObject {
        /// Write the blob into the object database
        #[arg(short = 'w')]
        write: bool,

        /// File to hash
        file: PathBuf,
    },

    /// List the entries of a tree object
    LsTree {
        /// Show mode and id in addition to the name
        #[arg(short = 'l', long)]
        long: bool,

        /// Id of the tree (40 hex characters)
        object: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let root = cli.root.unwrap_or_else(|| PathBuf::from(".git"));

    match cli.command {
        Commands::Init => cmd_init(&root),
        Commands::CatFile { pretty, object } => cmd_cat_file(&root, pretty, &object),
        Commands::HashObject { write, file } => cmd_hash_object(&root, write, &file),
        Commands::LsTree { long, object } => cmd_ls_tree(&root, long, &object),
    }
}

fn cmd_init(root: &Path) -> Result<()> {
    Store::init(root)
        .with_context(|| format!("Failed to initialize object database at {}", root.display()))?;

    println!("Initialized git directory");

    Ok(())
}

fn cmd_cat_file(root: &Path, pretty: bool, object: &str) -> Result<()> {
    if !pretty {
        anyhow::bail!("cat-file requires -p");
    }

    let store = Store::open(root)
        .with_context(|| format!("Failed to open object database at {}", root.display()))?;

    let id = ObjectId::from_hex(object).with_context(|| format!("Invalid object id: {}", object))?;

    let payload = store
        .get(&id)
        .with_context(|| format!("Failed to read object {}", id))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(&payload)?;

    Ok(())
}

fn cmd_hash_object(root: &Path, write: bool, file: &Path) -> Result<()> {
    let id = if write {
        let store = Store::open(root)
            .with_context(|| format!("Failed to open object database at {}", root.display()))?;

        let reader =
            File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
        store
            .put_blob(reader)
            .with_context(|| format!("Failed to write blob for {}", file.display()))?
    } else {
        let data =
            std::fs::read(file).with_context(|| format!("Failed to read file: {}", file.display()))?;
        ObjectId::hash_bytes(&encode_frame(ObjectKind::Blob, &data))
    };

    println!("{}", id);

    Ok(())
}

fn cmd_ls_tree(root: &Path, long: bool, object: &str) -> Result<()> {
    let store = Store::open(root)
        .with_context(|| format!("Failed to open object database at {}", root.display()))?;

    let id = ObjectId::from_hex(object).with_context(|| format!("Invalid object id: {}", object))?;

    let entries = store
        .get_tree(&id)
        .with_context(|| format!("Failed to read tree {}", id))?;

    for entry in entries {
        if long {
            println!("{} {} {}", entry.mode, entry.id, entry.name);
        } else {
            println!("{}", entry.name);
        }
    }

    Ok(())
}
