mod cli;

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Command};
use vsfs::{ReplayPolicy, Vsfs};
use vsfs_fuse::BlockFile;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprint!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprint!(": {cause}");
                source = cause.source();
            }
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    log::debug!("image={:?}", cli.image);
    let block_file = BlockFile::open(&cli.image)
        .map_err(|err| format!("cannot open {}: {err}", cli.image.display()))?;
    let fs = Vsfs::open(Arc::new(block_file))?;

    match &cli.command {
        Command::Create { name } => {
            let inode_id = fs.create(name)?;
            println!("Created file '{name}' (inode {inode_id})");
        }
        Command::Install { commit_only } => {
            let policy = if *commit_only {
                ReplayPolicy::CommitOnly
            } else {
                ReplayPolicy::Lenient
            };
            let report = fs.install_with(policy)?;
            println!("Installed {} transactions", report.transactions);
            if !report.end.is_clean() {
                println!("Stopped early: {:?}", report.end);
            }
            if report.discarded_records > 0 {
                println!("Discarded {} uncommitted records", report.discarded_records);
            }
        }
        Command::Status => {
            let status = fs.status()?;
            if status.initialized {
                println!(
                    "Journal: {}/{} bytes used, {} committed transactions, {} pending records",
                    status.bytes_used, status.capacity, status.transactions, status.pending_records
                );
            } else {
                println!("Journal: not initialized ({} bytes capacity)", status.capacity);
            }
        }
    }

    Ok(())
}
