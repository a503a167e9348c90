use super::Session;
use crate::{
    libs::{equipment::AttachmentKind, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct AttachArgs {
    /// Record id
    #[arg(required = true)]
    id: i64,
    /// Files to file, in order
    #[arg(required = true, num_args = 1..)]
    files: Vec<PathBuf>,
    /// photo, scan or document
    #[arg(short, long, default_value = "photo")]
    kind: AttachmentKind,
}

/// Files are processed one by one; the first failure stops the run and
/// leaves the earlier ones filed.
pub fn cmd(args: AttachArgs) -> Result<()> {
    let session = Session::open()?;
    let workshop = session.workshop();
    for file in &args.files {
        let filed = workshop.attach(args.id, file, args.kind)?;
        msg_success!(Message::AttachmentAdded(filed.display().to_string()));
    }
    Ok(())
}
