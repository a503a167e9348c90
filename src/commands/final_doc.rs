use super::Session;
use crate::{
    libs::{equipment::FinalDocument, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct FinalDocArgs {
    /// Record id
    #[arg(required = true)]
    id: i64,
    /// Which closeout document
    #[arg(required = true)]
    kind: FinalDocument,
    /// Document to file
    #[arg(required = true)]
    file: PathBuf,
}

pub fn cmd(args: FinalDocArgs) -> Result<()> {
    let session = Session::open()?;
    session.workshop().add_final_document(args.id, args.kind, &args.file)?;
    msg_success!(Message::FinalDocumentAdded(args.kind.label().to_string()));
    Ok(())
}
