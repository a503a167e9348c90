use super::Session;
use crate::{libs::messages::Message, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct DestinationArgs {
    /// Record id
    #[arg(required = true)]
    id: i64,
    /// New destination; omit to clear it
    destination: Option<String>,
}

pub fn cmd(args: DestinationArgs) -> Result<()> {
    let session = Session::open()?;
    session.workshop().update_destination(args.id, args.destination.as_deref())?;
    msg_success!(Message::DestinationUpdated);
    Ok(())
}
