use super::Session;
use crate::{libs::messages::Message, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Record id
    #[arg(required = true)]
    id: i64,
    /// What was done
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,
}

pub fn cmd(args: LogArgs) -> Result<()> {
    let session = Session::open()?;
    session.workshop().add_intervention(args.id, &args.text.join(" "))?;
    msg_success!(Message::InterventionAdded);
    Ok(())
}
