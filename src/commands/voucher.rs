use super::Session;
use crate::{libs::messages::Message, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct VoucherArgs {
    /// Record id
    #[arg(required = true)]
    id: i64,
    /// Mark the voucher as missing instead
    #[arg(long)]
    unset: bool,
}

pub fn cmd(args: VoucherArgs) -> Result<()> {
    let session = Session::open()?;
    let available = !args.unset;
    session.workshop().set_return_voucher(args.id, available)?;
    msg_success!(Message::ReturnVoucherSet(available));
    Ok(())
}
