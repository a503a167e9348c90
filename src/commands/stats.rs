use super::Session;
use crate::{
    db::equipments::Equipments,
    libs::{messages::Message, stats::Stats},
    msg_info,
};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let session = Session::open()?;
    let records = Equipments::new(&session.db).closed_in_inventory()?;
    let stats = Stats::compute(&records);
    if stats.is_empty() {
        msg_info!(Message::NoClosedRecords);
        return Ok(());
    }
    print!("{}", stats.render());
    Ok(())
}
