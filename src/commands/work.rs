use super::Session;
use crate::{
    libs::{equipment::ExitCondition, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Select};

#[derive(Debug, Args)]
pub struct WorkArgs {
    /// Record id
    #[arg(required = true)]
    id: i64,
    /// Exit condition; asked for when neither option is given
    #[arg(short, long)]
    exit_condition: Option<ExitCondition>,
    /// Work remarks
    #[arg(short, long)]
    remarks: Option<String>,
}

fn select_exit_condition() -> Result<ExitCondition> {
    let labels: Vec<&str> = ExitCondition::ALL.iter().map(|c| c.label()).collect();
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::SelectExitCondition.to_string())
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(ExitCondition::ALL[index])
}

pub fn cmd(args: WorkArgs) -> Result<()> {
    let session = Session::open()?;
    let workshop = session.workshop();

    let exit_condition = match (args.exit_condition, args.remarks.as_deref()) {
        (None, None) => {
            // Refuse before prompting when the record cannot change anyway
            workshop.get(args.id)?;
            Some(select_exit_condition()?)
        }
        (condition, _) => condition,
    };

    workshop.update_work(args.id, exit_condition, args.remarks.as_deref())?;
    msg_success!(Message::WorkSaved);
    Ok(())
}
