use ledger_core::identity::{IdentityManager, LocalStorage};

use crate::error::CliError;

pub fn run_whoami<S: LocalStorage>(identity: &IdentityManager<S>) {
    match identity.display_name() {
        Some(name) => println!("{name} ({})", identity.id()),
        None => println!("Unidentified investigator ({})", identity.id()),
    }
}

pub fn run_identity_set<S: LocalStorage>(
    identity: &mut IdentityManager<S>,
    name_parts: &[String],
) -> Result<(), CliError> {
    let participant = identity.submit_name(&name_parts.join(" "))?;
    println!("Signed the book as {}", participant.name);
    Ok(())
}

pub fn run_identity_reset<S: LocalStorage>(
    identity: &mut IdentityManager<S>,
) -> Result<(), CliError> {
    identity.change_identity()?;
    println!("Name forgotten; run `ledger identity set <NAME>` to sign again");
    Ok(())
}
