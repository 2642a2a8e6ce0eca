//! Guard table inspection.

use std::process::ExitCode;

use freshwash_core::{GuardDecision, GuardTable, Role};

use super::CommandError;

/// Exit code when the visitor would be redirected.
const REDIRECT_EXIT: u8 = 2;

/// Print the portal's guard table, one rule per line.
#[allow(clippy::print_stdout)]
pub fn print_table() -> Result<(), CommandError> {
    let table = GuardTable::portal()?;
    let width = table
        .rules()
        .iter()
        .map(|rule| rule.pattern().len())
        .max()
        .unwrap_or(0);

    for rule in table.rules() {
        let roles: Vec<&str> = rule.required_roles().map(Role::as_str).collect();
        println!(
            "{:<width$}  {:<40}  -> {}",
            rule.pattern(),
            roles.join(","),
            rule.unauthorized_redirect(),
        );
    }
    Ok(())
}

/// Print what `role` gets at `path`.
#[allow(clippy::print_stdout)]
pub fn check(role: Option<Role>, path: &str) -> Result<ExitCode, CommandError> {
    let table = GuardTable::portal()?;
    let decision = table.evaluate(path, role);
    let who = role.map_or("anonymous", Role::as_str);

    match &decision {
        GuardDecision::Public => println!("{who} {path}: public"),
        GuardDecision::Authorized => println!("{who} {path}: render"),
        GuardDecision::Redirect { to, reason } => {
            println!("{who} {path}: redirect to {to} ({reason:?})");
        }
    }

    Ok(if decision.renders() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(REDIRECT_EXIT)
    })
}
