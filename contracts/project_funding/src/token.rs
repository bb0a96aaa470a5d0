use soroban_sdk::{token, Address, Env};

/// Move `amount` of `token` between two accounts.
///
/// A failed transfer traps the whole invocation, so no ledger update made
/// before it survives.
pub fn transfer(env: &Env, token: &Address, from: &Address, to: &Address, amount: &i128) {
    let client = token::Client::new(env, token);
    client.transfer(from, to, amount);
}
