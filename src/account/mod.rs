//! Accounts own transactions and are the "parent" of the transactions table:
//! the account page loads an account's transactions and hands them to the table.

mod accounts_page;
mod core;

pub use accounts_page::get_accounts_page;
pub use core::{
    Account, AccountId, create_account, create_account_table, get_account, get_default_account,
};
