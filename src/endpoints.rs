//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/accounts/{account_id}', use [format_endpoint].

/// The root route which redirects to the default account.
pub const ROOT: &str = "/";
/// The page listing all accounts.
pub const ACCOUNTS_VIEW: &str = "/accounts";
/// The page for displaying an account and its transactions.
pub const ACCOUNT_VIEW: &str = "/accounts/{account_id}";
/// The page for creating a transaction, or editing one with the `edit` query parameter.
pub const EDIT_TRANSACTION_VIEW: &str = "/transaction/create";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to delete the selected transactions of an account.
pub const BULK_DELETE_TRANSACTIONS: &str = "/api/accounts/{account_id}/transactions/delete";
/// The route to delete a single transaction of an account.
pub const DELETE_TRANSACTION: &str = "/api/accounts/{account_id}/transactions/{transaction_id}";

/// Replace the parameters in `endpoint_path` with `ids`, in order.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/accounts/{account_id}', '{account_id}'
/// is the parameter.
///
/// Parameters without a matching id are left as is, and extra ids are ignored.
pub fn format_endpoint(endpoint_path: &str, ids: &[&str]) -> String {
    let mut formatted = String::with_capacity(endpoint_path.len());
    let mut rest = endpoint_path;
    let mut ids = ids.iter();

    while let Some(start) = rest.find('{') {
        let Some(length) = rest[start..].find('}') else {
            break;
        };

        let Some(id) = ids.next() else {
            break;
        };

        formatted.push_str(&rest[..start]);
        formatted.push_str(id);
        rest = &rest[start + length + 1..];
    }

    formatted.push_str(rest);
    formatted
}

/// The page for editing the transaction `transaction_id`.
pub fn edit_transaction_url(transaction_id: &str) -> String {
    match serde_urlencoded::to_string([("edit", transaction_id)]) {
        Ok(query) => format!("{EDIT_TRANSACTION_VIEW}?{query}"),
        Err(error) => {
            tracing::error!("could not encode the edit URL for {transaction_id}: {error}");
            EDIT_TRANSACTION_VIEW.to_owned()
        }
    }
}
