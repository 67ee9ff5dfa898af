//! Sets up the application's SQLite database.

use rusqlite::{Connection, functions::FunctionFlags};

use crate::{Error, transaction::create_transaction_table};

/// The name of the SQL function that lowercases text using Unicode case rules.
///
/// SQLite's built-in `lower` and `LIKE` only fold ASCII letters.
pub(crate) const CASEFOLD_FUNCTION: &str = "casefold";

/// Create the tables for the domain models if they do not already exist, and
/// register the SQL functions that queries rely on.
///
/// Functions only live as long as the connection, so this must be called on
/// every new connection.
///
/// # Errors
/// Returns an [Error::SqlError] if a function could not be registered or a
/// table could not be created, in which case no tables are created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    register_casefold(connection)?;

    let transaction = connection.unchecked_transaction()?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

fn register_casefold(connection: &Connection) -> Result<(), Error> {
    connection.create_scalar_function(
        CASEFOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |context| {
            let text: String = context.get(0)?;
            Ok(text.to_lowercase())
        },
    )?;

    Ok(())
}
