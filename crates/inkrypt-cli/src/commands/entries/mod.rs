pub mod add;
pub mod delete;
pub mod edit;
pub mod list;
pub mod search;
pub mod show;

pub use add::handle_add;
pub use delete::handle_delete;
pub use edit::handle_edit;
pub use list::handle_list;
pub use search::handle_search;
pub use show::handle_show;

use inkrypt_core::{DecryptedEntry, JournalRepository, SqliteStore};

use crate::errors::CliError;

/// Fetch an entry or fail with a not-found hint.
pub(crate) fn require_entry(
    repo: &JournalRepository<SqliteStore>,
    id: i64,
) -> anyhow::Result<DecryptedEntry> {
    repo.get_entry(id)?.ok_or_else(|| {
        CliError::not_found(
            format!("Entry {} not found", id),
            "Hint: Run `inkrypt list` to find entry IDs.",
        )
        .into()
    })
}
