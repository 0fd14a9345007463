pub mod add;
pub mod delete;
pub mod list;
pub mod show;

pub use add::handle_add;
pub use delete::handle_delete;
pub use list::handle_list;
pub use show::handle_show;

use inkrypt_core::{DecryptedTemplate, JournalRepository, SqliteStore};

use crate::errors::CliError;

pub(crate) fn require_template(
    repo: &JournalRepository<SqliteStore>,
    id: i64,
) -> anyhow::Result<DecryptedTemplate> {
    repo.get_template(id)?.ok_or_else(|| {
        CliError::not_found(
            format!("Template {} not found", id),
            "Hint: Run `inkrypt template list` to see available templates.",
        )
        .into()
    })
}
