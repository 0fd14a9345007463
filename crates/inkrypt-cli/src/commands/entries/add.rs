use std::path::Path;

use inkrypt_core::media::{MediaKind, MediaVault};
use inkrypt_core::DecryptedEntry;

use crate::app::{read_body, AppContext};
use crate::cli::AddArgs;
use crate::errors::CliError;

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let title = args.title.trim();
    if title.is_empty() {
        return Err(CliError::invalid_input("Entry title cannot be empty").into());
    }

    let journal = ctx.open_journal()?;
    let repo = journal.repo();

    let template = match args.template {
        Some(id) => Some(repo.get_template(id)?.ok_or_else(|| {
            CliError::not_found(
                format!("Template {} not found", id),
                "Hint: Run `inkrypt template list` to see available templates.",
            )
        })?),
        None => None,
    };

    let content = match (&args.body, &template) {
        (Some(body), _) => body.clone(),
        (None, Some(template)) => template.content.clone(),
        (None, None) => read_body(ctx.no_input(), None)?,
    };

    let mut entry = DecryptedEntry::new(title, content).with_tags(args.tag.iter().cloned());
    if let Some(template) = &template {
        entry = entry.with_template(template.id);
    }

    let vault = journal.media();
    let mut saved = Vec::new();
    let attached = attach_media(&vault, args, &mut saved);
    let entry = match attached {
        Ok((images, voice)) => {
            let entry = entry.with_media_paths(images);
            match voice {
                Some(path) => entry.with_voice_note(path),
                None => entry,
            }
        }
        Err(err) => {
            discard(&vault, &saved);
            return Err(err);
        }
    };

    let id = match repo.insert_entry(&entry).map_err(anyhow::Error::from) {
        Ok(id) => id,
        Err(err) => {
            discard(&vault, &saved);
            return Err(err);
        }
    };
    journal.save()?;

    if !ctx.quiet() {
        println!("Added entry {}", id);
    }
    Ok(())
}

/// Encrypt attachments into the vault, recording each saved file in `saved`.
fn attach_media(
    vault: &MediaVault,
    args: &AddArgs,
    saved: &mut Vec<String>,
) -> anyhow::Result<(Vec<String>, Option<String>)> {
    let mut images = Vec::new();
    for source in &args.image {
        let path = save_file(vault, source, MediaKind::Image)?;
        saved.push(path.clone());
        images.push(path);
    }

    let voice = match &args.voice {
        Some(source) => {
            let path = save_file(vault, source, MediaKind::VoiceNote)?;
            saved.push(path.clone());
            Some(path)
        }
        None => None,
    };
    Ok((images, voice))
}

fn save_file(vault: &MediaVault, source: &Path, kind: MediaKind) -> anyhow::Result<String> {
    let bytes = std::fs::read(source).map_err(|e| {
        CliError::not_found(
            format!("Cannot read attachment {}: {}", source.display(), e),
            "Hint: Check the file path.",
        )
    })?;
    let path = vault.save(&bytes, kind)?;
    Ok(path.to_string_lossy().to_string())
}

fn discard(vault: &MediaVault, saved: &[String]) {
    for path in saved {
        vault.delete(Path::new(path));
    }
}
