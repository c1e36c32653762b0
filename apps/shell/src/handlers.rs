//! Command handlers. Each one talks to the content API and prints a plain-text result.

use anyhow::{Context, Result, bail};
use folio::domain::content::ContentResource;
use folio::domain::sections::{SectionKey, Visibility};
use folio::features::content::client::ContentClient;
use folio::features::media::ImageHost;
use folio::features::settings::client::{SettingsClient, SettingsEditor};
use folio::features::settings::gate::{HomePage, PageState};
use folio::kernel::client::{ApiClient, Notice};
use std::path::Path;

pub async fn settings_show(api: ApiClient) -> Result<()> {
    let flags = SettingsClient::new(api).load_flags().await.context("Failed to read section flags")?;

    for key in SectionKey::ALL {
        println!("{:<14}{}", key.to_string(), flags.get(key));
    }
    Ok(())
}

pub async fn settings_set(api: ApiClient, section: &str, visibility: Visibility) -> Result<()> {
    let editor = SettingsEditor::new(SettingsClient::new(api));

    // Never save after a failed load; that would overwrite the registry with defaults.
    let loaded = editor.load().await;
    print_notices(editor.take_notices());
    loaded.context("Failed to read section flags")?;

    editor.set_flag_str(section, visibility)?;
    let saved = editor.save().await;
    print_notices(editor.take_notices());
    saved.context("Failed to save section flags")?;

    Ok(())
}

pub async fn home(api: ApiClient) -> Result<()> {
    let mut page = HomePage::mount(SettingsClient::new(api));

    match page.settled().await {
        PageState::Ready(sections) => {
            for (position, section) in sections.iter().enumerate() {
                println!("{:>2}. {section}", position + 1);
            }
            Ok(())
        },
        PageState::Failed(notice) => bail!("{notice}"),
        PageState::Loading => bail!("Homepage never finished loading"),
    }
}

pub async fn content_list(api: ApiClient, resource: ContentResource) -> Result<()> {
    let records = ContentClient::new(api)
        .list_raw(resource)
        .await
        .with_context(|| format!("Failed to list {}", resource.path()))?;

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

pub async fn content_delete(api: ApiClient, resource: ContentResource, id: &str) -> Result<()> {
    ContentClient::new(api)
        .delete_in(resource, id)
        .await
        .with_context(|| format!("Failed to delete {}/{id}", resource.path()))?;

    println!("{}", Notice::success(format!("Deleted {}/{id}", resource.path())));
    Ok(())
}

pub async fn upload(file: &Path, image_key: &str, image_host: &str) -> Result<()> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map_or_else(|| "image".to_owned(), |name| name.to_string_lossy().into_owned());

    let url = ImageHost::new(image_host, image_key)
        .upload(&file_name, bytes)
        .await
        .context("Image upload failed")?;

    println!("{url}");
    Ok(())
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        if notice.is_error() {
            eprintln!("{notice}");
        } else {
            println!("{notice}");
        }
    }
}
