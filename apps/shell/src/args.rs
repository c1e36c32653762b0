//! # CLI Argument Definitions

use clap::{Parser, Subcommand};
use folio::domain::constants::{DEFAULT_API_URL, DEFAULT_IMAGE_HOST};
use folio::domain::content::ContentResource;
use folio::domain::sections::Visibility;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Admin console for a Folio portfolio")]
pub struct Cli {
    /// Base URL of the content API
    #[arg(long, global = true, env = "FOLIO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Section visibility registry
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Preview which sections the public homepage mounts
    Home {},
    /// Section content records
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
    /// Upload an image to the image host and print its URL
    Upload {
        file: PathBuf,

        /// Image host API key
        #[arg(long, env = "FOLIO_IMAGE_KEY", hide_env_values = true)]
        image_key: String,

        /// Image host base URL
        #[arg(long, env = "FOLIO_IMAGE_HOST", default_value = DEFAULT_IMAGE_HOST)]
        image_host: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print every section and its visibility
    Show {},
    /// Change one section and save the full registry
    Set {
        /// Section key, e.g. `gallery` or `galleryVisibility`
        section: String,
        /// `visible` or `hidden`
        visibility: Visibility,
    },
}

#[derive(Debug, Subcommand)]
pub enum ContentAction {
    /// Print every record of a resource as JSON
    List {
        /// Resource path, e.g. `gallery` or `hero-section`
        resource: ContentResource,
    },
    /// Delete one record
    Delete { resource: ContentResource, id: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn settings_set_parses_visibility() {
        let cli = Cli::try_parse_from(["folio", "settings", "set", "gallery", "hidden"]).unwrap();
        match cli.command {
            Commands::Settings { action: SettingsAction::Set { section, visibility } } => {
                assert_eq!(section, "gallery");
                assert_eq!(visibility, Visibility::Hidden);
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_visibility_is_rejected() {
        assert!(Cli::try_parse_from(["folio", "settings", "set", "gallery", "HIDDEN"]).is_err());
    }

    #[test]
    fn content_resources_are_checked() {
        let cli = Cli::try_parse_from(["folio", "content", "list", "hero-section"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Content { action: ContentAction::List { resource: ContentResource::Hero } }
        ));
        assert!(Cli::try_parse_from(["folio", "content", "list", "recipes"]).is_err());
    }
}
