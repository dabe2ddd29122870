use crate::config::{ConfigLayer, ConfigLoader};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the merged configuration and the files it came from
    Show,
    /// Show configuration file paths and whether each exists
    Path,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(),
        ConfigCommands::Path => show_paths(),
    }
}

fn show_config() -> Result<()> {
    let config = ConfigLoader::load()?;
    println!("{}", loaded_from(&ConfigLoader::layers()));
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn show_paths() -> Result<()> {
    for layer in ConfigLoader::layers() {
        let state = if layer.exists() { "found" } else { "not found" };
        println!("{:<8} {} ({})", layer.name, layer.path.display(), state);
    }
    Ok(())
}

/// TOML comment naming the layers that contributed, in merge order.
fn loaded_from(layers: &[ConfigLayer]) -> String {
    let found: Vec<String> = layers
        .iter()
        .filter(|layer| layer.exists())
        .map(|layer| format!("# {}: {}", layer.name, layer.path.display()))
        .collect();
    if found.is_empty() {
        "# No config files found, showing defaults".to_string()
    } else {
        format!("# Loaded from (later wins):\n{}", found.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loaded_from_lists_only_existing_layers() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("config.toml");
        std::fs::write(&project, "[engine]\nseed = 1\n").unwrap();
        let layers = vec![
            ConfigLayer {
                name: "user",
                path: dir.path().join("missing.toml"),
            },
            ConfigLayer {
                name: "project",
                path: project.clone(),
            },
        ];

        let header = loaded_from(&layers);

        assert!(header.contains("# project:"));
        assert!(header.contains(&project.display().to_string()));
        assert!(!header.contains("user"));
    }

    #[test]
    fn loaded_from_without_files_mentions_defaults() {
        let dir = TempDir::new().unwrap();
        let layers = vec![ConfigLayer {
            name: "user",
            path: dir.path().join("missing.toml"),
        }];

        assert!(loaded_from(&layers).contains("defaults"));
    }
}
