//! Default emitter file generation

use anyhow::{Context, Result};
use ember_particles::ParticleSystemConfig;
use std::fs;
use std::path::Path;

pub fn run(output: Option<&str>, force: bool) -> Result<()> {
    let text = render_default()?;

    match output {
        None => print!("{text}"),
        Some(path) => {
            write_new(Path::new(path), &text, force)?;
            println!("Wrote default emitter to {path}");
        }
    }
    Ok(())
}

fn render_default() -> Result<String> {
    let text = ParticleSystemConfig::default().to_toml_string()?;
    Ok(format!("# Ember emitter configuration\n\n{text}"))
}

fn write_new(path: &Path, text: &str, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        );
    }
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_parses_back() {
        let text = render_default().unwrap();
        assert!(text.starts_with("# Ember emitter configuration"));
        let config = ParticleSystemConfig::from_toml_str(&text).unwrap();
        assert_eq!(config, ParticleSystemConfig::default());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emitter.toml");

        write_new(&path, "velocity = 1\n", false).unwrap();
        assert!(write_new(&path, "velocity = 2\n", false).is_err());
        write_new(&path, "velocity = 3\n", true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "velocity = 3\n");
    }
}
