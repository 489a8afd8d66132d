//! Built-in configurations.

use clap::ValueEnum;

use crate::config::core::{Config, JobConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Flatten the near-black backgrounds of the static frontend to #000.
    DarkBackgrounds,
}

impl Preset {
    pub fn config(self) -> Config {
        match self {
            Preset::DarkBackgrounds => dark_backgrounds(),
        }
    }
}

/// Paths are relative to the static frontend root.
pub fn dark_backgrounds() -> Config {
    let black = |old: &str| (old.to_owned(), "#000".to_owned());
    Config {
        source_path: Some("src/App.tsx".into()),
        offsets: vec![27893, 64351],
        replacement_rules: vec![
            black("#121212"),
            black("#0b0b0b"),
            black("#0d0d0d"),
            black("#0a0a0a"),
            black("linear-gradient(to right, #111111, #222222)"),
            black("linear-gradient(135deg, #111111 0%, #222222 100%)"),
        ],
        target_paths: vec!["src/App.tsx".into()],
        jobs: vec![JobConfig {
            replacement_rules: vec![black("#0d0d0d"), black("#0a0a0a")],
            target_paths: vec![
                "src/components/ui/glow-border.tsx".into(),
                "src/components/ui/glowing-card.tsx".into(),
                "src/components/ui/background-beams.tsx".into(),
            ],
        }],
        atomic: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_backgrounds_is_valid() {
        let c = Preset::DarkBackgrounds.config();
        c.validate().unwrap();
        let jobs = c.jobs();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].rules.len(), 6);
        assert_eq!(jobs[1].targets.len(), 3);
        assert!(!jobs[0].rules.reintroduces_patterns());
    }

    #[test]
    fn dark_backgrounds_flattens_gradients() {
        let rules = &dark_backgrounds().jobs()[0].rules;
        let css = "background: linear-gradient(135deg, #111111 0%, #222222 100%); color: #0a0a0a";
        assert_eq!(rules.apply(css), "background: #000; color: #000");
    }
}
