// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `entrsphere questions` command implementation.

use colored::Colorize;
use entrsphere_config::EntrsphereConfig;
use entrsphere_core::EntrsphereError;
use entrsphere_router::{DiscoveryEngine, QuestionCatalog};

/// Plain-text listing of the catalog, one block per question.
pub fn render_catalog(catalog: &QuestionCatalog) -> String {
    let mut out = String::new();
    for (i, question) in catalog.iter().enumerate() {
        out.push_str(&format!("{}. [{}] {}\n", i + 1, question.id, question.prompt));
        for option in &question.options {
            let signals = option
                .signals
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(",");
            out.push_str(&format!(
                "     {:<20} {} ({})\n",
                option.id,
                option.label,
                if signals.is_empty() { "-" } else { &signals }
            ));
        }
    }
    out
}

pub fn run_questions(config: &EntrsphereConfig) -> Result<(), EntrsphereError> {
    let engine = DiscoveryEngine::from_config(&config.routing)?;
    println!("{}", config.discovery.name.bold());
    print!("{}", render_catalog(engine.catalog()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_option_with_signals() {
        let rendered = render_catalog(&QuestionCatalog::default());
        assert!(rendered.starts_with("1. [situation]"));
        assert!(rendered.contains("not_sure"));
        assert!(rendered.contains("(B,C)"));
        assert!(rendered.contains("standalone"));
        assert_eq!(rendered.lines().count(), 25);
    }
}
