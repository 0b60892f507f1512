//! Key scripts and the replay loop.

use std::fmt;

use core_actions::Model;
use core_config::EditorConfig;
use core_state::Mode;
use tracing::{debug, info};

/// Tokens from a key script: one per line, `#` starts a comment line and
/// blank lines are skipped. A line holding a single space is the space key.
pub fn parse_keys(script: &str) -> Vec<String> {
    script
        .lines()
        .filter_map(|line| {
            if line == " " {
                return Some("<space>".to_string());
            }
            let token = line.trim();
            if token.is_empty() || token.starts_with('#') {
                None
            } else {
                Some(token.to_string())
            }
        })
        .collect()
}

/// Final editor state after a replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub mode: Mode,
    pub row: usize,
    pub col: usize,
    pub undo: usize,
    pub redo: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mode={} cursor={}:{} undo={} redo={}",
            self.mode, self.row, self.col, self.undo, self.redo
        )
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub value: String,
    pub summary: Summary,
    pub submits: usize,
}

pub fn run(config: EditorConfig, text: &str, tokens: &[String]) -> Report {
    let mut model = Model::new(config);
    model.set_value(text);
    let mut submits = 0;
    for token in tokens {
        let outcome = model.dispatch(token);
        debug!(target: "runtime", handled = outcome.handled, status = ?outcome.status, "token");
        if outcome.submit_requested.is_some() {
            submits += 1;
            info!(target: "runtime", "submit_requested");
        }
    }
    let cursor = model.cursor();
    Report {
        value: model.value(),
        summary: Summary {
            mode: model.mode(),
            row: cursor.row,
            col: cursor.col,
            undo: model.undo_depth(),
            redo: model.redo_depth(),
        },
        submits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::StartMode;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn script_skips_comments_and_blanks() {
        let script = "# delete a word\nd\nw\n\n \n<esc>\n";
        assert_eq!(parse_keys(script), vec!["d", "w", "<space>", "<esc>"]);
    }

    #[test]
    fn replay_reports_final_state() {
        let config = EditorConfig {
            start_mode: StartMode::Normal,
            ..EditorConfig::default()
        };
        let tokens = parse_keys("g\ng\n0\nd\nw\n");
        let report = run(config, "hello world", &tokens);
        assert_eq!(report.value, "world");
        assert_eq!(report.summary.to_string(), "mode=normal cursor=0:0 undo=1 redo=0");
    }

    #[test]
    fn submit_is_counted_not_applied() {
        let tokens = parse_keys("h\ni\n<enter>\n");
        let report = run(EditorConfig::default(), "", &tokens);
        assert_eq!(report.value, "hi");
        assert_eq!(report.submits, 1);
        assert_eq!(report.summary.mode, Mode::Insert);
    }

    #[test]
    fn script_file_with_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("vimline.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "[editor]\nstart_mode = \"normal\"\nchar_limit = 4").unwrap();
        let config = core_config::load_from(Some(config_path)).unwrap().editor();
        let tokens = parse_keys("A\nx\ny\nz\n");
        let report = run(config, "ab", &tokens);
        assert_eq!(report.value, "abxy");
        assert_eq!(report.summary.mode, Mode::Insert);
    }
}
