//! Argument-vector reconstruction.
//!
//! Each command level contributes its name followed by the tokens of its
//! parameter readers in declaration order. Levels are chained root first,
//! so a nested invocation reads `[root, root params.., child, child params..]`,
//! the same shape a user would type.

use crate::factory::ValueReader;

/// One command level: its name and its parameter readers in order.
pub struct CommandLevel<'a> {
    pub name: &'a str,
    pub readers: &'a [ValueReader],
}

/// Concatenates the levels into one argument vector.
pub fn assemble<'a, I>(levels: I) -> Vec<String>
where
    I: IntoIterator<Item = CommandLevel<'a>>,
{
    let mut argv = Vec::new();
    for level in levels {
        argv.push(level.name.to_string());
        for reader in level.readers {
            argv.extend(reader());
        }
    }
    argv
}

/// Renders an argument vector as a shell command line, quoting as needed.
pub fn command_line(argv: &[String]) -> String {
    shell_words::join(argv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(tokens: &'static [&'static str]) -> ValueReader {
        Box::new(move || tokens.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn levels_are_chained_root_first() {
        let root = vec![fixed(&["--config", "a.yml"])];
        let child = vec![fixed(&["--fast"]), fixed(&[]), fixed(&["target"])];
        let argv = assemble([
            CommandLevel {
                name: "tool",
                readers: &root,
            },
            CommandLevel {
                name: "build",
                readers: &child,
            },
        ]);
        assert_eq!(
            argv,
            ["tool", "--config", "a.yml", "build", "--fast", "target"]
        );
    }

    #[test]
    fn level_without_readers_is_just_its_name() {
        assert_eq!(
            assemble([CommandLevel {
                name: "tool",
                readers: &[],
            }]),
            ["tool"]
        );
    }

    #[test]
    fn command_line_quotes_tokens() {
        let argv: Vec<String> = ["greet", "--name", "Ada Lovelace", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(command_line(&argv), "greet --name 'Ada Lovelace' ''");
    }
}
