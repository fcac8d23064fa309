//! Script building and rendering

use std::fmt;

/// Script format version understood by the interpreter
pub const SCRIPT_VERSION: u32 = 2;

/// One `@namespace.name(args)` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub namespace: String,
    pub name: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}.{}", self.namespace, self.name)?;
        if self.args.is_empty() {
            return Ok(());
        }
        let args: Vec<String> = self.args.iter().map(|a| escape_arg(a)).collect();
        write!(f, "({})", args.join(","))
    }
}

/// Make an argument safe inside `(a,b)`: line breaks become '~', ',' becomes
/// U+201A '‚' and parentheses become brackets.
fn escape_arg(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len());
    let mut chars = arg.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push('~');
            }
            '\n' => out.push('~'),
            ',' => out.push('\u{201A}'),
            '(' => out.push('['),
            ')' => out.push(']'),
            c => out.push(c),
        }
    }
    out
}

/// A complete script, rendered with `to_string()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionScript {
    version: u32,
    commands: Vec<Command>,
}

impl ActionScript {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            commands: Vec::new(),
        }
    }

    /// Append a command built from its parts
    pub fn command<I, A>(self, namespace: &str, name: &str, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: ToString,
    {
        let command = args
            .into_iter()
            .fold(Command::new(namespace, name), |cmd, a| cmd.arg(a));
        self.push(command)
    }

    pub fn push(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    // Shorthands for the commands overworld entities use

    pub fn show_text(self, text: &str) -> Self {
        self.command("text", "show", [text])
    }

    pub fn play_sound(self, sound: &str) -> Self {
        self.command("sound", "play", [sound])
    }

    pub fn move_player(self, steps: u32) -> Self {
        self.command("player", "move", [steps])
    }

    pub fn hide_follower(self) -> Self {
        self.command("pokemon", "hide", Vec::<String>::new())
    }

    pub fn update_level(self) -> Self {
        self.command("level", "update", Vec::<String>::new())
    }
}

impl Default for ActionScript {
    fn default() -> Self {
        Self::new(SCRIPT_VERSION)
    }
}

impl fmt::Display for ActionScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "version={}", self.version)?;
        for command in &self.commands {
            writeln!(f, "{}", command)?;
        }
        write!(f, ":end")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_without_args_has_no_parens() {
        assert_eq!(Command::new("pokemon", "hide").to_string(), "@pokemon.hide");
    }

    #[test]
    fn test_command_args_joined_by_comma() {
        let cmd = Command::new("battle", "wild").arg(74).arg(12);
        assert_eq!(cmd.to_string(), "@battle.wild(74,12)");
    }

    #[test]
    fn test_newlines_become_tildes() {
        let script = ActionScript::default().show_text("Blaze used\nRock Smash!");
        assert_eq!(script.commands()[0].to_string(), "@text.show(Blaze used~Rock Smash!)");
    }

    #[test]
    fn test_args_cannot_break_command_syntax() {
        let cmd = Command::new("text", "show").arg("Mr. Mime, Jr) said\r\nhi\r(again)").arg(3);
        assert_eq!(cmd.to_string(), "@text.show(Mr. Mime\u{201A} Jr] said~hi~[again],3)");
        assert_eq!(cmd.to_string().matches(',').count(), 1);
    }

    #[test]
    fn test_render_full_script() {
        let script = ActionScript::default()
            .show_text("Gyarados used~Waterfall.")
            .move_player(3)
            .hide_follower()
            .command("player", "setmovement", [0, -1, 0]);

        assert_eq!(
            script.to_string(),
            "version=2\n@text.show(Gyarados used~Waterfall.)\n@player.move(3)\n@pokemon.hide\n@player.setmovement(0,-1,0)\n:end"
        );
    }

    #[test]
    fn test_empty_script() {
        assert_eq!(ActionScript::new(1).to_string(), "version=1\n:end");
    }
}
