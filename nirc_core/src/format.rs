use crate::Error;

/// How an argument containing spaces is marked on the wire
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quoting {
    /// `:some text:`, understood by the servers this client was written against
    #[default]
    Wrapped,
    /// `:some text`, the standard trailing parameter
    Trailing,
}

impl std::str::FromStr for Quoting {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("wrapped") => Ok(Self::Wrapped),
            s if s.eq_ignore_ascii_case("trailing") => Ok(Self::Trailing),
            s => anyhow::bail!("unknown quoting: '{s}' (expected 'wrapped' or 'trailing')"),
        }
    }
}

/// Joins `command` and `args` into a single line, without a line ending.
///
/// Only one argument may need quoting and it has to be the last one. With
/// [`Quoting::Trailing`] anything else is an [`Error::MisplacedTrailing`].
pub fn format(command: &str, args: &[&str], quoting: Quoting) -> Result<String, Error> {
    let mut line = String::from(command);
    for (i, arg) in args.iter().enumerate() {
        line.push(' ');
        match quoting {
            Quoting::Wrapped if arg.contains(' ') => {
                line.push(':');
                line.push_str(arg);
                line.push(':');
            }
            Quoting::Trailing if arg.is_empty() || arg.contains(' ') || arg.starts_with(':') => {
                if i + 1 != args.len() {
                    return Err(Error::MisplacedTrailing(command.to_string()));
                }
                line.push(':');
                line.push_str(arg);
            }
            _ => line.push_str(arg),
        }
    }
    Ok(line)
}
