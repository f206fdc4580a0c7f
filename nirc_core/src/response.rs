/// The command kinds the dispatcher knows about
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `001`, registration is complete
    Welcome,
    Privmsg,
    Quit,
    Ping,
    Other,
}

impl Command {
    /// Keywords are matched case-insensitively, numerics must match exactly.
    pub fn from_token(token: &str) -> Self {
        const KEYWORDS: [(&str, Command); 3] = [
            ("PRIVMSG", Command::Privmsg),
            ("QUIT", Command::Quit),
            ("PING", Command::Ping),
        ];

        if token == "001" {
            return Self::Welcome;
        }

        KEYWORDS
            .iter()
            .find_map(|&(name, cmd)| token.eq_ignore_ascii_case(name).then_some(cmd))
            .unwrap_or(Self::Other)
    }
}

/// One parsed protocol line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub raw: String,
    pub source: Option<String>,
    pub command: String,
    pub args: Vec<String>,
}

impl Response {
    pub fn kind(&self) -> Command {
        Command::from_token(&self.command)
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}
