use crate::{Error, Response};

/// Parses one line of the form `[:prefix] command [params] [:trailing]`
pub fn parse(line: &str) -> Result<Response, Error> {
    let raw = line.trim_end_matches(['\r', '\n']);
    let malformed = || Error::MalformedMessage(raw.to_string());

    let input = &mut &*raw;
    let source = if input.starts_with(':') {
        Some(prefix(input).ok_or_else(malformed)?)
    } else {
        None
    };

    let command = command(input).ok_or_else(malformed)?;
    let args = args(input);

    Ok(Response {
        raw: raw.to_string(),
        source: source.map(Into::into),
        command: command.into(),
        args,
    })
}

fn prefix<'a>(input: &mut &'a str) -> Option<&'a str> {
    let (head, tail) = input.split_once(' ')?;
    let head = &head[1..];
    if head.is_empty() {
        return None;
    }
    *input = tail.trim_start_matches(' ');
    Some(head)
}

fn command<'a>(input: &mut &'a str) -> Option<&'a str> {
    let (head, tail) = input.split_once(' ').unwrap_or((*input, ""));
    *input = tail;

    let numeric = head.len() == 3 && head.bytes().all(|c| c.is_ascii_digit());
    let keyword = !head.is_empty() && head.bytes().all(|c| c.is_ascii_alphabetic());
    (numeric || keyword).then_some(head)
}

fn args(input: &mut &str) -> Vec<String> {
    let mut args = vec![];
    loop {
        let rest = input.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            args.push(trailing.to_string());
            *input = "";
            break;
        }

        let (head, tail) = rest.split_once(' ').unwrap_or((rest, ""));
        args.push(head.to_string());
        *input = tail;
    }
    args
}
