use blake2::digest::VariableOutput;
use blake2::VarBlake2b;
use regex::Regex;
use std::io::{copy, Error, ErrorKind, Read};
use std::sync::OnceLock;

pub fn compute_hash(read: &mut impl Read) -> Result<String, Error> {
    let mut hasher =
        VarBlake2b::new(10).map_err(|_| Error::new(ErrorKind::InvalidInput, "hash size"))?;
    copy(read, &mut hasher)?;
    let hash = hex::encode(hasher.vec_result());
    Ok(hash)
}

fn ansi_regex() -> &'static Regex {
    static ANSI: OnceLock<Regex> = OnceLock::new();
    // full CSI sequences, plus the bare colour codes left behind when ESC got lost
    ANSI.get_or_init(|| {
        Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]|\[(?:31|39|90)m").expect("ANSI pattern compiles")
    })
}

pub fn strip_ansi(text: &str) -> String {
    let mut current = ansi_regex().replace_all(text, "").into_owned();
    loop {
        let next = ansi_regex().replace_all(&current, "");
        if next == current {
            return current;
        }
        current = next.into_owned();
    }
}

pub fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn to_markup_lines(text: &str) -> String {
    escape_markup(text)
        .trim_end_matches('\n')
        .replace("\r\n", "\n")
        .replace('\n', "<br/>")
}

pub fn quote_command(program: &str, args: &[&str]) -> String {
    let mut line = program.to_owned();
    for arg in args {
        line.push(' ');
        line.push_str(&shlex::quote(arg));
    }
    line
}
