//! Interactive prompts and validation for the role, port, and server
//! address.
//!
//! Invalid input never leaves this module: each prompt loops locally until
//! the user supplies something acceptable. The loops are generic over the
//! reader and writer so tests can drive them with in-memory buffers.

use std::io::{self, BufRead, Write};
use std::net::Ipv4Addr;

/// Which side of the conversation this process plays. Chosen once at
/// startup and fixed for the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Server,
    Client,
}

pub fn parse_role(input: &str) -> Option<Role> {
    match input.trim() {
        "1" | "server" => Some(Role::Server),
        "2" | "client" => Some(Role::Client),
        _ => None,
    }
}

/// Accepts a decimal port strictly between 0 and 65535. Note the top port
/// is excluded, matching the range the prompts have always enforced.
pub fn parse_port(input: &str) -> Option<u16> {
    match input.trim().parse::<u32>() {
        Ok(port) if port > 0 && port < 65535 => Some(port as u16),
        _ => None,
    }
}

/// Validates the first whitespace-separated token as a dotted-quad IPv4
/// address: exactly four all-digit octets, none empty, each at most 255.
/// Leading zeros are tolerated.
pub fn parse_ipv4(input: &str) -> Option<Ipv4Addr> {
    let token = input.split_whitespace().next()?;
    let mut octets = [0u8; 4];
    let mut count = 0;
    for part in token.split('.') {
        if count == 4 {
            return None;
        }
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Overlong digit runs fail the parse on their own.
        let value: u32 = part.parse().ok()?;
        if value > 255 {
            return None;
        }
        octets[count] = value as u8;
        count += 1;
    }
    if count != 4 {
        return None;
    }
    Some(Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]))
}

fn read_reply<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut raw = String::new();
    if input.read_line(&mut raw)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed during prompt",
        ));
    }
    Ok(raw)
}

pub fn prompt_role<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Role> {
    loop {
        write!(
            out,
            "Press 1 to run chat server or 2 to run chat client and then press enter: "
        )?;
        out.flush()?;
        match parse_role(&read_reply(input)?) {
            Some(role) => return Ok(role),
            None => writeln!(out, "\nYou have provided invalid input... try again!")?,
        }
    }
}

pub fn prompt_port<R: BufRead, W: Write>(input: &mut R, out: &mut W, role: Role) -> io::Result<u16> {
    loop {
        match role {
            Role::Server => write!(
                out,
                "\nType the port number (1-65535) you want your server to listen on and press enter: "
            )?,
            Role::Client => write!(
                out,
                "\nType the port number (1-65535) you want to connect to on the server and press enter: "
            )?,
        }
        out.flush()?;
        match parse_port(&read_reply(input)?) {
            Some(port) => return Ok(port),
            None => writeln!(out, "\nInvalid Input.  try again.")?,
        }
    }
}

pub fn prompt_ipv4<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Ipv4Addr> {
    loop {
        write!(out, "\nWhat's the IP address you'd like to connect to? ")?;
        out.flush()?;
        match parse_ipv4(&read_reply(input)?) {
            Some(ip) => return Ok(ip),
            None => writeln!(out, "\nInvalid Input IP address.  Try again.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::net::Ipv4Addr;

    use super::{parse_ipv4, parse_port, parse_role, prompt_ipv4, prompt_port, prompt_role, Role};

    #[test]
    fn port_accepts_the_valid_range() {
        assert_eq!(parse_port("1"), Some(1));
        assert_eq!(parse_port("65534"), Some(65534));
        assert_eq!(parse_port("8080"), Some(8080));
        assert_eq!(parse_port(" 8080\n"), Some(8080));
    }

    #[test]
    fn port_rejects_out_of_range_and_garbage() {
        assert_eq!(parse_port("0"), None);
        assert_eq!(parse_port("65535"), None);
        assert_eq!(parse_port("-5"), None);
        assert_eq!(parse_port("abc"), None);
        assert_eq!(parse_port(""), None);
    }

    #[test]
    fn ipv4_accepts_dotted_quads() {
        assert_eq!(parse_ipv4("0.0.0.0"), Some(Ipv4Addr::new(0, 0, 0, 0)));
        assert_eq!(
            parse_ipv4("255.255.255.255"),
            Some(Ipv4Addr::new(255, 255, 255, 255))
        );
        assert_eq!(parse_ipv4("127.0.0.1\n"), Some(Ipv4Addr::new(127, 0, 0, 1)));
        // Only the first token is considered.
        assert_eq!(
            parse_ipv4("10.0.0.1 trailing words"),
            Some(Ipv4Addr::new(10, 0, 0, 1))
        );
    }

    #[test]
    fn ipv4_tolerates_leading_zeros() {
        assert_eq!(parse_ipv4("010.020.030.040"), Some(Ipv4Addr::new(10, 20, 30, 40)));
        assert_eq!(parse_ipv4("0001.2.3.4"), Some(Ipv4Addr::new(1, 2, 3, 4)));
    }

    #[test]
    fn ipv4_rejects_malformed_addresses() {
        assert_eq!(parse_ipv4("1.2.3"), None);
        assert_eq!(parse_ipv4("1.2.3.4.5"), None);
        assert_eq!(parse_ipv4("1.2.256.4"), None);
        assert_eq!(parse_ipv4("1..2.3"), None);
        assert_eq!(parse_ipv4("a.b.c.d"), None);
        assert_eq!(parse_ipv4(""), None);
    }

    #[test]
    fn role_accepts_numbers_and_names() {
        assert_eq!(parse_role("1"), Some(Role::Server));
        assert_eq!(parse_role("server"), Some(Role::Server));
        assert_eq!(parse_role("2\n"), Some(Role::Client));
        assert_eq!(parse_role("client"), Some(Role::Client));
        assert_eq!(parse_role("3"), None);
    }

    #[test]
    fn prompt_port_reprompts_until_valid() {
        let mut input = Cursor::new(b"abc\n70000\n8080\n".to_vec());
        let mut out = Vec::new();
        let port = prompt_port(&mut input, &mut out, Role::Server).unwrap();
        assert_eq!(port, 8080);
        let shown = String::from_utf8(out).unwrap();
        assert_eq!(shown.matches("Invalid Input.  try again.").count(), 2);
    }

    #[test]
    fn prompt_ipv4_reprompts_until_valid() {
        let mut input = Cursor::new(b"1.2.3\n1.2.3.4\n".to_vec());
        let mut out = Vec::new();
        let ip = prompt_ipv4(&mut input, &mut out).unwrap();
        assert_eq!(ip, Ipv4Addr::new(1, 2, 3, 4));
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("Invalid Input IP address."));
    }

    #[test]
    fn prompt_role_reprompts_until_valid() {
        let mut input = Cursor::new(b"9\n2\n".to_vec());
        let mut out = Vec::new();
        assert_eq!(prompt_role(&mut input, &mut out).unwrap(), Role::Client);
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("Press 1 to run chat server or 2 to run chat client"));
        assert!(shown.contains("You have provided invalid input... try again!"));
    }

    #[test]
    fn prompt_errors_when_input_closes() {
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let err = prompt_role(&mut input, &mut out).unwrap_err();
        assert_eq!(err.kind(), ::std::io::ErrorKind::UnexpectedEof);
    }
}
