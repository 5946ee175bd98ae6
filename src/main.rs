#[macro_use]
extern crate clap;
extern crate pairchat;
extern crate tokio;

use std::io::{self, Write};
use std::net::Ipv4Addr;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::ArgMatches;
use tokio::prelude::*;

use pairchat::line::LineInput;
use pairchat::net;
use pairchat::prompt::{self, Role};
use pairchat::session::Session;

fn main() {
    let matches = clap_app!(
        pairchat =>
            (version: "0.1.0")
            (about: "A two-party real-time chat over a single TCP connection.")
            (@arg ROLE: "Run as 'server' or 'client'; prompted for interactively when omitted.")
            (@arg PORT: -p --port +takes_value "Port to listen on (server) or connect to (client).")
            (@arg ADDRESS: -a --address +takes_value "The server's IPv4 address (client role only).")
    ).get_matches();

    match gather(&matches) {
        Ok((role, port, address)) => run(role, port, address),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}

/// Resolves the role, port, and (for the client) server address, preferring
/// command line values and falling back to the interactive prompts. Holds
/// the stdin lock only while prompting, then releases it for the session's
/// keyboard thread.
fn gather(matches: &ArgMatches) -> io::Result<(Role, u16, Option<Ipv4Addr>)> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();

    let role = match matches.value_of("ROLE").and_then(prompt::parse_role) {
        Some(role) => role,
        None => prompt::prompt_role(&mut input, &mut out)?,
    };
    match role {
        Role::Server => writeln!(out, "\nYou have selected to run the chat server.")?,
        Role::Client => writeln!(out, "\nYou have selected to run the chat client.")?,
    }

    let port = match matches.value_of("PORT").and_then(prompt::parse_port) {
        Some(port) => port,
        None => prompt::prompt_port(&mut input, &mut out, role)?,
    };

    let address = match role {
        Role::Server => None,
        Role::Client => {
            let ip = match matches.value_of("ADDRESS").and_then(prompt::parse_ipv4) {
                Some(ip) => ip,
                None => prompt::prompt_ipv4(&mut input, &mut out)?,
            };
            writeln!(out, "\nConnecting to {} on port {}.", ip, port)?;
            Some(ip)
        }
    };
    Ok((role, port, address))
}

/// Establishes the connection for the chosen role and runs one chat session
/// over it. Exits nonzero if the connection never comes up.
fn run(role: Role, port: u16, address: Option<Ipv4Addr>) {
    let establish = match role {
        Role::Server => match net::listen(port) {
            Ok(accept) => {
                println!(
                    "\nSocket listening on port {}.  Waiting on connection from client...",
                    port
                );
                accept
            }
            Err(err) => {
                println!("\nConnection failed! :(  {}", err);
                process::exit(1);
            }
        },
        // gather always produces an address for the client role.
        Role::Client => net::connect(port, address.unwrap()),
    };

    // A setup failure is only observable inside the future chain; the flag
    // carries it back out so the process can exit nonzero without ever
    // having entered a chat session.
    let setup_failed = Arc::new(AtomicBool::new(false));
    let failed = setup_failed.clone();
    let chat = establish
        .map_err(move |err| {
            println!("\nConnection failed! :(  {}", err);
            failed.store(true, Ordering::SeqCst);
        })
        .and_then(move |socket| {
            match role {
                Role::Server => println!("\nAccepted Connection!!"),
                Role::Client => println!("\nConnection Success!!"),
            }
            println!(
                "Connected.  Type your message and press enter to send it.  \
                 Type QUIT and press enter to Quit."
            );
            Session::new(socket, LineInput::spawn())
                .map_err(|err| println!("Socket Error! {}", err))
        })
        .map(|end| println!("{}", end.report()));

    tokio::run(chat);
    if setup_failed.load(Ordering::SeqCst) {
        process::exit(1);
    }
}
