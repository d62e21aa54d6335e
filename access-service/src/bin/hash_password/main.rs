//! Reads a password from stdin and prints its PHC hash.
//!
//! Uses the configured work factor, so the output can be written straight
//! into the identity directory's `password_hash` column.

use std::io::BufRead;
use std::io::{self};

use access_service::config::Config;
use auth::PasswordHasher;

fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;
    let hasher = PasswordHasher::with_params(config.password.into())?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);

    if password.is_empty() {
        anyhow::bail!("no password given on stdin");
    }

    println!("{}", hasher.hash(password)?);

    Ok(())
}
