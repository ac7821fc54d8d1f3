// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `hash-password` command.

use std::io::BufRead;

use agentgate_core::password;

use crate::cli::{Cli, HashPasswordArgs};
use crate::error::{BinError, BinResult};

/// Prints a PHC hash suitable for a `password_hash` entry.
pub fn hash_password(_cli: &Cli, args: HashPasswordArgs) -> BinResult<()> {
    let plaintext = match args.password {
        Some(value) if !args.stdin => value,
        _ => read_line(std::io::stdin().lock())?,
    };

    println!("{}", hash_plaintext(&plaintext)?);
    Ok(())
}

fn hash_plaintext(plaintext: &str) -> BinResult<String> {
    if plaintext.is_empty() {
        return Err(BinError::input("Password must not be empty"));
    }
    Ok(password::hash(plaintext)?)
}

fn read_line(mut reader: impl BufRead) -> BinResult<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
