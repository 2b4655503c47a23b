// Prints an Argon2id hash for the password given as the first argument, or read
// from stdin, for use as AUTH_USERS_<n>_PASSWORD_HASH.
use std::io::{self, BufRead};
use std::process::ExitCode;

use medibook_auth::password::hash_password;

fn main() -> ExitCode {
    let password = match std::env::args().nth(1) {
        Some(password) => password,
        None => {
            let mut line = String::new();
            if let Err(e) = io::stdin().lock().read_line(&mut line) {
                eprintln!("cannot read password from stdin: {e}");
                return ExitCode::FAILURE;
            }
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        eprintln!("usage: hash-password <password>  (or pipe it on stdin)");
        return ExitCode::FAILURE;
    }

    match hash_password(&password) {
        Ok(hash) => {
            println!("{hash}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
