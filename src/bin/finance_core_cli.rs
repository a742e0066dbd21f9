use std::{env, process};

use finance_core::{cli, init};

fn main() {
    init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(err) = cli::run(&args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
