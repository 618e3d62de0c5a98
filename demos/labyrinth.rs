//! Carve a maze with Eller's algorithm and solve it with Jump Point Search.
//!
//! ```sh
//! RUST_LOG=info cargo run -- --width 30 --height 12 --seed 7 --animate
//! ```

use clap::Parser;
use labyrinth_demos::{Args, run};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    run(&args)?;
    Ok(())
}
