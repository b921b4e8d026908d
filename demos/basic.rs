//! Inserts, reads back and removes a few keys. Run with `RUST_LOG=debug` to
//! see the map rehash.

use clementine::map::HashMap;
use log::LevelFilter;
use std::process::ExitCode;

const TEST_KEY: u64 = 11;

fn main() -> ExitCode {
  env_logger::Builder::new()
    .filter_level(LevelFilter::Info)
    .parse_default_env()
    .init();

  let mut t = match HashMap::new(10) {
    Ok(t) => t,
    Err(e) => {
      eprintln!("failed to create map: {}", e);
      return ExitCode::FAILURE;
    }
  };

  t.insert(TEST_KEY, 3);

  match t.get(&TEST_KEY) {
    None => {
      eprintln!("fail.");
      return ExitCode::FAILURE;
    }
    Some(v) => {
      println!("Got value: {}", v);
    }
  }

  t.remove(&TEST_KEY);

  if t.contains_key(&TEST_KEY) {
    eprintln!("Failed to remove object.");
    return ExitCode::FAILURE;
  }

  println!("Removed object.");

  for i in 0 .. 100 {
    t.insert(i, i + 1);
  }

  println!("{} items in {} slots", t.len(), t.capacity());
  println!("Done!");

  return ExitCode::SUCCESS;
}
