use anyhow::Context;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use structopt::StructOpt;

use signpad::cli::{self, Options};
use signpad::config::UserConfig;

fn main() -> anyhow::Result<()> {
   let _ = SimpleLogger::new().with_level(LevelFilter::Info).init();

   let options = Options::from_args();
   let config_file = match options.config {
      Some(path) => path,
      None => UserConfig::path().context("cannot determine config directories")?,
   };
   let config = UserConfig::load_or_create(&config_file)
      .with_context(|| format!("cannot load config from {}", config_file.display()))?;

   match cli::run(options.command, &config) {
      Ok(()) => Ok(()),
      Err(error) => {
         log::info!("run() returned with an Err:\n{}", error);
         for field_error in error.field_errors() {
            eprintln!("{:?}: {}", field_error.field, field_error);
         }
         Err(error.into())
      }
   }
}
