//! Command-line host for the signing form.
//!
//! A signature is supplied as an event script: a JSON array of steps replayed through a signature
//! surface exactly as a UI host would deliver them.
//!
//! ```json
//! [
//!    { "input": { "origin": { "x": 0, "y": 0 }, "event": { "type": "mouse_down", "client": { "x": 10, "y": 10 } } } },
//!    { "input": { "event": { "type": "mouse_move", "client": { "x": 50, "y": 50 } } } },
//!    { "input": { "event": { "type": "mouse_up" } } }
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use structopt::StructOpt;

use crate::config::UserConfig;
use crate::form::PolicyForm;
use crate::store::{FileRecordStore, RecordStore};
use crate::surface::{InputEvent, Point, SignatureSurface};
use crate::theme::Theme;
use crate::Error;

#[derive(Debug, StructOpt)]
#[structopt(name = "signpad", about = "Records policy acceptances with a handwritten signature.")]
pub struct Options {
   /// Path to the config file. Defaults to `config.toml` in the platform config directory.
   #[structopt(long, parse(from_os_str))]
   pub config: Option<PathBuf>,

   #[structopt(subcommand)]
   pub command: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
   /// Signs the policy with a signature replayed from an event script.
   Sign {
      /// E-mail of the signed-in user.
      #[structopt(long)]
      email: String,
      #[structopt(long)]
      name: String,
      /// Identification number.
      #[structopt(long = "id")]
      identification_number: String,
      /// JSON event script to replay as the signature.
      #[structopt(long, parse(from_os_str))]
      events: PathBuf,
   },
   /// Lists recorded acceptances.
   List {
      /// E-mail of the signed-in user.
      #[structopt(long)]
      email: String,
   },
}

/// One step of an event script.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
   /// An input event, with the surface's on-screen origin at the time of the event.
   Input {
      #[serde(default)]
      origin: Point,
      event: InputEvent,
   },
   /// A press of the surface's clear button.
   Clear,
   /// A change of the surface's logical size.
   Resize { width: u32, height: u32 },
}

pub fn run(command: Command, config: &UserConfig) -> crate::Result<()> {
   match command {
      Command::Sign {
         email,
         name,
         identification_number,
         events,
      } => {
         config.access.allow_list().check(&email)?;
         let mut store = open_store(config)?;
         let steps = read_script(&events)?;

         let mut form = PolicyForm::new();
         form.full_name = name;
         form.identification_number = identification_number;
         let mut surface = SignatureSurface::new(
            (&config.surface).into(),
            Theme::resolve(&config.theme),
            form.signature_sink(),
         )?;
         if surface.is_inert() {
            return Err(Error::SurfaceUnavailable);
         }
         replay(&mut surface, &steps)?;

         let record = form.submit(&mut store, &mut surface)?;
         println!("{}", record.id);
      }
      Command::List { email } => {
         config.access.allow_list().check(&email)?;
         let store = open_store(config)?;
         for record in store.list()? {
            println!(
               "{}\t{}\t{}\t{}\t{} bytes",
               record.id,
               record.timestamp,
               record.full_name,
               record.identification_number,
               record.signature.len()
            );
         }
      }
   }
   Ok(())
}

fn open_store(config: &UserConfig) -> crate::Result<FileRecordStore> {
   let directory = config.store_dir().ok_or(Error::NoStoreDirectory)?;
   FileRecordStore::open(&directory)
}

pub fn read_script(path: &Path) -> crate::Result<Vec<Step>> {
   let file = std::fs::read_to_string(path)?;
   Ok(serde_json::from_str(&file)?)
}

/// Feeds the steps to the surface in order.
pub fn replay(surface: &mut SignatureSurface, steps: &[Step]) -> crate::Result<()> {
   for step in steps {
      match step {
         Step::Input { origin, event } => {
            surface.handle_event(event, origin);
         }
         Step::Clear => surface.clear(),
         Step::Resize { width, height } => surface.set_size(*width, *height)?,
      }
   }
   log::info!("replayed {} steps", steps.len());
   Ok(())
}
