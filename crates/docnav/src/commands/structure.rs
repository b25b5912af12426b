//! `docnav structure` command implementation.

use clap::Args;

use super::StoreArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the structure command.
#[derive(Args)]
pub(crate) struct StructureArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Print compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,
}

impl StructureArgs {
    /// Execute the structure command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (config, docs) = self.store.open()?;

        let structure = docs.structure()?;
        if structure.is_building() {
            output.warning(&format!(
                "No documents found in {}",
                config.docs_resolved.source_dir.display()
            ));
        }

        let json = if self.compact {
            serde_json::to_string(&*structure)?
        } else {
            serde_json::to_string_pretty(&*structure)?
        };
        output.result(&json)?;

        Ok(())
    }
}
