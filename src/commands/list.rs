use std::io::Write;

use crate::{aws::ProfileStore, error::Result};

/// Print every configured profile name, one per line
#[derive(Debug, Clone, Default)]
pub struct ListCommand;

impl ListCommand {
    pub fn execute(&self, store: &impl ProfileStore, out: &mut impl Write) -> Result<()> {
        for profile in store.list_profiles()? {
            writeln!(out, "{profile}")?;
        }
        Ok(())
    }
}
