use std::path::Path;

use colored::*;
use dialr_common::config::Config;
use dialr_core::enumerate;

use crate::backend;
use crate::terminal::print;

pub fn entries(phonebook: Option<&Path>, _cfg: &Config) -> anyhow::Result<()> {
    let api = backend::backend();
    let entries = enumerate::enumerate_entries(api.as_ref(), phonebook)?;

    if entries.is_empty() {
        print::print_status("The phonebook holds no entries");
        return Ok(());
    }

    for (idx, entry) in entries.iter().enumerate() {
        print::tree_head(idx, &entry.name);
        print::as_tree_one_level(vec![
            ("Device".to_string(), entry.device_name.normal()),
            ("Kind".to_string(), entry.device_kind.to_string().cyan()),
            ("Target".to_string(), entry.target.normal()),
        ]);
    }
    Ok(())
}
